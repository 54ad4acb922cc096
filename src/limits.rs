//! Size limit constants for input validation

/// Maximum length for a token string (64KB)
pub const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum size for decoded token header JSON (8KB)
/// Headers are typically small (< 1KB), but we allow reasonable margin
pub const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded token claims JSON (48KB)
/// Scope lists of large clients can be long, but must be bounded
pub const MAX_DECODED_CLAIMS_SIZE: usize = 48 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA signatures are 256-512 bytes for 2048-4096 bit keys
pub const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;
