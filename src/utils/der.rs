//! PEM and DER helpers for RSA key material
//!
//! Uses the RustCrypto `der` and `spki` crates. Public keys are normalized to
//! the PKCS#1 `RSAPublicKey` encoding that ring verifies against, whatever
//! PEM label or outer structure they arrived in.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use der::asn1::UintRef;
use der::pem::LineEnding;
use der::{Decode, Encode, Sequence};
use spki::{AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned, SubjectPublicKeyInfoRef};

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// RSA public key structure for DER encoding
///
/// Represents RSAPublicKey as defined in RFC 3447:
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
#[derive(Sequence)]
struct RsaPublicKeyDer<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// A decoded PEM block
pub(crate) struct PemBlock {
    pub label: String,
    pub der: Vec<u8>,
}

impl PemBlock {
    pub fn is_private_key(&self) -> bool {
        self.label.ends_with("PRIVATE KEY")
    }
}

/// Decode a single PEM block, tolerating surrounding whitespace
///
/// Strict RFC 7468 framing is tried first. Bodies wrapped at other widths or
/// pasted on one line go through [`decode_pem_lenient`].
pub(crate) fn decode_pem(pem: &str) -> Option<PemBlock> {
    let normalized = format!("{}\n", pem.trim());
    match der::pem::decode_vec(normalized.as_bytes()) {
        Ok((label, der)) => Some(PemBlock {
            label: label.to_string(),
            der,
        }),
        Err(_) => decode_pem_lenient(pem),
    }
}

/// Decode a PEM block with any line width, or none
///
/// The body between matching `BEGIN` and `END` lines is base64 with all
/// whitespace removed.
fn decode_pem_lenient(pem: &str) -> Option<PemBlock> {
    const BEGIN: &str = "-----BEGIN ";
    const BOUNDARY_END: &str = "-----";

    let start = pem.find(BEGIN)? + BEGIN.len();
    let label_len = pem[start..].find(BOUNDARY_END)?;
    let label = &pem[start..start + label_len];
    let body_start = start + label_len + BOUNDARY_END.len();

    let end_marker = format!("-----END {label}-----");
    let body_len = pem[body_start..].find(&end_marker)?;
    let body: String = pem[body_start..body_start + body_len]
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if body.is_empty() {
        return None;
    }

    let der = STANDARD.decode(body).ok()?;
    Some(PemBlock {
        label: label.to_string(),
        der,
    })
}

/// Normalize a DER public key body to PKCS#1 `RSAPublicKey`
///
/// Accepts SubjectPublicKeyInfo (the usual `PUBLIC KEY` content) and bare
/// PKCS#1 bodies, which some issuers emit under the `PUBLIC KEY` label too.
pub(crate) fn rsa_public_pkcs1(der: &[u8]) -> Result<Vec<u8>> {
    if let Ok(spki) = SubjectPublicKeyInfoRef::from_der(der) {
        if spki.algorithm.oid != RSA_ENCRYPTION_OID {
            return Err(Error::KeyParse("public key is not an RSA key".into()));
        }
        let pkcs1 = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| Error::KeyParse("public key bit string is not octet aligned".into()))?;
        rsa_components(pkcs1)?;
        return Ok(pkcs1.to_vec());
    }

    rsa_components(der)?;
    Ok(der.to_vec())
}

/// Extract big-endian modulus (n) and exponent (e) from a PKCS#1 public key
pub(crate) fn rsa_components(pkcs1: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let key = RsaPublicKeyDer::from_der(pkcs1)
        .map_err(|e| Error::KeyParse(format!("public key is not a valid RSA key: {e}")))?;
    Ok((
        key.modulus.as_bytes().to_vec(),
        key.public_exponent.as_bytes().to_vec(),
    ))
}

/// Wrap a PKCS#1 public key in SubjectPublicKeyInfo and PEM-encode it
pub(crate) fn rsa_public_pem(pkcs1: &[u8]) -> Result<String> {
    use der::asn1::BitString;

    // Round-trip through the typed structure so only well-formed keys are published
    let (n, e) = rsa_components(pkcs1)?;
    let encode_error = |e: der::Error| Error::KeyParse(format!("failed to encode public key: {e}"));

    let rsa_pubkey = RsaPublicKeyDer {
        modulus: UintRef::new(&n).map_err(encode_error)?,
        public_exponent: UintRef::new(&e).map_err(encode_error)?,
    };
    let rsa_pubkey_der = rsa_pubkey.to_der().map_err(encode_error)?;

    let spki = SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: RSA_ENCRYPTION_OID,
            parameters: Some(der::asn1::AnyRef::NULL.into()),
        },
        subject_public_key: BitString::new(0, rsa_pubkey_der).map_err(encode_error)?,
    };
    let spki_der = spki.to_der().map_err(encode_error)?;

    der::pem::encode_string("PUBLIC KEY", LineEnding::LF, &spki_der)
        .map_err(|e| Error::KeyParse(format!("failed to encode public key: {e}")))
}
