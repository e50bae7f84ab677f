//! Certificate fingerprint (digest) computation.

use crate::QcertError;
use digest::Digest;

/// Digest algorithm for fingerprint computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Sha1,
}

impl DigestAlgorithm {
    /// Resolve an algorithm name string (e.g. `"sha256"`).
    pub fn from_name(name: &str) -> Result<Self, QcertError> {
        match name.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha384" | "sha-384" => Ok(DigestAlgorithm::Sha384),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            "sha1" | "sha-1" => Ok(DigestAlgorithm::Sha1),
            other => Err(QcertError::Unsupported(format!(
                "unsupported digest algorithm '{}'",
                other
            ))),
        }
    }
}

/// Compute the fingerprint of DER-encoded certificate bytes.
///
/// Returns a lowercase hex string over the full DER encoding.
pub fn compute_fingerprint(der_bytes: &[u8], algorithm: DigestAlgorithm) -> String {
    let hash_bytes: Vec<u8> = match algorithm {
        DigestAlgorithm::Sha256 => sha2::Sha256::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha384 => sha2::Sha384::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha512 => sha2::Sha512::digest(der_bytes).to_vec(),
        DigestAlgorithm::Sha1 => sha1::Sha1::digest(der_bytes).to_vec(),
    };
    hex::encode(hash_bytes)
}
