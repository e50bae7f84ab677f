//! Signature verification boundary.
//!
//! Chain linking delegates cryptographic verification to a
//! [`SignatureVerifier`]; the default engine selects the algorithm from the
//! subject certificate's own declared signature algorithm.

use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;

/// Verifies that `subject_der`'s TBS bytes and signature value check out
/// under `issuer_der`'s public key and the subject's declared signature
/// algorithm.
///
/// Rejection is an expected outcome while probing candidate issuers, so
/// the result is a plain boolean; unparseable input counts as failure.
pub trait SignatureVerifier {
    fn verify(&self, subject_der: &[u8], issuer_der: &[u8]) -> bool;
}

/// Default engine over the `x509-parser` verify feature (ring-backed;
/// covers RSA, RSA-PSS, and ECDSA).
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoVerifier;

impl SignatureVerifier for CryptoVerifier {
    fn verify(&self, subject_der: &[u8], issuer_der: &[u8]) -> bool {
        let Ok((_, subject)) = X509Certificate::from_der(subject_der) else {
            return false;
        };
        let Ok((_, issuer)) = X509Certificate::from_der(issuer_der) else {
            return false;
        };
        subject.verify_signature(Some(issuer.public_key())).is_ok()
    }
}
