//! qcert-lib: Library for decoding X.509 v3 certificates and evaluating
//! eIDAS "qualified certificate" semantics.
//!
//! Provides a fail-soft extension decoding framework (malformed or
//! unrecognized extension content degrades to recorded [`Finding`]s instead
//! of aborting the parse where the per-type policy allows), a Distinguished
//! Name decoder, decoders for the eIDAS qcStatements extension, and
//! issuer-chain linking with name, key-identifier, and signature checks.
//!
//! Certificate decoding is a pure function of the input bytes: no I/O is
//! performed. Fetching certificate or CRL bytes is the caller's job; they
//! are supplied as already-resident buffers or pre-verified objects.
//!
//! # Threading
//!
//! Decoding distinct certificates from multiple threads needs no
//! coordination. A single [`X509Certificate`] instance caches its attribute
//! report on first access and records accepted issuers through `&mut self`,
//! so sharing one instance across threads requires external synchronization
//! (a `Mutex` around the instance is sufficient).

mod certificate;
mod convert;
mod der;
mod dn;
mod extension;
mod findings;
mod fingerprint;
pub mod oid;
mod qc;
mod revocation;
mod signature;
mod util;

pub use certificate::{iso8601, CertificateContext, IssuerCandidate, X509Certificate};
pub use convert::{der_to_pem, is_pem, normalize_to_der};
pub use dn::{DistinguishedName, DnAttribute, DnValue};
pub use extension::{
    AuthorityInfoAccess, AuthorityKeyIdentifier, BasicConstraints, CertificatePolicies,
    CrlDistributionPoints, ExtendedKeyUsage, Extension, ExtensionValue, GeneralNameValue,
    KeyUsage, PolicyInformation, SubjectAltName, SubjectKeyIdentifier,
};
pub use findings::{Finding, Severity};
pub use fingerprint::{compute_fingerprint, DigestAlgorithm};
pub use qc::{PdsLocation, QcStatement, QcStatementValue, QcStatements};
pub use revocation::{CertificateRevocationList, RevocationSource};
pub use signature::{CryptoVerifier, SignatureVerifier};

/// Errors returned by qcert-lib.
///
/// These are the fatal decode failures: an unparseable structure, an
/// unsupported algorithm, or content the decoder refuses to guess at.
/// Recoverable anomalies are reported as [`Finding`]s instead, and issuer
/// rejection during chain linking is an ordinary `None` result, never an
/// error.
#[derive(Debug, thiserror::Error)]
pub enum QcertError {
    #[error("Failed to parse certificate: {0}")]
    ParseError(String),

    #[error("Invalid PEM format: {0}")]
    PemError(String),

    #[error("Invalid DER format: {0}")]
    DerError(String),

    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    #[error("Trust service binding error: {0}")]
    TrustService(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
