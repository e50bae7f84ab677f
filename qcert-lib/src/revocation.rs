//! Revocation boundary.
//!
//! The certificate accepts an externally-constructed, already-verified
//! revocation list and answers revocation queries by serial-number lookup.
//! No CRL signature or freshness checking happens here; that is the
//! caller's responsibility before binding.

use crate::QcertError;
use num_bigint::BigInt;
use std::collections::HashSet;
use x509_parser::pem::Pem;
use x509_parser::prelude::FromDer;

/// Answers revocation queries for a bound certificate.
pub trait RevocationSource: Send + Sync {
    fn is_revoked(&self, serial: &BigInt) -> bool;
}

/// A parsed CRL reduced to its revoked-serial set.
#[derive(Debug, Clone)]
pub struct CertificateRevocationList {
    revoked: HashSet<BigInt>,
}

impl CertificateRevocationList {
    /// Parse a DER-encoded CRL.
    pub fn from_der(crl_der: &[u8]) -> Result<Self, QcertError> {
        let (_, crl) = x509_parser::revocation_list::CertificateRevocationList::from_der(crl_der)
            .map_err(|e| QcertError::DerError(format!("failed to parse CRL: {}", e)))?;
        let revoked = crl
            .iter_revoked_certificates()
            .map(|entry| BigInt::from_signed_bytes_be(entry.raw_serial()))
            .collect();
        Ok(CertificateRevocationList { revoked })
    }

    /// Parse a CRL in DER or PEM (`X509 CRL` label) form.
    pub fn from_bytes(input: &[u8]) -> Result<Self, QcertError> {
        for pem in Pem::iter_from_buffer(input).flatten() {
            if pem.label == "X509 CRL" {
                return Self::from_der(&pem.contents);
            }
        }
        Self::from_der(input)
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

impl RevocationSource for CertificateRevocationList {
    fn is_revoked(&self, serial: &BigInt) -> bool {
        self.revoked.contains(serial)
    }
}
