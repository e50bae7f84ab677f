//! Authority and Subject Key Identifier decoding.

use crate::der::{self, TAG_OCTET_STRING};
use crate::findings::Finding;
use crate::util;
use crate::QcertError;
use x509_parser::der_parser::asn1_rs::Class;

/// Decoded authorityKeyIdentifier extension.
///
/// Only the `[0]` keyIdentifier form is decoded.  The `[1]`
/// authorityCertIssuer and `[2]` authorityCertSerialNumber alternatives are
/// recognized as valid tags but their content is not interpreted; the key
/// identifier stays unset when only those are present.
#[derive(Debug, Clone, Default)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
}

/// Decoded subjectKeyIdentifier extension: the raw key-identifier octets.
#[derive(Debug, Clone)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

pub(crate) fn decode_aki(
    payload: &[u8],
) -> Result<(AuthorityKeyIdentifier, Vec<Finding>), QcertError> {
    let seq = der::parse_sequence(payload)?;
    let mut value = AuthorityKeyIdentifier::default();

    for el in seq.children()? {
        let tag = el.tag_number();
        if el.class() == Class::ContextSpecific && tag == 0 {
            value.key_identifier = Some(el.content().to_vec());
        } else if el.class() == Class::ContextSpecific && (tag == 1 || tag == 2) {
            // authorityCertIssuer / authorityCertSerialNumber: valid, skipped
        } else {
            return Err(QcertError::DerError(format!(
                "Unrecognised AuthorityKeyIdentifier {} format: {}",
                tag,
                util::base64_encode(el.raw)
            )));
        }
    }

    Ok((value, Vec::new()))
}

pub(crate) fn decode_ski(
    payload: &[u8],
) -> Result<(SubjectKeyIdentifier, Vec<Finding>), QcertError> {
    let (el, _) = der::parse_element(payload)?;
    if !el.is_universal(TAG_OCTET_STRING) {
        return Err(der::explain("Expected OCTET STRING key identifier", el.raw));
    }
    Ok((
        SubjectKeyIdentifier {
            key_identifier: el.as_slice()?.to_vec(),
        },
        Vec::new(),
    ))
}
