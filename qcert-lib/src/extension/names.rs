//! Subject Alternative Name, Extended Key Usage, CRL Distribution Points.
//!
//! Minimal typed holders: enough structure for the certificate-level
//! lookups (CDP URIs, purpose names) and the attribute report.  Malformed
//! content in any of the three is a fatal decode error.

use super::access::general_name_uri;
use crate::der::{self, TAG_SEQUENCE};
use crate::dn::DistinguishedName;
use crate::findings::Finding;
use crate::oid;
use crate::QcertError;
use x509_parser::der_parser::asn1_rs::Class;

/// One GeneralName alternative, reduced to its reportable string form.
#[derive(Debug, Clone)]
pub enum GeneralNameValue {
    Dns(String),
    Email(String),
    Uri(String),
    DirectoryName(String),
    Ip(String),
    /// Alternatives this decoder does not interpret; carries the tag number.
    Other(u32),
}

impl GeneralNameValue {
    pub fn render(&self) -> String {
        match self {
            GeneralNameValue::Dns(v) => format!("DNS:{}", v),
            GeneralNameValue::Email(v) => format!("email:{}", v),
            GeneralNameValue::Uri(v) => format!("URI:{}", v),
            GeneralNameValue::DirectoryName(v) => format!("dirName:{}", v),
            GeneralNameValue::Ip(v) => format!("IP:{}", v),
            GeneralNameValue::Other(tag) => format!("otherName:[{}]", tag),
        }
    }
}

/// Decoded subjectAltName extension.
#[derive(Debug, Clone, Default)]
pub struct SubjectAltName {
    pub names: Vec<GeneralNameValue>,
}

pub(crate) fn decode_subject_alt_name(
    payload: &[u8],
) -> Result<(SubjectAltName, Vec<Finding>), QcertError> {
    let seq = der::parse_sequence(payload)?;
    let mut value = SubjectAltName::default();
    for el in seq.children()? {
        if el.class() != Class::ContextSpecific {
            return Err(der::explain("Expected GeneralName alternative", el.raw));
        }
        let name = match el.tag_number() {
            1 => GeneralNameValue::Email(implicit_string(el.content())),
            2 => GeneralNameValue::Dns(implicit_string(el.content())),
            4 => {
                // directoryName is constructed: a full Name inside the tag
                let dn = DistinguishedName::from_der(el.content())?;
                GeneralNameValue::DirectoryName(dn.to_dn_string())
            }
            6 => GeneralNameValue::Uri(implicit_string(el.content())),
            7 => GeneralNameValue::Ip(format_ip_bytes(el.content())),
            tag => GeneralNameValue::Other(tag),
        };
        value.names.push(name);
    }
    Ok((value, Vec::new()))
}

/// IA5String content under an implicit context tag.
fn implicit_string(content: &[u8]) -> String {
    String::from_utf8_lossy(content).to_string()
}

fn format_ip_bytes(bytes: &[u8]) -> String {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        std::net::Ipv4Addr::from(octets).to_string()
    } else if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        std::net::Ipv6Addr::from(octets).to_string()
    } else {
        hex::encode(bytes)
    }
}

/// Decoded extKeyUsage extension: purpose names in encoded order,
/// unrecognized purpose OIDs kept as dotted strings.
#[derive(Debug, Clone, Default)]
pub struct ExtendedKeyUsage {
    pub purposes: Vec<String>,
}

pub(crate) fn decode_extended_key_usage(
    payload: &[u8],
) -> Result<(ExtendedKeyUsage, Vec<Finding>), QcertError> {
    let seq = der::parse_sequence(payload)?;
    let mut value = ExtendedKeyUsage::default();
    for el in seq.children()? {
        let purpose_oid = el.as_oid_string()?;
        let purpose = match oid::name(&purpose_oid) {
            oid::UNKNOWN => purpose_oid,
            name => name.to_string(),
        };
        value.purposes.push(purpose);
    }
    Ok((value, Vec::new()))
}

/// Decoded crlDistributionPoints extension: distribution point URIs.
#[derive(Debug, Clone, Default)]
pub struct CrlDistributionPoints {
    pub uris: Vec<String>,
}

pub(crate) fn decode_crl_distribution_points(
    payload: &[u8],
) -> Result<(CrlDistributionPoints, Vec<Finding>), QcertError> {
    let seq = der::parse_sequence(payload)?;
    let mut value = CrlDistributionPoints::default();
    for point in seq.children()? {
        if !point.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected DistributionPoint SEQUENCE", point.raw));
        }
        for field in point.children()? {
            // [0] distributionPointName; reasons and cRLIssuer are skipped
            if !field.is_context(0) {
                continue;
            }
            let mut cursor = field.content();
            while !cursor.is_empty() {
                let (name_el, rest) = der::parse_element(cursor)?;
                cursor = rest;
                // [0] fullName: GeneralNames under an implicit tag
                if !name_el.is_context(0) {
                    continue;
                }
                let mut names = name_el.content();
                while !names.is_empty() {
                    let (gn, rest_names) = der::parse_element(names)?;
                    names = rest_names;
                    if let Some(uri) = general_name_uri(&gn)? {
                        value.uris.push(uri);
                    }
                }
            }
        }
    }
    Ok((value, Vec::new()))
}
