//! Basic Constraints and Key Usage decoding.  Both are strict: malformed
//! content is a fatal decode error, never a finding.

use crate::der::{self, TAG_BIT_STRING, TAG_BOOLEAN, TAG_INTEGER};
use crate::findings::Finding;
use crate::QcertError;

/// Decoded basicConstraints extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConstraints {
    /// Whether the subject is a CA.  Defaults to false when the encoded
    /// BOOLEAN is absent.
    pub is_ca: bool,
    /// Maximum number of non-self-issued intermediates below this CA.
    /// Meaningful only when `is_ca` is true.
    pub path_length: Option<u64>,
}

pub(crate) fn decode_basic_constraints(
    payload: &[u8],
) -> Result<(BasicConstraints, Vec<Finding>), QcertError> {
    let seq = der::parse_sequence(payload)?;
    let mut value = BasicConstraints::default();
    for el in seq.children()? {
        if el.is_universal(TAG_BOOLEAN) {
            value.is_ca = el.as_bool()?;
        } else if el.is_universal(TAG_INTEGER) {
            value.path_length = Some(el.as_u64()?);
        } else {
            return Err(der::explain("Unexpected BasicConstraints element", el.raw));
        }
    }
    Ok((value, Vec::new()))
}

/// Decoded keyUsage extension: the named bits of the BIT STRING.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyUsage {
    bits: u16,
}

const USAGE_NAMES: [&str; 9] = [
    "digitalSignature",
    "nonRepudiation",
    "keyEncipherment",
    "dataEncipherment",
    "keyAgreement",
    "keyCertSign",
    "cRLSign",
    "encipherOnly",
    "decipherOnly",
];

impl KeyUsage {
    fn bit(&self, index: u16) -> bool {
        self.bits & (1 << index) != 0
    }

    pub fn digital_signature(&self) -> bool {
        self.bit(0)
    }

    pub fn non_repudiation(&self) -> bool {
        self.bit(1)
    }

    pub fn key_encipherment(&self) -> bool {
        self.bit(2)
    }

    pub fn data_encipherment(&self) -> bool {
        self.bit(3)
    }

    pub fn key_agreement(&self) -> bool {
        self.bit(4)
    }

    pub fn key_cert_sign(&self) -> bool {
        self.bit(5)
    }

    pub fn crl_sign(&self) -> bool {
        self.bit(6)
    }

    pub fn encipher_only(&self) -> bool {
        self.bit(7)
    }

    pub fn decipher_only(&self) -> bool {
        self.bit(8)
    }

    /// Names of the set usage bits, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        USAGE_NAMES
            .iter()
            .enumerate()
            .filter(|(i, _)| self.bit(*i as u16))
            .map(|(_, name)| *name)
            .collect()
    }
}

pub(crate) fn decode_key_usage(payload: &[u8]) -> Result<(KeyUsage, Vec<Finding>), QcertError> {
    let (el, _) = der::parse_element(payload)?;
    if !el.is_universal(TAG_BIT_STRING) {
        return Err(der::explain("Expected keyUsage BIT STRING", el.raw));
    }
    // BIT STRING content octets: unused-bit count, then the bit data.
    let content = el.content();
    if content.is_empty() {
        return Err(der::explain("Empty keyUsage BIT STRING", el.raw));
    }
    let data = &content[1..];
    let mut bits = 0u16;
    for index in 0..USAGE_NAMES.len() {
        let byte = match data.get(index / 8) {
            Some(b) => *b,
            None => break,
        };
        if byte & (0x80 >> (index % 8)) != 0 {
            bits |= 1 << index;
        }
    }
    Ok((KeyUsage { bits }, Vec::new()))
}
