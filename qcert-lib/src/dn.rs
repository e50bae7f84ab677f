//! Distinguished Name decoding.
//!
//! Decodes an RDNSequence into an ordered attribute list.  Order is
//! significant and is preserved from the encoded sequence: it drives the
//! `/SHORT=value` rendering used both for reporting and for the textual
//! issuer/subject comparison during chain linking.

use crate::der::{
    self, TAG_IA5_STRING, TAG_PRINTABLE_STRING, TAG_SEQUENCE, TAG_SET, TAG_T61_STRING,
    TAG_UTF8_STRING,
};
use crate::oid;
use crate::util;
use crate::QcertError;
use serde::Serialize;
use serde_json::json;

/// One decoded attribute of a Distinguished Name.
#[derive(Debug, Clone, Serialize)]
pub struct DnAttribute {
    /// Dotted-decimal attribute type OID.
    pub oid: String,
    /// Canonical attribute name (e.g. `commonName`).
    pub name: &'static str,
    /// DN-rendering abbreviation (e.g. `CN`).
    #[serde(rename = "shortName")]
    pub short_name: &'static str,
    pub value: DnValue,
}

/// Attribute value: a single string, or an ordered list of component
/// strings for composite multi-value attributes.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DnValue {
    Single(String),
    Multi(Vec<String>),
}

/// An ordered Distinguished Name.
#[derive(Debug, Clone, Serialize)]
pub struct DistinguishedName {
    pub attributes: Vec<DnAttribute>,
}

impl DistinguishedName {
    /// Decode a DER-encoded RDNSequence.
    ///
    /// An unrecognized value-string tag or an attribute OID outside the
    /// registry is a fatal decode error; the message carries the offending
    /// bytes base64-encoded.
    pub fn from_der(input: &[u8]) -> Result<Self, QcertError> {
        let name_el = der::parse_sequence(input)?;
        let mut attributes = Vec::new();
        for rdn in name_el.children()? {
            if !rdn.is_universal(TAG_SET) {
                return Err(der::explain("Expected RDN SET", rdn.raw));
            }
            let atvs = rdn.children()?;
            let atv = atvs
                .first()
                .ok_or_else(|| der::explain("Empty RDN SET", rdn.raw))?;
            if !atv.is_universal(TAG_SEQUENCE) {
                return Err(der::explain("Expected AttributeTypeAndValue SEQUENCE", atv.raw));
            }
            let fields = atv.children()?;
            let oid_el = fields
                .first()
                .ok_or_else(|| der::explain("Missing attribute type", atv.raw))?;
            let value_el = fields
                .get(1)
                .ok_or_else(|| der::explain("Missing attribute value", atv.raw))?;

            let oid_string = oid_el.as_oid_string()?;
            let oid_name = oid::name(&oid_string);
            let value = decode_value(value_el)?;
            if oid_name == oid::UNKNOWN {
                return Err(QcertError::ParseError(format!(
                    "Unknown OID {} in DN: {}",
                    oid_string,
                    util::base64_encode(atv.raw)
                )));
            }
            attributes.push(DnAttribute {
                oid: oid_string,
                name: oid_name,
                short_name: oid::short_name(oid_name),
                value,
            });
        }
        Ok(DistinguishedName { attributes })
    }

    /// Render as `/SHORT=value` segments in decoded order; composite
    /// attributes repeat their abbreviation once per component value.
    pub fn to_dn_string(&self) -> String {
        let mut dn = String::new();
        for attr in &self.attributes {
            match &attr.value {
                DnValue::Single(v) => {
                    dn.push('/');
                    dn.push_str(attr.short_name);
                    dn.push('=');
                    dn.push_str(v);
                }
                DnValue::Multi(values) => {
                    for v in values {
                        dn.push('/');
                        dn.push_str(attr.short_name);
                        dn.push('=');
                        dn.push_str(v);
                    }
                }
            }
        }
        dn
    }

    /// Expanded structured form for the attribute report.
    pub fn expanded(&self) -> serde_json::Value {
        let parts: Vec<serde_json::Value> = self
            .attributes
            .iter()
            .map(|attr| {
                let value = match &attr.value {
                    DnValue::Single(v) => json!(v),
                    DnValue::Multi(values) => json!(values),
                };
                json!({
                    "name": attr.name,
                    "shortName": attr.short_name,
                    "oid": attr.oid,
                    "value": value,
                })
            })
            .collect();
        serde_json::Value::Array(parts)
    }
}

impl std::fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dn_string())
    }
}

fn decode_value(el: &der::Element<'_>) -> Result<DnValue, QcertError> {
    match el.tag_number() {
        TAG_UTF8_STRING | TAG_PRINTABLE_STRING | TAG_T61_STRING | TAG_IA5_STRING => {
            Ok(DnValue::Single(el.as_str()?.to_string()))
        }
        TAG_SEQUENCE => {
            let mut components = Vec::new();
            for part in el.children()? {
                match part.tag_number() {
                    TAG_UTF8_STRING | TAG_PRINTABLE_STRING | TAG_T61_STRING
                    | TAG_IA5_STRING => components.push(part.as_str()?.to_string()),
                    tag => {
                        return Err(QcertError::ParseError(format!(
                            "Unknown DN component element type {}: {}",
                            tag,
                            util::base64_encode(part.raw)
                        )))
                    }
                }
            }
            Ok(DnValue::Multi(components))
        }
        tag => Err(QcertError::ParseError(format!(
            "Unknown DN component type {}: {}",
            tag,
            util::base64_encode(el.raw)
        ))),
    }
}
