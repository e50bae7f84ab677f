//! X.509v3 extension decoding.
//!
//! [`Extension::from_der`] is the dispatch factory: it decodes one
//! extension's outer envelope (OID, optional criticality flag, OCTET STRING
//! payload) and routes the payload to the typed decoder for that OID.  An
//! entirely unrecognized extension OID is expected and silent at this tier
//! (issuers may include private extensions); it degrades to an
//! [`ExtensionValue::Unknown`] holder that preserves the raw payload and
//! the original OID for reporting.  Recognition gaps *inside* a known
//! extension's content are the per-type decoder's responsibility and are
//! reported through [`Finding`]s.
//!
//! A malformed outer envelope, by contrast, is a fatal decode error: with
//! no OID decoded there is nothing to attribute a finding to.

mod access;
mod constraints;
mod key_identifier;
mod names;
mod policies;

pub use access::AuthorityInfoAccess;
pub use constraints::{BasicConstraints, KeyUsage};
pub use key_identifier::{AuthorityKeyIdentifier, SubjectKeyIdentifier};
pub use names::{CrlDistributionPoints, ExtendedKeyUsage, GeneralNameValue, SubjectAltName};
pub use policies::{CertificatePolicies, PolicyInformation};

use crate::certificate::CertificateContext;
use crate::der::{self, TAG_BOOLEAN, TAG_OCTET_STRING};
use crate::findings::Finding;
use crate::oid;
use crate::qc::QcStatements;
use crate::util;
use crate::QcertError;
use serde_json::json;

/// A decoded certificate extension.
///
/// Always retains the raw payload bytes alongside the typed value, so
/// reports can round-trip the original content.  Decoding is a pure
/// function of the payload: certificate context (e.g. the not-before date
/// some qcStatements descriptions depend on) is passed explicitly to
/// [`Extension::attributes`], never held as a back-reference.
#[derive(Debug, Clone)]
pub struct Extension {
    oid: String,
    name: String,
    critical: bool,
    raw: Vec<u8>,
    findings: Vec<Finding>,
    value: ExtensionValue,
}

/// Typed extension payloads.
#[derive(Debug, Clone)]
pub enum ExtensionValue {
    AuthorityInfoAccess(AuthorityInfoAccess),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    CertificatePolicies(CertificatePolicies),
    BasicConstraints(BasicConstraints),
    KeyUsage(KeyUsage),
    SubjectAltName(SubjectAltName),
    ExtendedKeyUsage(ExtendedKeyUsage),
    CrlDistributionPoints(CrlDistributionPoints),
    QcStatements(QcStatements),
    /// Presence-only Certificate Transparency poison marker; the payload is
    /// retained but never interpreted.
    PreCertPoison,
    /// Catch-all for unrecognized extension OIDs.
    Unknown,
}

impl Extension {
    /// Decode one `Extension` ASN.1 SEQUENCE (OID, optional criticality
    /// BOOLEAN defaulting to false, OCTET STRING payload) and dispatch the
    /// payload to the typed decoder for the OID.
    pub fn from_der(extension_der: &[u8]) -> Result<Self, QcertError> {
        let seq = der::parse_sequence(extension_der)?;
        let elems = seq.children()?;
        let oid_el = elems
            .first()
            .ok_or_else(|| der::explain("Empty extension SEQUENCE", seq.raw))?;
        let oid_string = oid_el.as_oid_string()?;

        let (critical, payload_el) = match elems.get(1) {
            Some(el) if el.is_universal(TAG_BOOLEAN) => {
                let flag = el.as_bool()?;
                let payload = elems
                    .get(2)
                    .ok_or_else(|| der::explain("Missing extension payload", seq.raw))?;
                (flag, payload)
            }
            Some(el) => (false, el),
            None => return Err(der::explain("Missing extension payload", seq.raw)),
        };
        if !payload_el.is_universal(TAG_OCTET_STRING) {
            return Err(der::explain(
                "Expected OCTET STRING extension payload",
                payload_el.raw,
            ));
        }
        let payload = payload_el.as_slice()?;

        let dispatch: Option<(ExtensionValue, Vec<Finding>)> = match oid::name(&oid_string) {
            "authorityInfoAccess" => {
                let (v, f) = access::decode(payload)?;
                Some((ExtensionValue::AuthorityInfoAccess(v), f))
            }
            "authorityKeyIdentifier" => {
                let (v, f) = key_identifier::decode_aki(payload)?;
                Some((ExtensionValue::AuthorityKeyIdentifier(v), f))
            }
            "subjectKeyIdentifier" => {
                let (v, f) = key_identifier::decode_ski(payload)?;
                Some((ExtensionValue::SubjectKeyIdentifier(v), f))
            }
            "certificatePolicies" => {
                let (v, f) = policies::decode(payload, critical)?;
                Some((ExtensionValue::CertificatePolicies(v), f))
            }
            "basicConstraints" => {
                let (v, f) = constraints::decode_basic_constraints(payload)?;
                Some((ExtensionValue::BasicConstraints(v), f))
            }
            "keyUsage" => {
                let (v, f) = constraints::decode_key_usage(payload)?;
                Some((ExtensionValue::KeyUsage(v), f))
            }
            "subjectAltName" => {
                let (v, f) = names::decode_subject_alt_name(payload)?;
                Some((ExtensionValue::SubjectAltName(v), f))
            }
            "extKeyUsage" => {
                let (v, f) = names::decode_extended_key_usage(payload)?;
                Some((ExtensionValue::ExtendedKeyUsage(v), f))
            }
            "crlDistributionPoints" => {
                let (v, f) = names::decode_crl_distribution_points(payload)?;
                Some((ExtensionValue::CrlDistributionPoints(v), f))
            }
            "qcStatements" => {
                let (v, f) = crate::qc::decode(payload)?;
                Some((ExtensionValue::QcStatements(v), f))
            }
            "preCertPoison" => Some((ExtensionValue::PreCertPoison, Vec::new())),
            _ => None,
        };

        let (name, value, findings) = match dispatch {
            Some((value, findings)) => (oid::name(&oid_string).to_string(), value, findings),
            None => ("unknown".to_string(), ExtensionValue::Unknown, Vec::new()),
        };

        Ok(Extension {
            oid: oid_string,
            name,
            critical,
            raw: payload.to_vec(),
            findings,
            value,
        })
    }

    /// Logical extension name, or `"unknown"` for unrecognized OIDs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted-decimal extension OID.
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Unique lookup key: the logical name for recognized extensions, the
    /// original OID string for unknown ones.
    pub fn key(&self) -> &str {
        if matches!(self.value, ExtensionValue::Unknown) {
            &self.oid
        } else {
            &self.name
        }
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Raw payload octets (the extnValue content).
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn value(&self) -> &ExtensionValue {
        &self.value
    }

    /// Human-reference documentation link for this extension type.
    /// Purely descriptive; never drives behavior.
    pub fn doc_uri(&self) -> &'static str {
        match self.value {
            ExtensionValue::AuthorityInfoAccess(_) => {
                "https://tools.ietf.org/html/rfc5280#section-4.2.2.1"
            }
            ExtensionValue::AuthorityKeyIdentifier(_) => {
                "https://tools.ietf.org/html/rfc5280#section-4.2.1.1"
            }
            ExtensionValue::SubjectKeyIdentifier(_) => {
                "https://tools.ietf.org/html/rfc5280#section-4.2.1.2"
            }
            ExtensionValue::CertificatePolicies(_) => {
                "https://tools.ietf.org/html/rfc5280#section-4.2.1.4"
            }
            ExtensionValue::BasicConstraints(_) => {
                "https://tools.ietf.org/html/rfc5280#section-4.2.1.9"
            }
            ExtensionValue::KeyUsage(_) => "https://tools.ietf.org/html/rfc5280#section-4.2.1.3",
            ExtensionValue::SubjectAltName(_) => {
                "https://tools.ietf.org/html/rfc5280#section-4.2.1.6"
            }
            ExtensionValue::ExtendedKeyUsage(_) => {
                "https://tools.ietf.org/html/rfc5280#section-4.2.1.12"
            }
            ExtensionValue::CrlDistributionPoints(_) => {
                "https://tools.ietf.org/html/rfc5280#section-4.2.1.13"
            }
            ExtensionValue::QcStatements(_) => {
                "https://tools.ietf.org/html/rfc3739#section-3.2.6"
            }
            ExtensionValue::PreCertPoison => "https://tools.ietf.org/html/rfc6962#section-3.1",
            ExtensionValue::Unknown => "https://tools.ietf.org/html/rfc5280#section-4.2",
        }
    }

    /// Normalized attribute export, merged into the certificate's report.
    ///
    /// `ctx` carries the certificate fields extension descriptions may
    /// legitimately react to (currently the not-before date used by the
    /// QCCompliance statement wording).
    pub fn attributes(&self, ctx: &CertificateContext) -> serde_json::Value {
        match &self.value {
            ExtensionValue::AuthorityInfoAccess(v) => json!({
                "ocsp": v.ocsp,
                "caIssuers": v.ca_issuers,
            }),
            ExtensionValue::AuthorityKeyIdentifier(v) => match &v.key_identifier {
                Some(keyid) => json!({ "akiHex": hex::encode(keyid) }),
                None => json!({}),
            },
            ExtensionValue::SubjectKeyIdentifier(v) => json!({
                "skiHex": hex::encode(&v.key_identifier),
            }),
            ExtensionValue::CertificatePolicies(v) => {
                if v.policies.is_empty() {
                    json!({})
                } else {
                    let policies: Vec<serde_json::Value> =
                        v.policies.iter().map(PolicyInformation::attributes).collect();
                    json!({ "issuer": { "policies": policies } })
                }
            }
            ExtensionValue::BasicConstraints(v) => json!({
                "basicConstraints": {
                    "isCA": v.is_ca,
                    "pathLength": v.path_length,
                },
            }),
            ExtensionValue::KeyUsage(v) => json!({ "keyUsage": v.names() }),
            ExtensionValue::SubjectAltName(v) => json!({
                "subjectAltNames": v.names.iter().map(GeneralNameValue::render).collect::<Vec<_>>(),
            }),
            ExtensionValue::ExtendedKeyUsage(v) => json!({ "extendedKeyUsage": v.purposes }),
            ExtensionValue::CrlDistributionPoints(v) => json!({
                "crlDistributionPoints": v.uris,
            }),
            ExtensionValue::QcStatements(v) => v.attributes(ctx),
            ExtensionValue::PreCertPoison => json!({ "preCertPoison": true }),
            ExtensionValue::Unknown => {
                let mut entries = serde_json::Map::new();
                entries.insert(self.oid.clone(), json!(util::base64_encode(&self.raw)));
                json!({ "unRecognizedExtensions": entries })
            }
        }
    }
}
