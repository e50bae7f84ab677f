//! Certificate Policies decoding.
//!
//! This decoder is fully fail-soft: a malformed payload degrades to a
//! single finding with zero policies recorded, and each unrecognized
//! policy OID degrades to its own finding.  Finding severity follows the
//! extension's own criticality flag: `critical` when the extension is
//! marked critical, `warning` otherwise.

use crate::der::{self, TAG_IA5_STRING, TAG_SEQUENCE};
use crate::findings::{Finding, Severity};
use crate::oid;
use crate::util;
use crate::QcertError;
use serde_json::json;

const COMPONENT: &str = "certificatePolicies";

/// Decoded certificatePolicies extension.
#[derive(Debug, Clone, Default)]
pub struct CertificatePolicies {
    pub policies: Vec<PolicyInformation>,
}

/// One recognized policy, with any CPS-URI qualifiers.
#[derive(Debug, Clone)]
pub struct PolicyInformation {
    pub oid: String,
    pub name: &'static str,
    pub cps_uris: Vec<String>,
}

impl PolicyInformation {
    pub(crate) fn attributes(&self) -> serde_json::Value {
        if self.cps_uris.is_empty() {
            json!({ "oid": self.oid, "name": self.name })
        } else {
            json!({ "oid": self.oid, "name": self.name, "cps": self.cps_uris })
        }
    }
}

pub(crate) fn decode(
    payload: &[u8],
    critical: bool,
) -> Result<(CertificatePolicies, Vec<Finding>), QcertError> {
    let severity = if critical {
        Severity::Critical
    } else {
        Severity::Warning
    };

    let elements = match der::parse_sequence(payload).and_then(|seq| seq.children()) {
        Ok(elements) => elements,
        Err(e) => {
            return Ok((
                CertificatePolicies::default(),
                vec![Finding::new(
                    COMPONENT,
                    severity,
                    format!(
                        "Malformed certificatePolicies extension '{}': {}",
                        e,
                        util::base64_encode(payload)
                    ),
                )],
            ));
        }
    };

    let mut value = CertificatePolicies::default();
    let mut findings = Vec::new();

    for policy_el in elements {
        if !policy_el.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected PolicyInformation SEQUENCE", policy_el.raw));
        }
        let fields = policy_el.children()?;
        let oid_el = fields
            .first()
            .ok_or_else(|| der::explain("Empty PolicyInformation", policy_el.raw))?;
        let policy_oid = oid_el.as_oid_string()?;
        let policy_name = oid::name(&policy_oid);

        if policy_name == oid::UNKNOWN {
            findings.push(Finding::new(
                COMPONENT,
                severity,
                format!(
                    "Unrecognised certificatePolicy OID {} ({}): {}",
                    policy_oid,
                    policy_name,
                    util::base64_encode(policy_el.raw)
                ),
            ));
            continue;
        }

        let mut cps_uris = Vec::new();
        if let Some(qualifiers) = fields.get(1) {
            if qualifiers.is_universal(TAG_SEQUENCE) {
                for qualifier in qualifiers.children()? {
                    let parts = qualifier.children()?;
                    if let (Some(qualifier_oid), Some(qualifier_value)) =
                        (parts.first(), parts.get(1))
                    {
                        if qualifier_oid.as_oid_string()? == oid::POLICY_QUALIFIER_CPS
                            && qualifier_value.is_universal(TAG_IA5_STRING)
                        {
                            cps_uris.push(qualifier_value.as_str()?.to_string());
                        }
                    }
                }
            }
        }

        value.policies.push(PolicyInformation {
            oid: policy_oid,
            name: policy_name,
            cps_uris,
        });
    }

    Ok((value, findings))
}
