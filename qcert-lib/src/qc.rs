//! eIDAS qcStatements decoding (RFC 3739 / ETSI EN 319 412-5).
//!
//! Structurally this mirrors the extension dispatch one layer down: a
//! SEQUENCE of statement entries, each an OID plus optional content, routed
//! by OID to a typed decoder.  Unrecognized statement OIDs inside this
//! known extension degrade to a warning finding plus an opaque holder.

use crate::certificate::CertificateContext;
use crate::der::{self, TAG_SEQUENCE};
use crate::findings::Finding;
use crate::oid;
use crate::util;
use crate::QcertError;
use serde::Serialize;
use serde_json::json;

const COMPONENT: &str = "qcStatements";

/// Regulation (EU) No 910/2014 applies to certificates issued on or after
/// this instant (1 July 2016, as a Unix timestamp); earlier issuance falls
/// under Directive 1999/93/EC.
const EIDAS_CUTOVER: i64 = 1_467_324_000;

/// A qcStatements extension payload: the decoded statement set.
#[derive(Debug, Clone, Default)]
pub struct QcStatements {
    pub statements: Vec<QcStatement>,
}

/// One decoded QCStatement, with its raw entry bytes retained.
#[derive(Debug, Clone)]
pub struct QcStatement {
    name: String,
    oid: String,
    raw: Vec<u8>,
    value: QcStatementValue,
}

/// Typed statement payloads.
#[derive(Debug, Clone)]
pub enum QcStatementValue {
    /// The certificate is an EU qualified certificate.
    Compliance,
    /// The private key resides in a qualified signature/seal creation device.
    Sscd,
    /// Qualified-certificate type: esign, eseal, and/or web.
    QualifiedType(Vec<String>),
    /// PKI Disclosure Statement locations.
    PdsLocations(Vec<PdsLocation>),
    /// RFC 3739 QCSyntax-v2, optionally carrying a semantics identifier.
    SyntaxV2 { semantics: Option<String> },
    /// Statement OIDs this decoder does not recognize.
    Unknown,
}

/// One PKI Disclosure Statement location.
#[derive(Debug, Clone, Serialize)]
pub struct PdsLocation {
    pub url: String,
    pub language: String,
}

impl QcStatement {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Raw DER of this statement entry.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn value(&self) -> &QcStatementValue {
        &self.value
    }

    /// Human-readable statement description.
    ///
    /// The QCCompliance wording depends on the owning certificate's
    /// not-before date; that context is passed in explicitly (the statement
    /// holds no back-reference to the certificate).
    pub fn description(&self, ctx: Option<&CertificateContext>) -> String {
        match &self.value {
            QcStatementValue::Compliance => match ctx {
                Some(ctx) if ctx.not_before >= EIDAS_CUTOVER => {
                    "The certificate is an EU qualified certificate that is issued \
                     according to Annex I, III or IV of the Regulation (EU) No 910/2014."
                        .to_string()
                }
                Some(_) => "The certificate is an EU qualified certificate that is \
                            issued according to Directive 1999/93/EC"
                    .to_string(),
                None => "The certificate is an EU qualified certificate that is issued \
                         according to Directive 1999/93/EC or the Annex I, III or IV of \
                         the Regulation (EU) No 910/2014 whichever is in force at the \
                         time of issuance."
                    .to_string(),
            },
            QcStatementValue::Sscd => "The private key related to the certified public \
                                       key resides in a qualified signature/seal creation \
                                       device (QSCD)"
                .to_string(),
            QcStatementValue::QualifiedType(types) => {
                format!("Qualified certificate type: {}", types.join(", "))
            }
            QcStatementValue::PdsLocations(locations) => format!(
                "PKI Disclosure Statements: {}",
                locations
                    .iter()
                    .map(|l| format!("{} ({})", l.url, l.language))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            QcStatementValue::SyntaxV2 { semantics } => match semantics {
                Some(semantics) => format!("QCSyntax-v2 semantics: {}", semantics),
                None => "QCSyntax-v2".to_string(),
            },
            QcStatementValue::Unknown => format!("Unrecognised qcStatement {}", self.oid),
        }
    }

    fn attribute_value(&self, ctx: &CertificateContext) -> serde_json::Value {
        match &self.value {
            QcStatementValue::QualifiedType(types) => json!(types),
            QcStatementValue::PdsLocations(locations) => json!(locations),
            QcStatementValue::Unknown => json!(util::base64_encode(&self.raw)),
            _ => json!(self.description(Some(ctx))),
        }
    }
}

impl QcStatements {
    /// Decode a qcStatements extension payload directly.  Returns the
    /// statement set together with any findings for unrecognized
    /// statement OIDs.
    pub fn from_der(payload: &[u8]) -> Result<(QcStatements, Vec<Finding>), QcertError> {
        decode(payload)
    }

    pub fn statement_names(&self) -> Vec<String> {
        self.statements.iter().map(|s| s.name.clone()).collect()
    }

    pub fn statement(&self, name: &str) -> Option<&QcStatement> {
        self.statements.iter().find(|s| s.name == name)
    }

    /// All PDS locations across the statement set.
    pub fn pds_locations(&self) -> Vec<&PdsLocation> {
        self.statements
            .iter()
            .filter_map(|s| match &s.value {
                QcStatementValue::PdsLocations(locations) => Some(locations.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Attribute export for the owning certificate's report.
    pub fn attributes(&self, ctx: &CertificateContext) -> serde_json::Value {
        let mut statements = serde_json::Map::new();
        for statement in &self.statements {
            statements.insert(statement.name.clone(), statement.attribute_value(ctx));
        }
        let mut out = serde_json::Map::new();
        out.insert("qcStatements".to_string(), serde_json::Value::Object(statements));
        if let Some(compliance) = self
            .statements
            .iter()
            .find(|s| matches!(s.value, QcStatementValue::Compliance))
        {
            out.insert(
                "qualification".to_string(),
                json!({ "qualified": compliance.description(Some(ctx)) }),
            );
        }
        serde_json::Value::Object(out)
    }
}

/// Decode a qcStatements payload (SEQUENCE OF QCStatement).
pub(crate) fn decode(payload: &[u8]) -> Result<(QcStatements, Vec<Finding>), QcertError> {
    let seq = der::parse_sequence(payload)?;
    let mut value = QcStatements::default();
    let mut findings = Vec::new();

    for entry in seq.children()? {
        if !entry.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected QCStatement SEQUENCE", entry.raw));
        }
        let fields = entry.children()?;
        let oid_el = fields
            .first()
            .ok_or_else(|| der::explain("Empty QCStatement", entry.raw))?;
        let statement_oid = oid_el.as_oid_string()?;
        let info = fields.get(1);

        let (name, statement_value) = match oid::name(&statement_oid) {
            "qcs-QcCompliance" => ("QCComplianceStatement".to_string(), QcStatementValue::Compliance),
            "QcSSCD" => ("QCSSCD".to_string(), QcStatementValue::Sscd),
            "QcType" => {
                let types = decode_qualified_types(info, &entry)?;
                let name = if types.is_empty() {
                    "QCQualifiedType".to_string()
                } else {
                    format!("QCQualifiedType-{}", types.join("+"))
                };
                (name, QcStatementValue::QualifiedType(types))
            }
            "QcPDS" => {
                let locations = decode_pds_locations(info, &entry)?;
                ("QCPDSs".to_string(), QcStatementValue::PdsLocations(locations))
            }
            "id-qcs-pkixQCSyntax-v2" => {
                let semantics = decode_semantics(info)?;
                let name = match semantics.as_deref() {
                    Some(semantics) => format!("QCSyntaxV2-{}", semantics),
                    None => "QCSyntaxV2".to_string(),
                };
                (name, QcStatementValue::SyntaxV2 { semantics })
            }
            statement_name => {
                findings.push(Finding::warning(
                    COMPONENT,
                    format!(
                        "Unrecognised qcStatement OID {} ({}): {}",
                        statement_oid,
                        statement_name,
                        util::base64_encode(entry.raw)
                    ),
                ));
                (statement_oid.clone(), QcStatementValue::Unknown)
            }
        };

        value.statements.push(QcStatement {
            name,
            oid: statement_oid,
            raw: entry.raw.to_vec(),
            value: statement_value,
        });
    }

    Ok((value, findings))
}

fn decode_qualified_types(
    info: Option<&der::Element<'_>>,
    entry: &der::Element<'_>,
) -> Result<Vec<String>, QcertError> {
    let info = info.ok_or_else(|| der::explain("Missing QcType statementInfo", entry.raw))?;
    if !info.is_universal(TAG_SEQUENCE) {
        return Err(der::explain("Expected QcType SEQUENCE", info.raw));
    }
    let mut types = Vec::new();
    for type_el in info.children()? {
        let type_oid = type_el.as_oid_string()?;
        let type_name = match oid::name(&type_oid) {
            oid::UNKNOWN => type_oid,
            name => name.to_string(),
        };
        types.push(type_name);
    }
    Ok(types)
}

fn decode_pds_locations(
    info: Option<&der::Element<'_>>,
    entry: &der::Element<'_>,
) -> Result<Vec<PdsLocation>, QcertError> {
    let info = info.ok_or_else(|| der::explain("Missing QcPDS statementInfo", entry.raw))?;
    if !info.is_universal(TAG_SEQUENCE) {
        return Err(der::explain("Expected PdsLocations SEQUENCE", info.raw));
    }
    let mut locations = Vec::new();
    for location in info.children()? {
        if !location.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected PdsLocation SEQUENCE", location.raw));
        }
        let parts = location.children()?;
        let url_el = parts
            .first()
            .ok_or_else(|| der::explain("Missing PdsLocation url", location.raw))?;
        let language_el = parts
            .get(1)
            .ok_or_else(|| der::explain("Missing PdsLocation language", location.raw))?;
        locations.push(PdsLocation {
            url: url_el.as_str()?.to_string(),
            language: language_el.as_str()?.to_string(),
        });
    }
    Ok(locations)
}

fn decode_semantics(info: Option<&der::Element<'_>>) -> Result<Option<String>, QcertError> {
    let Some(info) = info else {
        return Ok(None);
    };
    if !info.is_universal(TAG_SEQUENCE) {
        return Ok(None);
    }
    for el in info.children()? {
        // semanticsIdentifier is the only OID member of SemanticsInformation
        if let Ok(semantics_oid) = el.as_oid_string() {
            return Ok(Some(match oid::name(&semantics_oid) {
                oid::UNKNOWN => semantics_oid,
                name => name.to_string(),
            }));
        }
    }
    Ok(None)
}
