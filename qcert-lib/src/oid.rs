//! Centralized OID registry used throughout qcert-lib.
//!
//! Object Identifiers (OIDs) are defined by ITU-T X.660 and referenced
//! extensively in RFC 5280 (X.509), RFC 3739 (qualified certificates), and
//! ETSI EN 319 412-5 (eIDAS qcStatements).  Grouping them here avoids magic
//! strings scattered across modules and gives each OID a readable name.
//!
//! [`name`] is a total function: any identifier outside the table maps to
//! the sentinel `"unknown"`.  The table is built once, before first use,
//! and is read-only for the life of the process.

use std::collections::HashMap;
use std::sync::OnceLock;

// ── X.509 Distinguished Name attributes (RFC 4519 / X.520) ──────────────

pub const COMMON_NAME: &str = "2.5.4.3";
pub const SURNAME: &str = "2.5.4.4";
pub const SERIAL_NUMBER: &str = "2.5.4.5";
pub const COUNTRY: &str = "2.5.4.6";
pub const LOCALITY: &str = "2.5.4.7";
pub const STATE_OR_PROVINCE: &str = "2.5.4.8";
pub const STREET_ADDRESS: &str = "2.5.4.9";
pub const ORGANIZATION: &str = "2.5.4.10";
pub const ORGANIZATIONAL_UNIT: &str = "2.5.4.11";
pub const TITLE: &str = "2.5.4.12";
pub const POSTAL_CODE: &str = "2.5.4.17";
pub const GIVEN_NAME: &str = "2.5.4.42";
pub const PSEUDONYM: &str = "2.5.4.65";
pub const ORGANIZATION_IDENTIFIER: &str = "2.5.4.97";
pub const EMAIL_ADDRESS: &str = "1.2.840.113549.1.9.1"; // PKCS#9
pub const DOMAIN_COMPONENT: &str = "0.9.2342.19200300.100.1.25";

// ── Public key types ─────────────────────────────────────────────────────

pub const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
pub const RSASSA_PSS: &str = "1.2.840.113549.1.1.10";
pub const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

// ── X.509v3 extensions (RFC 5280 Section 4.2) ───────────────────────────

pub const EXT_SUBJECT_KEY_ID: &str = "2.5.29.14";
pub const EXT_KEY_USAGE: &str = "2.5.29.15";
pub const EXT_SUBJECT_ALT_NAME: &str = "2.5.29.17";
pub const EXT_BASIC_CONSTRAINTS: &str = "2.5.29.19";
pub const EXT_CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";
pub const EXT_CERTIFICATE_POLICIES: &str = "2.5.29.32";
pub const EXT_AUTHORITY_KEY_ID: &str = "2.5.29.35";
pub const EXT_EXTENDED_KEY_USAGE: &str = "2.5.29.37";
pub const EXT_AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
pub const EXT_QC_STATEMENTS: &str = "1.3.6.1.5.5.7.1.3";
pub const EXT_CT_POISON: &str = "1.3.6.1.4.1.11129.2.4.3";

// ── PKIX access methods (RFC 5280 Section 4.2.2.1) ──────────────────────

pub const ACCESS_OCSP: &str = "1.3.6.1.5.5.7.48.1";
pub const ACCESS_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

// ── Extended Key Usage values (RFC 5280 Section 4.2.1.12) ────────────────

pub const EKU_ANY: &str = "2.5.29.37.0";
pub const EKU_SERVER_AUTH: &str = "1.3.6.1.5.5.7.3.1";
pub const EKU_CLIENT_AUTH: &str = "1.3.6.1.5.5.7.3.2";
pub const EKU_CODE_SIGNING: &str = "1.3.6.1.5.5.7.3.3";
pub const EKU_EMAIL_PROTECTION: &str = "1.3.6.1.5.5.7.3.4";
pub const EKU_TIME_STAMPING: &str = "1.3.6.1.5.5.7.3.8";
pub const EKU_OCSP_SIGNING: &str = "1.3.6.1.5.5.7.3.9";

// ── Certificate policies ─────────────────────────────────────────────────

pub const ANY_POLICY: &str = "2.5.29.32.0";
pub const QCP_NATURAL: &str = "0.4.0.194112.1.0";
pub const QCP_LEGAL: &str = "0.4.0.194112.1.1";
pub const QCP_NATURAL_QSCD: &str = "0.4.0.194112.1.2";
pub const QCP_LEGAL_QSCD: &str = "0.4.0.194112.1.3";
pub const QCP_WEB: &str = "0.4.0.194112.1.4";
pub const CAB_EV: &str = "2.23.140.1.1";
pub const CAB_DV: &str = "2.23.140.1.2.1";
pub const CAB_OV: &str = "2.23.140.1.2.2";
pub const CAB_IV: &str = "2.23.140.1.2.3";
pub const POLICY_QUALIFIER_CPS: &str = "1.3.6.1.5.5.7.2.1";
pub const POLICY_QUALIFIER_UNOTICE: &str = "1.3.6.1.5.5.7.2.2";

// ── eIDAS qcStatements (RFC 3739 / ETSI EN 319 412-5) ───────────────────

pub const PKIX_QCSYNTAX_V2: &str = "1.3.6.1.5.5.7.11.2";
pub const QCS_QC_COMPLIANCE: &str = "0.4.0.1862.1.1";
pub const QCS_QC_LIMIT_VALUE: &str = "0.4.0.1862.1.2";
pub const QCS_QC_RETENTION_PERIOD: &str = "0.4.0.1862.1.3";
pub const QCS_QC_SSCD: &str = "0.4.0.1862.1.4";
pub const QCS_QC_PDS: &str = "0.4.0.1862.1.5";
pub const QCS_QC_TYPE: &str = "0.4.0.1862.1.6";
pub const QC_TYPE_ESIGN: &str = "0.4.0.1862.1.6.1";
pub const QC_TYPE_ESEAL: &str = "0.4.0.1862.1.6.2";
pub const QC_TYPE_WEB: &str = "0.4.0.1862.1.6.3";
pub const QCS_SEMANTICS_NATURAL: &str = "0.4.0.194121.1.1";
pub const QCS_SEMANTICS_LEGAL: &str = "0.4.0.194121.1.2";

// ── PSD2 (ETSI TS 119 495) ──────────────────────────────────────────────

pub const ROLE_OF_PSP: &str = "0.4.0.19495.1";
pub const PSP_AS: &str = "0.4.0.19495.1.1";
pub const PSP_PI: &str = "0.4.0.19495.1.2";
pub const PSP_AI: &str = "0.4.0.19495.1.3";
pub const PSP_IC: &str = "0.4.0.19495.1.4";
pub const PSD2: &str = "0.4.0.19495.2";

/// Sentinel returned by [`name`] for identifiers outside the registry.
pub const UNKNOWN: &str = "unknown";

fn registry() -> &'static HashMap<&'static str, &'static str> {
    static REGISTRY: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut m = HashMap::new();
        // Distinguished Name attributes
        m.insert(COMMON_NAME, "commonName");
        m.insert(SURNAME, "surname");
        m.insert(SERIAL_NUMBER, "serialNumber");
        m.insert(COUNTRY, "countryName");
        m.insert(LOCALITY, "localityName");
        m.insert(STATE_OR_PROVINCE, "stateOrProvinceName");
        m.insert(STREET_ADDRESS, "streetAddress");
        m.insert(ORGANIZATION, "organizationName");
        m.insert(ORGANIZATIONAL_UNIT, "organizationalUnitName");
        m.insert(TITLE, "title");
        m.insert(POSTAL_CODE, "postalCode");
        m.insert(GIVEN_NAME, "givenName");
        m.insert(PSEUDONYM, "pseudonym");
        m.insert(ORGANIZATION_IDENTIFIER, "organizationIdentifier");
        m.insert(EMAIL_ADDRESS, "emailAddress");
        m.insert(DOMAIN_COMPONENT, "domainComponent");
        // Public key types
        m.insert(RSA_ENCRYPTION, "rsaEncryption");
        m.insert(RSASSA_PSS, "RSASSA-PSS");
        m.insert(EC_PUBLIC_KEY, "ecPublicKey");
        // Extensions
        m.insert(EXT_SUBJECT_KEY_ID, "subjectKeyIdentifier");
        m.insert(EXT_KEY_USAGE, "keyUsage");
        m.insert(EXT_SUBJECT_ALT_NAME, "subjectAltName");
        m.insert(EXT_BASIC_CONSTRAINTS, "basicConstraints");
        m.insert(EXT_CRL_DISTRIBUTION_POINTS, "crlDistributionPoints");
        m.insert(EXT_CERTIFICATE_POLICIES, "certificatePolicies");
        m.insert(EXT_AUTHORITY_KEY_ID, "authorityKeyIdentifier");
        m.insert(EXT_EXTENDED_KEY_USAGE, "extKeyUsage");
        m.insert(EXT_AUTHORITY_INFO_ACCESS, "authorityInfoAccess");
        m.insert(EXT_QC_STATEMENTS, "qcStatements");
        m.insert(EXT_CT_POISON, "preCertPoison");
        // Access methods
        m.insert(ACCESS_OCSP, "ocsp");
        m.insert(ACCESS_CA_ISSUERS, "caIssuers");
        // Extended key usage
        m.insert(EKU_ANY, "anyExtendedKeyUsage");
        m.insert(EKU_SERVER_AUTH, "serverAuth");
        m.insert(EKU_CLIENT_AUTH, "clientAuth");
        m.insert(EKU_CODE_SIGNING, "codeSigning");
        m.insert(EKU_EMAIL_PROTECTION, "emailProtection");
        m.insert(EKU_TIME_STAMPING, "timeStamping");
        m.insert(EKU_OCSP_SIGNING, "OCSPSigning");
        // Certificate policies
        m.insert(ANY_POLICY, "anyPolicy");
        m.insert(QCP_NATURAL, "QCP-n");
        m.insert(QCP_LEGAL, "QCP-l");
        m.insert(QCP_NATURAL_QSCD, "QCP-n-qscd");
        m.insert(QCP_LEGAL_QSCD, "QCP-l-qscd");
        m.insert(QCP_WEB, "QCP-w");
        m.insert(CAB_EV, "extended-validation");
        m.insert(CAB_DV, "domain-validated");
        m.insert(CAB_OV, "organization-validated");
        m.insert(CAB_IV, "individual-validated");
        m.insert(POLICY_QUALIFIER_CPS, "cps");
        m.insert(POLICY_QUALIFIER_UNOTICE, "unotice");
        // qcStatements
        m.insert(PKIX_QCSYNTAX_V2, "id-qcs-pkixQCSyntax-v2");
        m.insert(QCS_QC_COMPLIANCE, "qcs-QcCompliance");
        m.insert(QCS_QC_LIMIT_VALUE, "QcLimitValue");
        m.insert(QCS_QC_RETENTION_PERIOD, "QcRetentionPeriod");
        m.insert(QCS_QC_SSCD, "QcSSCD");
        m.insert(QCS_QC_PDS, "QcPDS");
        m.insert(QCS_QC_TYPE, "QcType");
        m.insert(QC_TYPE_ESIGN, "esign");
        m.insert(QC_TYPE_ESEAL, "eseal");
        m.insert(QC_TYPE_WEB, "web");
        m.insert(QCS_SEMANTICS_NATURAL, "NaturalPerson");
        m.insert(QCS_SEMANTICS_LEGAL, "LegalPerson");
        // PSD2
        m.insert(ROLE_OF_PSP, "RoleOfPsp");
        m.insert(PSP_AS, "PSP_AS");
        m.insert(PSP_PI, "PSP_PI");
        m.insert(PSP_AI, "PSP_AI");
        m.insert(PSP_IC, "PSP_IC");
        m.insert(PSD2, "PSD2");
        m
    })
}

/// Resolve a dotted-decimal OID string to its canonical name.
///
/// Total: unrecognized identifiers map to [`UNKNOWN`], never an error.
pub fn name(oid: &str) -> &'static str {
    registry().get(oid).copied().unwrap_or(UNKNOWN)
}

fn short_names() -> &'static HashMap<&'static str, &'static str> {
    static SHORT: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    SHORT.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert("commonName", "CN");
        m.insert("surname", "SN");
        m.insert("countryName", "C");
        m.insert("localityName", "L");
        m.insert("stateOrProvinceName", "ST");
        m.insert("streetAddress", "street");
        m.insert("organizationName", "O");
        m.insert("organizationalUnitName", "OU");
        m.insert("givenName", "GN");
        m.insert("title", "T");
        m.insert("domainComponent", "DC");
        m.insert("emailAddress", "emailAddress");
        m
    })
}

/// Map a canonical attribute name to its DN-rendering abbreviation
/// (e.g. `commonName` → `CN`).  Unmapped names echo their input.
pub fn short_name<'a>(name: &'a str) -> &'a str {
    short_names().get(name).copied().unwrap_or(name)
}
