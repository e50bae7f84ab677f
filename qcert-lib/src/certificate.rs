//! The certificate aggregate: TBS field decoding, extension map, derived
//! queries, issuer-chain linking, and the normalized attribute report.

use crate::convert;
use crate::der::{self, TAG_BIT_STRING, TAG_INTEGER, TAG_SEQUENCE};
use crate::dn::DistinguishedName;
use crate::extension::{BasicConstraints, Extension, ExtensionValue, KeyUsage};
use crate::findings::Finding;
use crate::fingerprint::{compute_fingerprint, DigestAlgorithm};
use crate::oid;
use crate::qc::QcStatements;
use crate::revocation::RevocationSource;
use crate::signature::{CryptoVerifier, SignatureVerifier};
use crate::QcertError;
use num_bigint::BigInt;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};
use x509_parser::der_parser::asn1_rs::Class;

/// Certificate fields an extension's attribute export may react to.
///
/// Extensions are decoded from their payload alone; where a description
/// legitimately depends on certificate context (the QCCompliance wording
/// keyed on issuance date), that context is passed in through this struct
/// rather than held as a back-reference.
#[derive(Debug, Clone, Copy)]
pub struct CertificateContext {
    /// Start of the validity window as a Unix timestamp.
    pub not_before: i64,
}

/// A candidate issuer for [`X509Certificate::accept_issuer`]: either an
/// already-constructed certificate or raw bytes to be decoded first.
pub enum IssuerCandidate<'a> {
    Certificate(Arc<X509Certificate>),
    Bytes(&'a [u8]),
}

impl From<Arc<X509Certificate>> for IssuerCandidate<'static> {
    fn from(cert: Arc<X509Certificate>) -> Self {
        IssuerCandidate::Certificate(cert)
    }
}

impl From<X509Certificate> for IssuerCandidate<'static> {
    fn from(cert: X509Certificate) -> Self {
        IssuerCandidate::Certificate(Arc::new(cert))
    }
}

impl<'a> From<&'a [u8]> for IssuerCandidate<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        IssuerCandidate::Bytes(bytes)
    }
}

/// A decoded X.509 v3 certificate.
///
/// Constructed once from an immutable byte buffer; derived views are pure
/// functions of the stored state.  The issuer map grows only through
/// [`accept_issuer`](Self::accept_issuer) and entries are never removed.
/// Accepted issuers are shared (`Arc`), since one issuer commonly anchors
/// many subject certificates.
pub struct X509Certificate {
    der: Vec<u8>,
    serial: BigInt,
    not_before: i64,
    not_after: i64,
    issuer_raw: Vec<u8>,
    subject_raw: Vec<u8>,
    public_key_der: Vec<u8>,
    extensions: Vec<Extension>,
    findings: Vec<Finding>,
    issuers: BTreeMap<String, Arc<X509Certificate>>,
    crl: Option<Arc<dyn RevocationSource>>,
    trust_service: Option<serde_json::Value>,
    attributes: OnceLock<serde_json::Value>,
}

impl std::fmt::Debug for X509Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X509Certificate")
            .field("serial", &self.serial.to_string())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl X509Certificate {
    /// Decode a certificate from PEM, bare base64 (detected by the `MII`
    /// prefix), or raw DER.
    ///
    /// Returns `Ok(None)` for structurally valid certificates whose version
    /// is not 3: they produce no usable object, but are not a decode error.
    pub fn from_bytes(candidate: &[u8]) -> Result<Option<Self>, QcertError> {
        let der = convert::normalize_to_der(candidate)?;
        Self::from_der(&der)
    }

    /// Decode a certificate from a PEM string.
    pub fn from_pem(pem: &str) -> Result<Option<Self>, QcertError> {
        Self::from_bytes(pem.as_bytes())
    }

    /// Decode a certificate from DER bytes.  Trailing bytes beyond the
    /// outer SEQUENCE are ignored and excluded from the stored encoding.
    pub fn from_der(input: &[u8]) -> Result<Option<Self>, QcertError> {
        let (cert_el, _) = der::parse_element(input)?;
        if !cert_el.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected Certificate SEQUENCE", cert_el.raw));
        }
        let parts = cert_el.children()?;
        let tbs = parts
            .first()
            .ok_or_else(|| der::explain("Missing tbsCertificate", cert_el.raw))?;
        if !tbs.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected tbsCertificate SEQUENCE", tbs.raw));
        }
        let signature_algorithm = parts
            .get(1)
            .ok_or_else(|| der::explain("Missing signatureAlgorithm", cert_el.raw))?;
        if !signature_algorithm.is_universal(TAG_SEQUENCE) {
            return Err(der::explain(
                "Expected signatureAlgorithm SEQUENCE",
                signature_algorithm.raw,
            ));
        }
        let signature_value = parts
            .get(2)
            .ok_or_else(|| der::explain("Missing signatureValue", cert_el.raw))?;
        if !signature_value.is_universal(TAG_BIT_STRING) {
            return Err(der::explain(
                "Expected signatureValue BIT STRING",
                signature_value.raw,
            ));
        }

        let tbs_fields = tbs.children()?;
        let version_el = tbs_fields
            .first()
            .ok_or_else(|| der::explain("Empty tbsCertificate", tbs.raw))?;
        let version = match version_el.class() {
            // No [0] version field: a v1 certificate starts directly with
            // its serial INTEGER.
            Class::Universal if version_el.tag_number() == TAG_INTEGER => 0,
            Class::ContextSpecific if version_el.tag_number() == 0 => {
                let (inner, _) = der::parse_element(version_el.content())?;
                inner.as_u64()?
            }
            class => {
                return Err(QcertError::ParseError(format!(
                    "Trying to get version tag as {:?}: {}",
                    class,
                    crate::util::base64_encode(tbs.raw)
                )))
            }
        };
        if version != 2 {
            // Only X.509 v3 certificates are supported; anything else
            // produces no usable certificate.
            return Ok(None);
        }

        let serial_el = tbs_fields
            .get(1)
            .ok_or_else(|| der::explain("Missing serialNumber", tbs.raw))?;
        if !serial_el.is_universal(TAG_INTEGER) {
            return Err(der::explain("Expected serialNumber INTEGER", serial_el.raw));
        }
        let serial = BigInt::from_signed_bytes_be(serial_el.content());

        let issuer_el = tbs_fields
            .get(3)
            .ok_or_else(|| der::explain("Missing issuer Name", tbs.raw))?;
        if !issuer_el.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected issuer SEQUENCE", issuer_el.raw));
        }

        let validity = tbs_fields
            .get(4)
            .ok_or_else(|| der::explain("Missing validity", tbs.raw))?;
        if !validity.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected validity SEQUENCE", validity.raw));
        }
        let dates = validity.children()?;
        let not_before_el = dates
            .first()
            .ok_or_else(|| der::explain("Missing notBefore", validity.raw))?;
        let not_after_el = dates
            .get(1)
            .ok_or_else(|| der::explain("Missing notAfter", validity.raw))?;
        let not_before = der::wrangle_date(not_before_el)?;
        let not_after = der::wrangle_date(not_after_el)?;

        let subject_el = tbs_fields
            .get(5)
            .ok_or_else(|| der::explain("Missing subject Name", tbs.raw))?;
        if !subject_el.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected subject SEQUENCE", subject_el.raw));
        }

        let spki = tbs_fields
            .get(6)
            .ok_or_else(|| der::explain("Missing subjectPublicKeyInfo", tbs.raw))?;
        if !spki.is_universal(TAG_SEQUENCE) {
            return Err(der::explain(
                "Expected subjectPublicKeyInfo SEQUENCE",
                spki.raw,
            ));
        }
        let spki_fields = spki.children()?;
        let algorithm = spki_fields
            .first()
            .ok_or_else(|| der::explain("Missing key AlgorithmIdentifier", spki.raw))?;
        let algorithm_oid = algorithm
            .children()?
            .first()
            .ok_or_else(|| der::explain("Empty AlgorithmIdentifier", algorithm.raw))?
            .as_oid_string()?;
        match oid::name(&algorithm_oid) {
            "rsaEncryption" | "ecPublicKey" | "RSASSA-PSS" => {}
            key_type => {
                return Err(QcertError::ParseError(format!(
                    "Unrecognised Public Key Type OID {} ({})",
                    algorithm_oid, key_type
                )))
            }
        }

        let mut extensions = Vec::new();
        let mut findings = Vec::new();
        if let Some(ext_wrapper) = tbs_fields.iter().skip(7).find(|el| el.is_context(3)) {
            let ext_seq = der::parse_sequence(ext_wrapper.content())?;
            let mut seen = HashSet::new();
            for entry in ext_seq.children()? {
                let extension = Extension::from_der(entry.raw)?;
                if !seen.insert(extension.key().to_string()) {
                    return Err(QcertError::ParseError(format!(
                        "Duplicate extension {} ({})",
                        extension.key(),
                        extension.oid()
                    )));
                }
                findings.extend(extension.findings().iter().cloned());
                extensions.push(extension);
            }
        }

        Ok(Some(X509Certificate {
            der: cert_el.raw.to_vec(),
            serial,
            not_before,
            not_after,
            issuer_raw: issuer_el.raw.to_vec(),
            subject_raw: subject_el.raw.to_vec(),
            public_key_der: spki.raw.to_vec(),
            extensions,
            findings,
            issuers: BTreeMap::new(),
            crl: None,
            trust_service: None,
            attributes: OnceLock::new(),
        }))
    }

    // ── Stored state accessors ──────────────────────────────────────────

    /// The certificate's DER encoding.
    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    /// Re-emit as PEM with 64-character line wrapping.
    pub fn to_pem(&self) -> String {
        convert::der_to_pem(&self.der)
    }

    pub fn serial(&self) -> &BigInt {
        &self.serial
    }

    /// Serial number in decimal form.
    pub fn serial_decimal(&self) -> String {
        self.serial.to_string()
    }

    /// Serial number as lowercase hex over its big-endian magnitude.
    pub fn serial_hex(&self) -> String {
        hex::encode(self.serial.to_bytes_be().1)
    }

    /// Validity window `(notBefore, notAfter)` as Unix timestamps.
    pub fn dates(&self) -> (i64, i64) {
        (self.not_before, self.not_after)
    }

    pub fn not_before(&self) -> i64 {
        self.not_before
    }

    pub fn not_after(&self) -> i64 {
        self.not_after
    }

    /// Raw DER of the subjectPublicKeyInfo.
    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key_der
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Context handed to extension attribute exports.
    pub fn context(&self) -> CertificateContext {
        CertificateContext {
            not_before: self.not_before,
        }
    }

    // ── Fingerprints ────────────────────────────────────────────────────

    /// Fingerprint under a named digest algorithm (e.g. `"sha256"`).
    pub fn identifier(&self, algorithm: &str) -> Result<String, QcertError> {
        let algorithm = DigestAlgorithm::from_name(algorithm)?;
        Ok(compute_fingerprint(&self.der, algorithm))
    }

    /// Default (SHA-256) fingerprint over the full DER encoding.
    pub fn fingerprint(&self) -> String {
        compute_fingerprint(&self.der, DigestAlgorithm::Sha256)
    }

    // ── Validity predicates (exclusive bounds) ──────────────────────────

    pub fn is_started_at(&self, timestamp: i64) -> bool {
        self.not_before < timestamp
    }

    pub fn is_not_finished_at(&self, timestamp: i64) -> bool {
        self.not_after > timestamp
    }

    pub fn is_current_at(&self, timestamp: i64) -> bool {
        self.is_started_at(timestamp) && self.is_not_finished_at(timestamp)
    }

    pub fn is_current(&self) -> bool {
        self.is_current_at(now_timestamp())
    }

    // ── Extension lookups ───────────────────────────────────────────────

    pub fn has_extensions(&self) -> bool {
        !self.extensions.is_empty()
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Look up a decoded extension by its logical name (or dotted OID for
    /// unrecognized extensions).
    pub fn extension(&self, key: &str) -> Option<&Extension> {
        self.extensions.iter().find(|ext| ext.key() == key)
    }

    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(Extension::key).collect()
    }

    pub fn basic_constraints(&self) -> Option<&BasicConstraints> {
        self.extensions.iter().find_map(|ext| match ext.value() {
            ExtensionValue::BasicConstraints(bc) => Some(bc),
            _ => None,
        })
    }

    /// CA flag from BasicConstraints; false when the extension is absent.
    pub fn is_ca(&self) -> bool {
        self.basic_constraints().map(|bc| bc.is_ca).unwrap_or(false)
    }

    /// Path-length constraint; meaningful (and reported) only for CAs.
    pub fn path_length(&self) -> Option<u64> {
        if !self.is_ca() {
            return None;
        }
        self.basic_constraints().and_then(|bc| bc.path_length)
    }

    pub fn key_usage(&self) -> Option<&KeyUsage> {
        self.extensions.iter().find_map(|ext| match ext.value() {
            ExtensionValue::KeyUsage(ku) => Some(ku),
            _ => None,
        })
    }

    /// Authority key identifier bytes, if the extension carries the
    /// keyIdentifier form.  Absence is a definite signal, not an error.
    pub fn authority_key_identifier(&self) -> Option<&[u8]> {
        self.extensions.iter().find_map(|ext| match ext.value() {
            ExtensionValue::AuthorityKeyIdentifier(aki) => {
                aki.key_identifier.as_deref()
            }
            _ => None,
        })
    }

    /// Subject key identifier bytes, if present.
    pub fn subject_key_identifier(&self) -> Option<&[u8]> {
        self.extensions.iter().find_map(|ext| match ext.value() {
            ExtensionValue::SubjectKeyIdentifier(ski) => {
                Some(ski.key_identifier.as_slice())
            }
            _ => None,
        })
    }

    /// CA-issuer URIs from authorityInfoAccess; empty when absent.
    pub fn issuer_uris(&self) -> Vec<String> {
        self.extensions
            .iter()
            .find_map(|ext| match ext.value() {
                ExtensionValue::AuthorityInfoAccess(aia) => Some(aia.ca_issuers.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// OCSP responder URIs from authorityInfoAccess; empty when absent.
    pub fn ocsp_uris(&self) -> Vec<String> {
        self.extensions
            .iter()
            .find_map(|ext| match ext.value() {
                ExtensionValue::AuthorityInfoAccess(aia) => Some(aia.ocsp.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// CRL distribution point URIs; empty when absent.
    pub fn crl_distribution_points(&self) -> Vec<String> {
        self.extensions
            .iter()
            .find_map(|ext| match ext.value() {
                ExtensionValue::CrlDistributionPoints(cdp) => Some(cdp.uris.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn qc_statements(&self) -> Option<&QcStatements> {
        self.extensions.iter().find_map(|ext| match ext.value() {
            ExtensionValue::QcStatements(qc) => Some(qc),
            _ => None,
        })
    }

    pub fn has_qc_statements(&self) -> bool {
        self.qc_statements().is_some()
    }

    pub fn qc_statement_names(&self) -> Vec<String> {
        self.qc_statements()
            .map(QcStatements::statement_names)
            .unwrap_or_default()
    }

    // ── Distinguished names ─────────────────────────────────────────────

    /// Expanded subject name.  Computed fresh from the stored bytes; the
    /// decode is deterministic, so callers may cache the result.
    pub fn subject_expanded(&self) -> Result<DistinguishedName, QcertError> {
        DistinguishedName::from_der(&self.subject_raw)
    }

    /// Expanded issuer name.
    pub fn issuer_expanded(&self) -> Result<DistinguishedName, QcertError> {
        DistinguishedName::from_der(&self.issuer_raw)
    }

    /// Subject rendered as `/SHORT=value` segments.
    pub fn subject_dn(&self) -> Result<String, QcertError> {
        Ok(self.subject_expanded()?.to_dn_string())
    }

    /// Issuer rendered as `/SHORT=value` segments.
    pub fn issuer_dn(&self) -> Result<String, QcertError> {
        Ok(self.issuer_expanded()?.to_dn_string())
    }

    // ── Chain linking ───────────────────────────────────────────────────

    /// Try to accept `candidate` as an issuer of this certificate, using
    /// the default cryptographic engine.
    ///
    /// Requires, in order: textual equality of the candidate's subject DN
    /// and this certificate's issuer DN; byte-equality of this
    /// certificate's authority key identifier and the candidate's subject
    /// key identifier when both are present (absence of either skips the
    /// check); and a valid signature over this certificate under the
    /// candidate's key.  On success the candidate is recorded keyed by its
    /// fingerprint and returned.  Rejection is `Ok(None)`: probing and
    /// discarding candidates is the expected mode of trust-path search.
    /// The call is idempotent per issuer.
    pub fn accept_issuer<'a>(
        &mut self,
        candidate: impl Into<IssuerCandidate<'a>>,
    ) -> Result<Option<Arc<X509Certificate>>, QcertError> {
        self.accept_issuer_with(candidate, &CryptoVerifier)
    }

    /// [`accept_issuer`](Self::accept_issuer) with an explicit signature
    /// engine.
    pub fn accept_issuer_with<'a>(
        &mut self,
        candidate: impl Into<IssuerCandidate<'a>>,
        verifier: &dyn SignatureVerifier,
    ) -> Result<Option<Arc<X509Certificate>>, QcertError> {
        let issuer = match candidate.into() {
            IssuerCandidate::Certificate(cert) => cert,
            IssuerCandidate::Bytes(bytes) => match X509Certificate::from_bytes(bytes)? {
                Some(cert) => Arc::new(cert),
                None => return Ok(None),
            },
        };

        let issuer_fingerprint = issuer.fingerprint();
        if let Some(existing) = self.issuers.get(&issuer_fingerprint) {
            return Ok(Some(existing.clone()));
        }

        if self.issuer_dn()? != issuer.subject_dn()? {
            return Ok(None);
        }

        if let (Some(aki), Some(ski)) = (
            self.authority_key_identifier(),
            issuer.subject_key_identifier(),
        ) {
            if aki != ski {
                return Ok(None);
            }
        }

        if !verifier.verify(&self.der, &issuer.der) {
            return Ok(None);
        }

        self.issuers.insert(issuer_fingerprint, issuer.clone());
        Ok(Some(issuer))
    }

    /// Issuers accepted so far, keyed by fingerprint.  Multiple entries
    /// are possible: a certificate may be cross-signed by more than one
    /// issuer.
    pub fn issuers(&self) -> &BTreeMap<String, Arc<X509Certificate>> {
        &self.issuers
    }

    // ── Revocation ──────────────────────────────────────────────────────

    /// Bind an already-verified revocation list.  This certificate does no
    /// verification of the list itself.
    pub fn bind_crl(&mut self, crl: Arc<dyn RevocationSource>) {
        self.crl = Some(crl);
    }

    /// Whether the bound revocation list covers this serial number.
    /// `None` when no revocation list has been bound.
    pub fn is_revoked(&self) -> Option<bool> {
        self.crl.as_ref().map(|crl| crl.is_revoked(&self.serial))
    }

    // ── Trust-service binding ───────────────────────────────────────────

    /// Attach trust-service metadata (e.g. from a Trusted List); the
    /// metadata's `skiHex` must match this certificate's subject key
    /// identifier.
    pub fn set_trust_service(
        &mut self,
        attributes: serde_json::Value,
    ) -> Result<(), QcertError> {
        let declared = attributes
            .get("skiHex")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        let own = self
            .subject_key_identifier()
            .map(hex::encode)
            .unwrap_or_default();
        if declared.is_empty() || declared != own {
            return Err(QcertError::TrustService(
                "TSP service SKI mismatch with this certificate".into(),
            ));
        }
        self.trust_service = Some(attributes);
        Ok(())
    }

    // ── Attribute report ────────────────────────────────────────────────

    /// Build the normalized attribute report.
    ///
    /// Computed once and cached for the object's lifetime; issuers
    /// accepted after the first call do not appear in the cached report.
    pub fn attributes(&self) -> Result<serde_json::Value, QcertError> {
        if let Some(cached) = self.attributes.get() {
            return Ok(cached.clone());
        }

        let ctx = self.context();
        let mut report = serde_json::Map::new();
        let mut unrecognized = serde_json::Map::new();

        for extension in &self.extensions {
            let attrs = extension.attributes(&ctx);
            let Some(attrs) = attrs.as_object() else {
                continue;
            };
            for (key, value) in attrs {
                if key == "unRecognizedExtensions" {
                    // Accumulate across all unknown extensions instead of
                    // overwriting.
                    if let Some(entries) = value.as_object() {
                        for (entry_oid, entry_value) in entries {
                            unrecognized.insert(entry_oid.clone(), entry_value.clone());
                        }
                    }
                } else {
                    report.insert(key.clone(), value.clone());
                }
            }
        }
        if !unrecognized.is_empty() {
            report.insert(
                "unRecognizedExtensions".to_string(),
                serde_json::Value::Object(unrecognized),
            );
        }

        report.insert("subjectDN".to_string(), json!(self.subject_dn()?));
        report.insert("issuerDN".to_string(), json!(self.issuer_dn()?));
        report.insert("notBefore".to_string(), json!(self.not_before));
        report.insert("notAfter".to_string(), json!(self.not_after));
        report.insert("fingerprint".to_string(), json!(self.fingerprint()));
        report.insert(
            "subjectExpanded".to_string(),
            self.subject_expanded()?.expanded(),
        );
        report.insert(
            "issuerExpanded".to_string(),
            self.issuer_expanded()?.expanded(),
        );

        if !self.issuers.is_empty() {
            let mut chains = Vec::new();
            for issuer in self.issuers.values() {
                chains.push(issuer.attributes()?);
            }
            report.insert("issuerCerts".to_string(), serde_json::Value::Array(chains));
        }

        if let Some(trust_service) = &self.trust_service {
            report.insert("tspService".to_string(), trust_service.clone());
        }

        if !self.findings.is_empty() {
            let mut grouped: BTreeMap<&str, BTreeMap<String, Vec<String>>> = BTreeMap::new();
            for finding in &self.findings {
                grouped
                    .entry(finding.severity.as_str())
                    .or_default()
                    .entry(finding.component.clone())
                    .or_default()
                    .push(finding.message.clone());
            }
            report.insert("findings".to_string(), json!(grouped));
        }

        let report = serde_json::Value::Object(report);
        let _ = self.attributes.set(report.clone());
        Ok(report)
    }
}

fn now_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Render a Unix timestamp as an ISO 8601 UTC string, falling back to the
/// raw number for out-of-range values.
pub fn iso8601(timestamp: i64) -> String {
    match time::OffsetDateTime::from_unix_timestamp(timestamp) {
        Ok(dt) => format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        ),
        Err(_) => timestamp.to_string(),
    }
}
