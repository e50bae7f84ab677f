//! Authority Information Access decoding.

use crate::der::{self, Element, TAG_IA5_STRING, TAG_SEQUENCE};
use crate::findings::Finding;
use crate::oid;
use crate::util;
use crate::QcertError;

/// Decoded authorityInfoAccess extension: CA-issuer and OCSP responder
/// URIs, in encoded order.
#[derive(Debug, Clone, Default)]
pub struct AuthorityInfoAccess {
    pub ca_issuers: Vec<String>,
    pub ocsp: Vec<String>,
}

/// Decode an AuthorityInfoAccess payload (SEQUENCE OF AccessDescription).
///
/// An unrecognized access-method OID degrades to a warning finding; the
/// description is skipped.  Access locations that are not IA5String-shaped
/// GeneralName alternatives are silently skipped.
pub(crate) fn decode(payload: &[u8]) -> Result<(AuthorityInfoAccess, Vec<Finding>), QcertError> {
    let seq = der::parse_sequence(payload)?;
    let mut value = AuthorityInfoAccess::default();
    let mut findings = Vec::new();

    for desc in seq.children()? {
        if !desc.is_universal(TAG_SEQUENCE) {
            return Err(der::explain("Expected AccessDescription SEQUENCE", desc.raw));
        }
        let fields = desc.children()?;
        let method_el = fields
            .first()
            .ok_or_else(|| der::explain("Empty AccessDescription", desc.raw))?;
        let method_oid = method_el.as_oid_string()?;
        let location = fields
            .get(1)
            .ok_or_else(|| der::explain("Missing accessLocation", desc.raw))?;

        match oid::name(&method_oid) {
            "caIssuers" => {
                if let Some(uri) = general_name_uri(location)? {
                    value.ca_issuers.push(uri);
                }
            }
            "ocsp" => {
                if let Some(uri) = general_name_uri(location)? {
                    value.ocsp.push(uri);
                }
            }
            method_name => {
                findings.push(Finding::warning(
                    "authorityInfoAccess",
                    format!(
                        "Unrecognised authorityInfoAccess OID {} ({}): {}",
                        method_oid,
                        method_name,
                        util::base64_encode(payload)
                    ),
                ));
            }
        }
    }

    Ok((value, findings))
}

/// Extract the URI from a GeneralName `uniformResourceIdentifier` element.
///
/// Certificates in the wild have been observed carrying the implicit
/// context tag byte `0x86` where the decoder downstream expects a plain
/// IA5String; that exact byte is rewritten to `0x16` and the element
/// re-parsed, so both encodings yield the identical string.  Alternatives
/// that are not IA5String-compatible return `None`.
pub(crate) fn general_name_uri(el: &Element<'_>) -> Result<Option<String>, QcertError> {
    if el.raw.first() == Some(&0x86) {
        let mut rewritten = el.raw.to_vec();
        rewritten[0] = 0x16;
        let (ia5, _) = der::parse_element(&rewritten)?;
        if !ia5.is_universal(TAG_IA5_STRING) {
            return Ok(None);
        }
        return Ok(Some(ia5.as_str()?.to_string()));
    }
    if el.is_universal(TAG_IA5_STRING) {
        return Ok(Some(el.as_str()?.to_string()));
    }
    if el.is_context(6) {
        // Constructed form: the IA5String sits inside the tag.
        let (inner, _) = der::parse_element(el.content())?;
        if inner.is_universal(TAG_IA5_STRING) {
            return Ok(Some(inner.as_str()?.to_string()));
        }
        return Ok(None);
    }
    Ok(None)
}
