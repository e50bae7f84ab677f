//! PEM <-> DER format handling and input normalization.

use crate::util;
use crate::QcertError;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Whether the input looks like a PEM-framed certificate.
pub fn is_pem(input: &[u8]) -> bool {
    std::str::from_utf8(input)
        .map(|s| s.trim_start().starts_with(PEM_BEGIN))
        .unwrap_or(false)
}

/// Normalize certificate input to DER.
///
/// Accepts, in order of detection:
/// - PEM (`-----BEGIN CERTIFICATE-----` framing, base64 body);
/// - bare base64 DER, recognized by the `MII` prefix common to the
///   SEQUENCE-length lead bytes of DER certificates (line wrapping is
///   tolerated);
/// - raw DER.
pub fn normalize_to_der(input: &[u8]) -> Result<Vec<u8>, QcertError> {
    if input.is_empty() {
        return Err(QcertError::ParseError("empty input".into()));
    }

    if is_pem(input) {
        return pem_to_der(input);
    }

    if let Ok(text) = std::str::from_utf8(input) {
        if text.trim_start().starts_with("MII") {
            return util::base64_decode(text.trim().as_bytes())
                .map_err(|e| QcertError::ParseError(format!("invalid base64 body: {}", e)));
        }
    }

    Ok(input.to_vec())
}

/// Convert a PEM-encoded certificate to DER bytes.
pub fn pem_to_der(pem: &[u8]) -> Result<Vec<u8>, QcertError> {
    let text = std::str::from_utf8(pem)
        .map_err(|_| QcertError::PemError("PEM input is not valid UTF-8".into()))?;
    let trimmed = text.trim();

    let body = trimmed
        .strip_prefix(PEM_BEGIN)
        .and_then(|rest| rest.strip_suffix(PEM_END))
        .ok_or_else(|| QcertError::PemError("missing CERTIFICATE delimiters".into()))?;

    util::base64_decode(body.as_bytes())
        .map_err(|e| QcertError::PemError(format!("invalid base64 body: {}", e)))
}

/// Convert DER-encoded certificate bytes to a PEM string with 64-character
/// line wrapping.
pub fn der_to_pem(der: &[u8]) -> String {
    format!("{}\n{}\n{}\n", PEM_BEGIN, util::base64_wrap(der), PEM_END)
}
