#![no_main]

use libfuzzer_sys::fuzz_target;
use qcert_lib::X509Certificate;

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic, regardless of input.
    if let Ok(Some(cert)) = X509Certificate::from_bytes(data) {
        // If decoding succeeds, exercise the derived queries.
        let _ = cert.subject_dn();
        let _ = cert.issuer_dn();
        let _ = cert.serial_decimal();
        let _ = cert.fingerprint();
        let _ = cert.is_ca();
        let _ = cert.path_length();
        let _ = cert.authority_key_identifier();
        let _ = cert.subject_key_identifier();
        let _ = cert.issuer_uris();
        let _ = cert.ocsp_uris();
        let _ = cert.crl_distribution_points();
        let _ = cert.qc_statement_names();
        let _ = cert.is_current_at(0);
        let _ = cert.attributes();
    }
});
