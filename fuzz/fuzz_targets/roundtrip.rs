#![no_main]

use libfuzzer_sys::fuzz_target;
use qcert_lib::X509Certificate;

fuzz_target!(|data: &[u8]| {
    // If data decodes as DER, roundtrip through PEM and back.
    if let Ok(Some(cert)) = X509Certificate::from_der(data) {
        let pem = cert.to_pem();
        let back = X509Certificate::from_pem(&pem)
            .expect("re-decoding emitted PEM failed")
            .expect("emitted PEM lost the certificate");
        // The stored DER must survive the roundtrip exactly.
        assert_eq!(cert.to_der(), back.to_der(), "DER mismatch after roundtrip");
    }
});
