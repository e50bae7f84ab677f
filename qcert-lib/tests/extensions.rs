#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Extension dispatch and per-type decoder tests over hand-built DER.

mod common;

use common::*;
use qcert_lib::{Extension, ExtensionValue, GeneralNameValue, Severity};

fn decode(ext_der: &[u8]) -> Extension {
    Extension::from_der(ext_der).unwrap()
}

// ---------------------------------------------------------------------------
// Dispatch envelope
// ---------------------------------------------------------------------------

#[test]
fn three_element_envelope_carries_criticality() {
    let payload = seq(&[&boolean(true), &integer(0)]);
    let ext = decode(&extension("2.5.29.19", Some(true), &payload));
    assert!(ext.is_critical());
    assert_eq!(ext.name(), "basicConstraints");
    assert_eq!(ext.oid(), "2.5.29.19");
    assert_eq!(ext.raw(), payload.as_slice());
}

#[test]
fn two_element_envelope_defaults_to_non_critical() {
    let payload = seq(&[&boolean(true)]);
    let ext = decode(&extension("2.5.29.19", None, &payload));
    assert!(!ext.is_critical());
}

#[test]
fn unrecognized_extension_oid_is_silent_and_preserved() {
    let payload = octet_string(b"private payload");
    let ext = decode(&extension("1.3.6.1.4.1.99999.1", None, &payload));
    assert_eq!(ext.name(), "unknown");
    assert_eq!(ext.key(), "1.3.6.1.4.1.99999.1");
    assert!(matches!(ext.value(), ExtensionValue::Unknown));
    // No finding at this tier: private extensions are the issuer's
    // prerogative.
    assert!(ext.findings().is_empty());
    assert_eq!(ext.raw(), payload.as_slice());
}

#[test]
fn malformed_outer_envelope_is_fatal() {
    assert!(Extension::from_der(&[0x04, 0x02, 0xab, 0xcd]).is_err());
    assert!(Extension::from_der(&[0x30, 0x80]).is_err());
    // OID alone, no payload
    assert!(Extension::from_der(&seq(&[&oid("2.5.29.19")])).is_err());
}

// ---------------------------------------------------------------------------
// Basic Constraints / Key Usage
// ---------------------------------------------------------------------------

#[test]
fn basic_constraints_ca_with_path_length() {
    let ext = decode(&extension(
        "2.5.29.19",
        Some(true),
        &seq(&[&boolean(true), &integer(0)]),
    ));
    match ext.value() {
        ExtensionValue::BasicConstraints(bc) => {
            assert!(bc.is_ca);
            assert_eq!(bc.path_length, Some(0));
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn basic_constraints_empty_sequence_defaults_to_end_entity() {
    let ext = decode(&extension("2.5.29.19", None, &seq(&[])));
    match ext.value() {
        ExtensionValue::BasicConstraints(bc) => {
            assert!(!bc.is_ca);
            assert_eq!(bc.path_length, None);
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn basic_constraints_malformed_payload_is_fatal() {
    let res = Extension::from_der(&extension("2.5.29.19", None, &octet_string(b"zz")));
    assert!(res.is_err());
}

#[test]
fn key_usage_named_bits() {
    // digitalSignature | keyCertSign | cRLSign -> first content byte 0x86
    let ext = decode(&extension("2.5.29.15", Some(true), &tlv(0x03, &[0x01, 0x86])));
    match ext.value() {
        ExtensionValue::KeyUsage(ku) => {
            assert!(ku.digital_signature());
            assert!(ku.key_cert_sign());
            assert!(ku.crl_sign());
            assert!(!ku.key_encipherment());
            assert!(!ku.decipher_only());
            assert_eq!(
                ku.names(),
                ["digitalSignature", "keyCertSign", "cRLSign"]
            );
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn key_usage_decipher_only_spans_the_second_byte() {
    let ext = decode(&extension("2.5.29.15", None, &tlv(0x03, &[0x07, 0x00, 0x80])));
    match ext.value() {
        ExtensionValue::KeyUsage(ku) => {
            assert!(ku.decipher_only());
            assert_eq!(ku.names(), ["decipherOnly"]);
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn key_usage_malformed_payload_is_fatal() {
    let res = Extension::from_der(&extension("2.5.29.15", None, &seq(&[&integer(1)])));
    assert!(res.is_err());
}

// ---------------------------------------------------------------------------
// Authority Information Access
// ---------------------------------------------------------------------------

const CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";
const OCSP: &str = "1.3.6.1.5.5.7.48.1";

fn aia_ext(descriptions: &[Vec<u8>]) -> Vec<u8> {
    let payload = seq(&descriptions.iter().map(Vec::as_slice).collect::<Vec<_>>());
    extension("1.3.6.1.5.5.7.1.1", None, &payload)
}

#[test]
fn aia_implicit_0x86_and_plain_ia5_decode_identically() {
    let uri = b"http://ca.example.org/ca.crt";
    let implicit = aia_ext(&[seq(&[&oid(CA_ISSUERS), &tlv(0x86, uri)])]);
    let plain = aia_ext(&[seq(&[&oid(CA_ISSUERS), &tlv(0x16, uri)])]);

    let from_implicit = decode(&implicit);
    let from_plain = decode(&plain);

    let uris = |ext: &Extension| match ext.value() {
        ExtensionValue::AuthorityInfoAccess(aia) => aia.ca_issuers.clone(),
        other => panic!("wrong variant: {:?}", other),
    };
    assert_eq!(uris(&from_implicit), ["http://ca.example.org/ca.crt"]);
    assert_eq!(uris(&from_implicit), uris(&from_plain));
}

#[test]
fn aia_splits_ocsp_and_ca_issuer_lists() {
    let ext = decode(&aia_ext(&[
        seq(&[&oid(OCSP), &tlv(0x86, b"http://ocsp.example.org")]),
        seq(&[&oid(CA_ISSUERS), &tlv(0x86, b"http://ca.example.org/ca.crt")]),
    ]));
    match ext.value() {
        ExtensionValue::AuthorityInfoAccess(aia) => {
            assert_eq!(aia.ocsp, ["http://ocsp.example.org"]);
            assert_eq!(aia.ca_issuers, ["http://ca.example.org/ca.crt"]);
        }
        other => panic!("wrong variant: {:?}", other),
    }
    assert!(ext.findings().is_empty());
}

#[test]
fn aia_unknown_access_method_records_a_warning() {
    let ext = decode(&aia_ext(&[
        seq(&[&oid("1.3.6.1.5.5.7.48.99"), &tlv(0x86, b"http://x.example")]),
        seq(&[&oid(OCSP), &tlv(0x86, b"http://ocsp.example.org")]),
    ]));
    assert_eq!(ext.findings().len(), 1);
    let finding = &ext.findings()[0];
    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(finding.component, "authorityInfoAccess");
    assert!(finding
        .message
        .contains("Unrecognised authorityInfoAccess OID 1.3.6.1.5.5.7.48.99"));
    // The recognized description still decodes.
    match ext.value() {
        ExtensionValue::AuthorityInfoAccess(aia) => {
            assert_eq!(aia.ocsp, ["http://ocsp.example.org"])
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn aia_non_ia5_alternative_is_silently_skipped() {
    // A dNSName alternative ([2]) is not IA5String-compatible here.
    let ext = decode(&aia_ext(&[seq(&[&oid(CA_ISSUERS), &tlv(0x82, b"ca.example.org")])]));
    match ext.value() {
        ExtensionValue::AuthorityInfoAccess(aia) => {
            assert!(aia.ca_issuers.is_empty());
        }
        other => panic!("wrong variant: {:?}", other),
    }
    assert!(ext.findings().is_empty());
}

// ---------------------------------------------------------------------------
// Key identifiers
// ---------------------------------------------------------------------------

#[test]
fn aki_key_identifier_form_decodes() {
    let keyid = [0xde, 0xad, 0xbe, 0xef, 0x01];
    let ext = decode(&extension("2.5.29.35", None, &seq(&[&tlv(0x80, &keyid)])));
    match ext.value() {
        ExtensionValue::AuthorityKeyIdentifier(aki) => {
            assert_eq!(aki.key_identifier.as_deref(), Some(keyid.as_slice()));
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn aki_issuer_and_serial_forms_are_recognized_but_not_decoded() {
    // [1] authorityCertIssuer (constructed) and [2] serial: valid tags,
    // key identifier stays unset.
    let payload = seq(&[&tlv(0xa1, &seq(&[&tlv(0x82, b"ca.example.org")])), &tlv(0x82, &[0x05])]);
    let ext = decode(&extension("2.5.29.35", None, &payload));
    match ext.value() {
        ExtensionValue::AuthorityKeyIdentifier(aki) => {
            assert!(aki.key_identifier.is_none());
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn aki_unrecognized_inner_tag_is_fatal() {
    let payload = seq(&[&tlv(0x85, b"bogus")]);
    let err = Extension::from_der(&extension("2.5.29.35", None, &payload)).unwrap_err();
    assert!(err
        .to_string()
        .contains("Unrecognised AuthorityKeyIdentifier 5 format"));

    // A universal element inside the AKI SEQUENCE is just as fatal.
    let payload = seq(&[&octet_string(&[0x01])]);
    assert!(Extension::from_der(&extension("2.5.29.35", None, &payload)).is_err());
}

#[test]
fn ski_octet_string_decodes_and_malformed_is_fatal() {
    let keyid = [0x11u8; 20];
    let ext = decode(&extension("2.5.29.14", None, &octet_string(&keyid)));
    match ext.value() {
        ExtensionValue::SubjectKeyIdentifier(ski) => {
            assert_eq!(ski.key_identifier, keyid);
        }
        other => panic!("wrong variant: {:?}", other),
    }

    assert!(Extension::from_der(&extension("2.5.29.14", None, &integer(5))).is_err());
}

// ---------------------------------------------------------------------------
// Certificate Policies
// ---------------------------------------------------------------------------

#[test]
fn policies_severity_follows_extension_criticality() {
    let payload = seq(&[&seq(&[&oid("1.3.6.1.4.1.5555.1.1")])]);

    let critical = decode(&extension("2.5.29.32", Some(true), &payload));
    assert_eq!(critical.findings().len(), 1);
    assert_eq!(critical.findings()[0].severity, Severity::Critical);
    assert!(critical.findings()[0]
        .message
        .contains("Unrecognised certificatePolicy OID 1.3.6.1.4.1.5555.1.1"));

    let non_critical = decode(&extension("2.5.29.32", None, &payload));
    assert_eq!(non_critical.findings().len(), 1);
    assert_eq!(non_critical.findings()[0].severity, Severity::Warning);
}

#[test]
fn policies_malformed_payload_degrades_to_one_finding_with_zero_policies() {
    let ext = decode(&extension("2.5.29.32", Some(true), &integer(42)));
    match ext.value() {
        ExtensionValue::CertificatePolicies(policies) => {
            assert!(policies.policies.is_empty());
        }
        other => panic!("wrong variant: {:?}", other),
    }
    assert_eq!(ext.findings().len(), 1);
    assert_eq!(ext.findings()[0].severity, Severity::Critical);
    assert!(ext.findings()[0]
        .message
        .contains("Malformed certificatePolicies extension"));
}

#[test]
fn recognized_policy_with_cps_qualifier() {
    let payload = seq(&[&seq(&[
        &oid("0.4.0.194112.1.4"),
        &seq(&[&seq(&[
            &oid("1.3.6.1.5.5.7.2.1"),
            &ia5("https://cps.example.org"),
        ])]),
    ])]);
    let ext = decode(&extension("2.5.29.32", None, &payload));
    match ext.value() {
        ExtensionValue::CertificatePolicies(policies) => {
            assert_eq!(policies.policies.len(), 1);
            let policy = &policies.policies[0];
            assert_eq!(policy.oid, "0.4.0.194112.1.4");
            assert_eq!(policy.name, "QCP-w");
            assert_eq!(policy.cps_uris, ["https://cps.example.org"]);
        }
        other => panic!("wrong variant: {:?}", other),
    }
    assert!(ext.findings().is_empty());
}

// ---------------------------------------------------------------------------
// SAN / EKU / CDP / poison
// ---------------------------------------------------------------------------

#[test]
fn subject_alt_name_entries_decode() {
    let payload = seq(&[
        &tlv(0x82, b"www.example.org"),
        &tlv(0x81, b"admin@example.org"),
        &tlv(0x86, b"https://example.org"),
    ]);
    let ext = decode(&extension("2.5.29.17", None, &payload));
    match ext.value() {
        ExtensionValue::SubjectAltName(san) => {
            assert_eq!(san.names.len(), 3);
            assert!(matches!(&san.names[0], GeneralNameValue::Dns(v) if v == "www.example.org"));
            assert!(
                matches!(&san.names[1], GeneralNameValue::Email(v) if v == "admin@example.org")
            );
            assert!(matches!(&san.names[2], GeneralNameValue::Uri(v) if v == "https://example.org"));
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn extended_key_usage_maps_known_purposes() {
    let payload = seq(&[&oid("1.3.6.1.5.5.7.3.1"), &oid("1.2.3.4")]);
    let ext = decode(&extension("2.5.29.37", None, &payload));
    match ext.value() {
        ExtensionValue::ExtendedKeyUsage(eku) => {
            assert_eq!(eku.purposes, ["serverAuth", "1.2.3.4"]);
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn crl_distribution_points_extract_uris() {
    let full_name = tlv(0xa0, &tlv(0x86, b"http://crl.example.org/r1.crl"));
    let dp_name = tlv(0xa0, &full_name);
    let payload = seq(&[&seq(&[&dp_name])]);
    let ext = decode(&extension("2.5.29.31", None, &payload));
    match ext.value() {
        ExtensionValue::CrlDistributionPoints(cdp) => {
            assert_eq!(cdp.uris, ["http://crl.example.org/r1.crl"]);
        }
        other => panic!("wrong variant: {:?}", other),
    }
}

#[test]
fn pre_cert_poison_is_a_presence_marker() {
    let payload = null();
    let ext = decode(&extension("1.3.6.1.4.1.11129.2.4.3", Some(true), &payload));
    assert!(matches!(ext.value(), ExtensionValue::PreCertPoison));
    assert_eq!(ext.raw(), payload.as_slice());
    assert!(ext.is_critical());
}
