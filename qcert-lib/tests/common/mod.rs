//! Shared test fixtures and DER-building helpers.
#![allow(dead_code)]

// ---------------------------------------------------------------------------
// Real RSA test chain (root -> intermediate -> end-entity, SHA-256)
// ---------------------------------------------------------------------------

/// Root CA: CN=certificate.testca.com (self-signed, RSA 2048).
/// BasicConstraints (critical): CA=true, pathLen=30.
/// KeyUsage: keyCertSign, cRLSign.
pub const ROOT_CA_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIDzzCCAregAwIBAgIUMnfWZiXhuZbCaFkOLRiQSEI46rkwDQYJKoZIhvcNAQEL
BQAwbzELMAkGA1UEBhMCWFgxCzAJBgNVBAgMAlhYMQswCQYDVQQHDAJYWDEUMBIG
A1UECgwLY2VydGlmaWNhdGUxDzANBgNVBAsMBnRlc3RjYTEfMB0GA1UEAwwWY2Vy
dGlmaWNhdGUudGVzdGNhLmNvbTAeFw0yNDA0MjUxMzAxMDBaFw0zNDA0MjMxMzAx
MDBaMG8xCzAJBgNVBAYTAlhYMQswCQYDVQQIDAJYWDELMAkGA1UEBwwCWFgxFDAS
BgNVBAoMC2NlcnRpZmljYXRlMQ8wDQYDVQQLDAZ0ZXN0Y2ExHzAdBgNVBAMMFmNl
cnRpZmljYXRlLnRlc3RjYS5jb20wggEiMA0GCSqGSIb3DQEBAQUAA4IBDwAwggEK
AoIBAQCZD4K/oBU7/DCThMTftZUazVd3NIjKHQcIO5Uul9F3gIOavMpqcT+epfy1
yUWny31DdG6ku3HJHT2zoqerYgqAh2ediFvnCAe+OzCrDOr3+9ZXt8vv1H2M6X1U
zF+tRaeZ3IgAJBiYBNbdoK4RtzYRfM+29tVp01NJguJza9bMw/qEiQQyubGhlVQi
IW109aYjhiA0RQl6814upi09vfECnzZ+2kkvmkuEEptBiDlE3tSEctJPNSbAN6mn
B3krKfLspcZaoRuJucI6duJeJQcsjQCIEjqgnVuOWoMVOAPLU7JPeOrubePbAySU
yNTPzntqJWs/j6Iacol6N3iJThjfAgMBAAGjYzBhMB0GA1UdDgQWBBSLzdFm06DU
ldtZ2btuIKMNjG1YjzAfBgNVHSMEGDAWgBSLzdFm06DUldtZ2btuIKMNjG1YjzAS
BgNVHRMBAf8ECDAGAQH/AgEeMAsGA1UdDwQEAwIBBjANBgkqhkiG9w0BAQsFAAOC
AQEALqPQ8BTMfMFBEvxN9wJzanH6M0FIt+LE0JvMPMBvflwu0GTL26+/Nqd2sQLx
mDByrx+8cFodY3squFBY1dFMwIsMyF8WK/Nh80ZGG8tjKrFlVXE2npRlf5VSkytk
FVz94lFjl0eP6rsUfUamRF2eNg76uoY7tZwTPNqA/zsoRN81n3ccr81CbfOyhPVB
XAse0651f3u76rm7NJNYSeR7qebMyfYrJBu7w/O3K4QCeGjZ3b76xNZtatw1ZXol
irzwVW71bsCftIj3Nu1WFmczr6habktQ7/PyR5hG/I8mh2lkZcZe1Fw3t4hGNAtW
oWDxfkMk0rSnsUcvOtvhfX5Bvw==
-----END CERTIFICATE-----
";

/// Intermediate CA: CN=certificate.testin.com (signed by the root).
/// BasicConstraints (non-critical): CA=true, no pathLen.
pub const INTERMEDIATE_CA_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIDnDCCAoSgAwIBAgIBATANBgkqhkiG9w0BAQsFADBvMQswCQYDVQQGEwJYWDEL
MAkGA1UECAwCWFgxCzAJBgNVBAcMAlhYMRQwEgYDVQQKDAtjZXJ0aWZpY2F0ZTEP
MA0GA1UECwwGdGVzdGNhMR8wHQYDVQQDDBZjZXJ0aWZpY2F0ZS50ZXN0Y2EuY29t
MB4XDTI0MDQyNTEzMDEwMFoXDTM0MDQyMzEzMDEwMFowYjELMAkGA1UEBhMCWFgx
CzAJBgNVBAgMAlhYMRQwEgYDVQQKDAtjZXJ0aWZpY2F0ZTEPMA0GA1UECwwGdGVz
dGluMR8wHQYDVQQDDBZjZXJ0aWZpY2F0ZS50ZXN0aW4uY29tMIIBIjANBgkqhkiG
9w0BAQEFAAOCAQ8AMIIBCgKCAQEA18rpiCfBpz44ZvBoELRoaCt1ddxSBI250Uj4
io1XUPhqJUmreEFc6vR32RvW6krspgYyx00pqH4nptJOVpOF7fGxANqmT3Dq7jyt
H91gha7GViTRe/NH52R3iGInCxsC+snaFH35MLzvaKUCg6Agrw0ozrykjHBrQtkj
zTvXkwexj/1lMW0FzF79z6SC9bfwLqYldfEgtEZTcTt0SJf6wLW4BeEUCnT+vMX1
hlbOjgI4tuh6RznmbffoxOb9ynJYJ8oPo5X1RN+DIMZ9KUj4DUAP/84x1uQj5cSQ
hERvnEBPWOEC2KhEUzsG97fH/axXg3+Aj8FJAkNp6BnWeKtG1wIDAQABo1AwTjAM
BgNVHRMEBTADAQH/MB0GA1UdDgQWBBTgYJN/ObsFIRlEELDAKWSitrsjEjAfBgNV
HSMEGDAWgBSLzdFm06DUldtZ2btuIKMNjG1YjzANBgkqhkiG9w0BAQsFAAOCAQEA
Q0MFGy3ZfYaBqSIUBwBq1bbADM0mTj3kjeDz7qBKQu4Krfvpzlp7VqD1T3bldgwR
T0gBzWAZnbQ77fBZnCnaz7ZbK0mIin5eT2s9QCOgPY0u6P8oFH56Guet86ly9gSU
yako9lzyYxaJrWpWAmMw7zAzWWLtIiTjciQ7Wi4ihTPbAloUvEIyIWHNs39hNHWF
hBr121y0WDbcNpScFd2ZY+Z4T3Bzs8K3rhX+Gxr118qhXYSLsjlm2kkG6y68e8U2
9BeiW15gWirCLtKVv/fUdOoMcVbjpr7QYtK8iOOyumjxSn9KOevJ/V6p30ZyCuuz
FbPbbv2clmJvtygezDOZxA==
-----END CERTIFICATE-----
";

/// End-entity: CN=certificate.testend22.com (signed by the intermediate).
/// BasicConstraints: CA=false. Serial 4.
pub const END_ENTITY_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIDkjCCAnqgAwIBAgIBBDANBgkqhkiG9w0BAQsFADBiMQswCQYDVQQGEwJYWDEL
MAkGA1UECAwCWFgxFDASBgNVBAoMC2NlcnRpZmljYXRlMQ8wDQYDVQQLDAZ0ZXN0
aW4xHzAdBgNVBAMMFmNlcnRpZmljYXRlLnRlc3Rpbi5jb20wHhcNMjQwNTA1MDkz
NzQ5WhcNMzQwNTAzMDkzNzQ5WjBoMQswCQYDVQQGEwJYWDELMAkGA1UECAwCWFgx
FDASBgNVBAoMC2NlcnRpZmljYXRlMRIwEAYDVQQLDAl0ZXN0ZW5kMjIxIjAgBgNV
BAMMGWNlcnRpZmljYXRlLnRlc3RlbmQyMi5jb20wggEiMA0GCSqGSIb3DQEBAQUA
A4IBDwAwggEKAoIBAQDsMC84reB0dS3CYYcSL7rj2OaE0Jqtyhuo77j9qf7jrwAG
eIuTaiCQy0L07jEtm6i8PYulVwi1ImcaIbehiPdjhv4Rx0bMZAofHHmn6ExAYphi
I1zY29Ww5pZfXmaXPaiGxmQUkntcZMPeqg4HxNm/1G5RVqGNr2gL5Vptj9pYZNvf
hWsrj7PMPFw09GJrQK2FJlQy7sxXm0ovirHXh4Z9NJfUN9VtbKNBvvWjtYnHTYPd
2nMHdE7HggcS/bWUEppFESYUSvO7kDKvOdswkDKxwJ2oVmBU0DDAUhsTorAFY8dH
bp5wNtqhCKESL7BI/ve151iVZvjU57LnjqKSwc2fAgMBAAGjTTBLMAkGA1UdEwQC
MAAwHQYDVR0OBBYEFHa3eEMeYPvYglLa6NwOuj/vSDHhMB8GA1UdIwQYMBaAFOBg
k385uwUhGUQQsMApZKK2uyMSMA0GCSqGSIb3DQEBCwUAA4IBAQB3TVit43C2LEX1
TBVyfh3386EEvqbKOKcUekzfTXagn6qkWRcEWCrRz752EdxcbjMdFcghlu7zWIhH
oLLHNvxxoXMGN9KmHKBSOG2R849aRJ+/Txe5q5zGPSB9Z4hdnsJAq/rA91elnur2
m/zLnANSZsLrZt7KkZJQ9k23yFzMtrTTsyFSAN5tsXRlU7X+++B96f0+zZ3LM56y
8LQD6nNxKpMowPfoZDK5AWaxiilKHLFVijQfbw12smsfPpuzTDhYrLPKViVmZjY4
qsHibMRjr/+tlhwAiVosgKY9l6f3ocSNjREAPuyswv7iFkF2CBsA1uykpVKELDZR
zYvWHlcn
-----END CERTIFICATE-----
";

use qcert_lib::X509Certificate;

pub fn root_ca() -> X509Certificate {
    X509Certificate::from_pem(ROOT_CA_PEM).unwrap().unwrap()
}

pub fn intermediate_ca() -> X509Certificate {
    X509Certificate::from_pem(INTERMEDIATE_CA_PEM)
        .unwrap()
        .unwrap()
}

pub fn end_entity() -> X509Certificate {
    X509Certificate::from_pem(END_ENTITY_PEM).unwrap().unwrap()
}

// ---------------------------------------------------------------------------
// DER building helpers
// ---------------------------------------------------------------------------

/// Wrap content in a tag-length-value envelope (definite length).
pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len < 0x100 {
        out.push(0x81);
        out.push(len as u8);
    } else {
        out.push(0x82);
        out.push((len >> 8) as u8);
        out.push(len as u8);
    }
    out.extend_from_slice(content);
    out
}

pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

pub fn seq(parts: &[&[u8]]) -> Vec<u8> {
    tlv(0x30, &concat(parts))
}

pub fn set(parts: &[&[u8]]) -> Vec<u8> {
    tlv(0x31, &concat(parts))
}

pub fn boolean(value: bool) -> Vec<u8> {
    tlv(0x01, &[if value { 0xff } else { 0x00 }])
}

pub fn integer(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7
        && ((bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0))
    {
        start += 1;
    }
    tlv(0x02, &bytes[start..])
}

pub fn octet_string(content: &[u8]) -> Vec<u8> {
    tlv(0x04, content)
}

pub fn utf8(text: &str) -> Vec<u8> {
    tlv(0x0c, text.as_bytes())
}

pub fn printable(text: &str) -> Vec<u8> {
    tlv(0x13, text.as_bytes())
}

pub fn ia5(text: &str) -> Vec<u8> {
    tlv(0x16, text.as_bytes())
}

pub fn utc_time(text: &str) -> Vec<u8> {
    tlv(0x17, text.as_bytes())
}

pub fn null() -> Vec<u8> {
    tlv(0x05, &[])
}

fn base128(mut value: u64) -> Vec<u8> {
    let mut out = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        out.insert(0, 0x80 | (value & 0x7f) as u8);
        value >>= 7;
    }
    out
}

/// Encode a dotted-decimal OID.
pub fn oid(text: &str) -> Vec<u8> {
    let arcs: Vec<u64> = text.split('.').map(|p| p.parse().unwrap()).collect();
    let mut content = vec![(arcs[0] * 40 + arcs[1]) as u8];
    for arc in &arcs[2..] {
        content.extend(base128(*arc));
    }
    tlv(0x06, &content)
}

/// A single-attribute RDN with a UTF8String value.
pub fn rdn_utf8(attr_oid: &str, value: &str) -> Vec<u8> {
    set(&[&seq(&[&oid(attr_oid), &utf8(value)])])
}

/// A minimal one-attribute Name.
pub fn simple_name(cn: &str) -> Vec<u8> {
    seq(&[&rdn_utf8("2.5.4.3", cn)])
}

/// Build an Extension SEQUENCE: OID, optional criticality, OCTET STRING
/// payload.
pub fn extension(ext_oid: &str, critical: Option<bool>, payload: &[u8]) -> Vec<u8> {
    match critical {
        Some(flag) => seq(&[&oid(ext_oid), &boolean(flag), &octet_string(payload)]),
        None => seq(&[&oid(ext_oid), &octet_string(payload)]),
    }
}

/// Build a syntactically valid (unsigned-garbage) certificate around the
/// given version field and extension list.  `version` is the encoded
/// integer (2 for v3); `None` omits the `[0]` field entirely, as a v1
/// certificate would.
pub fn synthetic_cert(version: Option<i64>, extensions: &[Vec<u8>]) -> Vec<u8> {
    synthetic_cert_with_key(version, "1.2.840.113549.1.1.1", extensions)
}

pub fn synthetic_cert_with_key(
    version: Option<i64>,
    key_oid: &str,
    extensions: &[Vec<u8>],
) -> Vec<u8> {
    let mut tbs_parts: Vec<Vec<u8>> = Vec::new();
    if let Some(v) = version {
        tbs_parts.push(tlv(0xa0, &integer(v)));
    }
    tbs_parts.push(integer(0x1001)); // serial
    tbs_parts.push(seq(&[&oid("1.2.840.113549.1.1.11"), &null()])); // sig alg
    tbs_parts.push(simple_name("Test Issuer"));
    tbs_parts.push(seq(&[&utc_time("240101000000Z"), &utc_time("340101000000Z")]));
    tbs_parts.push(simple_name("Test Subject"));
    tbs_parts.push(seq(&[
        &seq(&[&oid(key_oid), &null()]),
        &tlv(0x03, &[0x00, 0xde, 0xad, 0xbe, 0xef]),
    ]));
    if !extensions.is_empty() {
        let ext_seq = seq(&extensions.iter().map(Vec::as_slice).collect::<Vec<_>>());
        tbs_parts.push(tlv(0xa3, &ext_seq));
    }
    let tbs = seq(&tbs_parts.iter().map(Vec::as_slice).collect::<Vec<_>>());
    seq(&[
        &tbs,
        &seq(&[&oid("1.2.840.113549.1.1.11"), &null()]),
        &tlv(0x03, &[0x00, 0x01, 0x02, 0x03]),
    ])
}
