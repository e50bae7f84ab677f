//! Thin adapter over the ASN.1 DER collaborator.
//!
//! All structural navigation goes through [`Element`], which pairs the
//! parsed object with the raw TLV sub-slice it was decoded from.  Keeping
//! the raw span makes three things cheap: storing sub-structures verbatim
//! (issuer/subject names, SubjectPublicKeyInfo), embedding offending bytes
//! base64-encoded in error and finding messages, and re-parsing the content
//! of explicit context tags.

use crate::util;
use crate::QcertError;
use x509_parser::der_parser::asn1_rs::{Class, Length};
use x509_parser::der_parser::ber::BerObject;
use x509_parser::der_parser::parse_der;
use x509_parser::prelude::FromDer;
use x509_parser::time::ASN1Time;

// Universal tag numbers used across the decoders, matching X.680.
pub(crate) const TAG_BOOLEAN: u32 = 1;
pub(crate) const TAG_INTEGER: u32 = 2;
pub(crate) const TAG_BIT_STRING: u32 = 3;
pub(crate) const TAG_OCTET_STRING: u32 = 4;
pub(crate) const TAG_UTF8_STRING: u32 = 12;
pub(crate) const TAG_SEQUENCE: u32 = 16;
pub(crate) const TAG_SET: u32 = 17;
pub(crate) const TAG_PRINTABLE_STRING: u32 = 19;
pub(crate) const TAG_T61_STRING: u32 = 20;
pub(crate) const TAG_IA5_STRING: u32 = 22;
pub(crate) const TAG_UTC_TIME: u32 = 23;
pub(crate) const TAG_GENERALIZED_TIME: u32 = 24;

/// One decoded TLV together with its raw encoding.
pub(crate) struct Element<'a> {
    pub obj: BerObject<'a>,
    pub raw: &'a [u8],
}

impl<'a> Element<'a> {
    pub fn tag_number(&self) -> u32 {
        self.obj.header.tag().0
    }

    pub fn class(&self) -> Class {
        self.obj.header.class()
    }

    pub fn is_universal(&self, tag: u32) -> bool {
        self.class() == Class::Universal && self.tag_number() == tag
    }

    pub fn is_context(&self, tag: u32) -> bool {
        self.class() == Class::ContextSpecific && self.tag_number() == tag
    }

    /// Content octets of this TLV (raw minus the identifier/length header).
    pub fn content(&self) -> &'a [u8] {
        match self.obj.header.length() {
            Length::Definite(len) if len <= self.raw.len() => {
                &self.raw[self.raw.len() - len..]
            }
            _ => self.raw,
        }
    }

    /// Decode every child TLV of a constructed element, in order.
    pub fn children(&self) -> Result<Vec<Element<'a>>, QcertError> {
        let mut out = Vec::new();
        let mut cursor = self.content();
        while !cursor.is_empty() {
            let (el, rest) = parse_element(cursor)?;
            out.push(el);
            cursor = rest;
        }
        Ok(out)
    }

    pub fn as_oid_string(&self) -> Result<String, QcertError> {
        self.obj
            .as_oid()
            .map(|oid| oid.to_id_string())
            .map_err(|_| explain("Expected OBJECT IDENTIFIER", self.raw))
    }

    pub fn as_bool(&self) -> Result<bool, QcertError> {
        self.obj
            .as_bool()
            .map_err(|_| explain("Expected BOOLEAN", self.raw))
    }

    pub fn as_u64(&self) -> Result<u64, QcertError> {
        self.obj
            .as_u64()
            .map_err(|_| explain("Expected INTEGER", self.raw))
    }

    pub fn as_str(&self) -> Result<&'a str, QcertError> {
        self.obj
            .as_str()
            .map_err(|_| explain("Expected character string", self.raw))
    }

    pub fn as_slice(&self) -> Result<&'a [u8], QcertError> {
        self.obj
            .as_slice()
            .map_err(|_| explain("Expected byte content", self.raw))
    }
}

/// Decode one TLV from the front of `input`; returns the element and the
/// remaining bytes.
pub(crate) fn parse_element(input: &[u8]) -> Result<(Element<'_>, &[u8]), QcertError> {
    let (rest, obj) =
        parse_der(input).map_err(|e| QcertError::DerError(format!("{}", e)))?;
    let consumed = input.len() - rest.len();
    let raw = input.get(..consumed).unwrap_or(input);
    Ok((Element { obj, raw }, rest))
}

/// Decode the leading TLV of `input` and require it to be a SEQUENCE.
pub(crate) fn parse_sequence(input: &[u8]) -> Result<Element<'_>, QcertError> {
    let (el, _) = parse_element(input)?;
    if !el.is_universal(TAG_SEQUENCE) {
        return Err(explain("Expected SEQUENCE", el.raw));
    }
    Ok(el)
}

/// Decode a UTCTime or GeneralizedTime element to a Unix timestamp.
/// Any other tag is a fatal decode error.
pub(crate) fn wrangle_date(el: &Element<'_>) -> Result<i64, QcertError> {
    match el.tag_number() {
        TAG_UTC_TIME | TAG_GENERALIZED_TIME if el.class() == Class::Universal => {
            let (_, t) = ASN1Time::from_der(el.raw)
                .map_err(|e| QcertError::ParseError(format!("invalid date encoding: {}", e)))?;
            Ok(t.timestamp())
        }
        tag => Err(QcertError::ParseError(format!(
            "Cannot process date from tag {}: {}",
            tag,
            util::base64_encode(el.raw)
        ))),
    }
}

/// Build a DER-layer error whose message carries the offending bytes.
pub(crate) fn explain(context: &str, raw: &[u8]) -> QcertError {
    QcertError::DerError(format!("{}: {}", context, util::base64_encode(raw)))
}
