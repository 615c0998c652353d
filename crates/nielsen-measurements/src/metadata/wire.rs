//! Query-string serialization of metadata records and payload measurement.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::metadata::record::NielsenMetadata;

/// Ceiling on the serialized record, in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 2048;

/// Bytes left verbatim in a URI component: alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Serializes a record as sorted, percent-encoded `key=value` pairs joined by `&`.
pub fn serialize_metadata(metadata: &NielsenMetadata) -> String {
    metadata
        .wire_fields()
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, URI_COMPONENT),
                utf8_percent_encode(value, URI_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn payload_size(metadata: &NielsenMetadata) -> usize {
    utf8_byte_len(&serialize_metadata(metadata))
}

pub fn utf8_byte_len(text: &str) -> usize {
    text.len()
}

/// UTF-8 length computed from UTF-16 code units.
///
/// A surrogate pair consumes two units and costs four bytes.
pub fn utf16_byte_len(units: &[u16]) -> usize {
    let mut total = 0;
    let mut index = 0;
    while index < units.len() {
        let unit = units[index];
        if unit < 0x80 {
            total += 1;
        } else if unit < 0x800 {
            total += 2;
        } else if !(0xD800..0xE000).contains(&unit) {
            total += 3;
        } else {
            total += 4;
            index += 1;
        }
        index += 1;
    }
    total
}
