//! `\U+XXXX` escaping of characters outside the legacy code pages
//!
//! Files before AC1021 store text in a single-byte code page. Characters
//! the code page cannot hold are written as `\U+XXXX`; those outside the
//! basic multilingual plane take two escapes, one per UTF-16 surrogate.

use crate::types::DxfVersion;
use ahash::AHashMap;
use encoding_rs::Encoding;
use std::borrow::Cow;

/// Escaping encoder used for one write
///
/// Encoded strings are cached: names such as layers and styles repeat on
/// every entity.
#[derive(Debug)]
pub struct TextEncoder {
    version: DxfVersion,
    code_page: Option<&'static Encoding>,
    cache: AHashMap<String, String>,
}

impl TextEncoder {
    pub fn new(version: DxfVersion) -> Self {
        TextEncoder {
            version,
            code_page: None,
            cache: AHashMap::new(),
        }
    }

    /// Also escape Latin-1 characters that `code_page` has no byte for
    pub fn with_code_page(mut self, code_page: Option<&'static Encoding>) -> Self {
        self.code_page = code_page.filter(|e| *e != encoding_rs::UTF_8);
        self
    }

    /// Encode `text` for the target version
    pub fn encode<'t>(&mut self, text: &'t str) -> Cow<'t, str> {
        if !self.version.uses_code_page() || !text.chars().any(|c| needs_escape(c, self.code_page)) {
            return Cow::Borrowed(text);
        }
        if let Some(encoded) = self.cache.get(text) {
            return Cow::Owned(encoded.clone());
        }
        let encoded = escape(text, self.code_page);
        self.cache.insert(text.to_string(), encoded.clone());
        Cow::Owned(encoded)
    }

    /// Number of distinct strings escaped so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

fn needs_escape(c: char, code_page: Option<&'static Encoding>) -> bool {
    match c as u32 {
        0..=0x7F => false,
        0x80..=0xFF => code_page.is_some_and(|encoding| {
            let mut buffer = [0u8; 4];
            let (_, _, unmappable) = encoding.encode(c.encode_utf8(&mut buffer));
            unmappable
        }),
        _ => true,
    }
}

fn escape(text: &str, code_page: Option<&'static Encoding>) -> String {
    let mut encoded = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if needs_escape(c, code_page) {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                encoded.push_str(&format!("\\U+{:04X}", unit));
            }
        } else {
            encoded.push(c);
        }
    }
    encoded
}

/// Escape `text` for `version` without caching; Latin-1 is kept as is
pub fn encode_non_ascii(text: &str, version: DxfVersion) -> Cow<'_, str> {
    if version.uses_code_page() && text.chars().any(|c| needs_escape(c, None)) {
        Cow::Owned(escape(text, None))
    } else {
        Cow::Borrowed(text)
    }
}

/// Replace `\U+XXXX` sequences with the characters they name
///
/// A high surrogate followed by a low surrogate escape decodes to one
/// character. Malformed or unpaired escapes stay literal.
pub fn decode_non_ascii(text: &str) -> Cow<'_, str> {
    if !text.contains("\\U+") {
        return Cow::Borrowed(text);
    }
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(index) = rest.find("\\U+") {
        decoded.push_str(&rest[..index]);
        let after = &rest[index..];
        let Some(unit) = escaped_unit(after) else {
            decoded.push_str("\\U+");
            rest = &after[3..];
            continue;
        };
        let (c, consumed) = match unit {
            0xD800..=0xDBFF => match escaped_unit(&after[7..]) {
                Some(low @ 0xDC00..=0xDFFF) => {
                    (char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)), 14)
                }
                _ => (None, 7),
            },
            _ => (char::from_u32(unit), 7),
        };
        match c {
            Some(c) => {
                decoded.push(c);
                rest = &after[consumed..];
            }
            None => {
                decoded.push_str("\\U+");
                rest = &after[3..];
            }
        }
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

/// Code unit of a `\U+XXXX` escape at the start of `text`
fn escaped_unit(text: &str) -> Option<u32> {
    let hex = text.strip_prefix("\\U+")?.get(..4)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
