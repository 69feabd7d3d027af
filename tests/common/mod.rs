//! Shared helpers for the integration tests, imported with `mod common;`.

#![allow(dead_code)]

pub mod builders;

use dxf_codec::{CadDocument, DxfReader, DxfVersion, DxfWriter, DxfWriterConfiguration};
use std::io::Cursor;

/// Versions the writer can target
pub const WRITABLE_VERSIONS: [DxfVersion; 6] = [
    DxfVersion::AC1015,
    DxfVersion::AC1018,
    DxfVersion::AC1021,
    DxfVersion::AC1024,
    DxfVersion::AC1027,
    DxfVersion::AC1032,
];

pub type Pair = (i32, String);

pub fn p(code: i32, value: &str) -> Pair {
    (code, value.to_string())
}

// ─── Writing and reading ───

/// Text DXF bytes; versions before AC1021 use the drawing code page
pub fn write_bytes(doc: &CadDocument, version: DxfVersion) -> Vec<u8> {
    DxfWriter::new(doc)
        .with_configuration(DxfWriterConfiguration {
            version: Some(version),
            ..Default::default()
        })
        .write_to_vec()
        .unwrap_or_else(|e| panic!("writing {version} failed: {e}"))
}

/// Text DXF output of a document whose strings are all ASCII, or of any
/// document from AC1021 on
pub fn write_text(doc: &CadDocument, version: DxfVersion) -> String {
    String::from_utf8(write_bytes(doc, version)).expect("text DXF is UTF-8")
}

pub fn write_binary(doc: &CadDocument, version: DxfVersion) -> Vec<u8> {
    DxfWriter::new(doc)
        .with_configuration(DxfWriterConfiguration {
            version: Some(version),
            binary: true,
            ..Default::default()
        })
        .write_to_vec()
        .unwrap_or_else(|e| panic!("writing binary {version} failed: {e}"))
}

pub fn read_bytes(bytes: Vec<u8>) -> CadDocument {
    DxfReader::from_reader(Cursor::new(bytes))
        .and_then(|reader| reader.read())
        .unwrap_or_else(|e| panic!("reading failed: {e}"))
}

/// Write as text at `version` and read the result back
pub fn round_trip(doc: &CadDocument, version: DxfVersion) -> CadDocument {
    read_bytes(write_bytes(doc, version))
}

// ─── Pair scanning ───

/// Split text DXF output into code/value pairs
pub fn pairs(text: &str) -> Vec<Pair> {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .chunks(2)
        .filter(|chunk| chunk.len() == 2)
        .map(|chunk| {
            let code = chunk[0]
                .trim()
                .parse()
                .unwrap_or_else(|_| panic!("bad group code line {:?}", chunk[0]));
            (code, chunk[1].to_string())
        })
        .collect()
}

/// Section names in file order
pub fn section_names(pairs: &[Pair]) -> Vec<String> {
    pairs
        .windows(2)
        .filter(|w| w[0] == p(0, "SECTION") && w[1].0 == 2)
        .map(|w| w[1].1.clone())
        .collect()
}

/// Pairs between `0 SECTION / 2 name` and its ENDSEC
pub fn section<'a>(pairs: &'a [Pair], name: &str) -> &'a [Pair] {
    let start = pairs
        .windows(2)
        .position(|w| w[0] == p(0, "SECTION") && w[1] == p(2, name))
        .unwrap_or_else(|| panic!("section {name} missing"));
    let end = pairs[start..]
        .iter()
        .position(|x| *x == p(0, "ENDSEC"))
        .map(|i| start + i)
        .unwrap_or(pairs.len());
    &pairs[start + 2..end]
}

/// Pairs between `0 TABLE / 2 name` and its ENDTAB
pub fn table<'a>(pairs: &'a [Pair], name: &str) -> &'a [Pair] {
    let start = pairs
        .windows(2)
        .position(|w| w[0] == p(0, "TABLE") && w[1] == p(2, name))
        .unwrap_or_else(|| panic!("table {name} missing"));
    let end = pairs[start..]
        .iter()
        .position(|x| *x == p(0, "ENDTAB"))
        .map(|i| start + i)
        .unwrap_or(pairs.len());
    &pairs[start + 2..end]
}

/// Records of a section or table: each starts at a `0` pair
pub fn records(pairs: &[Pair]) -> Vec<&[Pair]> {
    let mut starts: Vec<usize> = pairs
        .iter()
        .enumerate()
        .filter(|(_, x)| x.0 == 0)
        .map(|(i, _)| i)
        .collect();
    starts.push(pairs.len());
    starts.windows(2).map(|w| &pairs[w[0]..w[1]]).collect()
}

/// The record named `kind` whose `2` name is `name`
pub fn named_record<'a>(pairs: &'a [Pair], kind: &str, name: &str) -> &'a [Pair] {
    records(pairs)
        .into_iter()
        .find(|r| r[0] == p(0, kind) && r.contains(&p(2, name)))
        .unwrap_or_else(|| panic!("{kind} {name} missing"))
}

/// First value stored under `code` in a record
pub fn value<'a>(record: &'a [Pair], code: i32) -> Option<&'a str> {
    record.iter().find(|x| x.0 == code).map(|x| x.1.as_str())
}
