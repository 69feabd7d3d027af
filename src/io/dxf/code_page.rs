//! `$DWGCODEPAGE` names and the single-byte encodings behind them.
//!
//! Files older than AC1021 store strings in the code page named by the
//! header. The writer encodes with it, escaping whatever it cannot map, and
//! the reader decodes with it.

use encoding_rs::*;

/// Lower-case code page names. DOS pages without an exact `encoding_rs`
/// counterpart map to the nearest Windows page for the same script.
static CODE_PAGES: &[(&str, &Encoding)] = &[
    ("ansi_874", &WINDOWS_874_INIT),
    ("ansi_932", &SHIFT_JIS_INIT),
    ("ansi_936", &GBK_INIT),
    ("gb2312", &GBK_INIT),
    ("ansi_949", &EUC_KR_INIT),
    ("korean", &EUC_KR_INIT),
    ("johab", &EUC_KR_INIT),
    ("ansi_950", &BIG5_INIT),
    ("big5", &BIG5_INIT),
    ("ansi_1250", &WINDOWS_1250_INIT),
    ("ansi_1251", &WINDOWS_1251_INIT),
    ("ansi_1252", &WINDOWS_1252_INIT),
    ("ansi_1253", &WINDOWS_1253_INIT),
    ("ansi_1254", &WINDOWS_1254_INIT),
    ("ansi_1255", &WINDOWS_1255_INIT),
    ("ansi_1256", &WINDOWS_1256_INIT),
    ("ansi_1257", &WINDOWS_1257_INIT),
    ("ansi_1258", &WINDOWS_1258_INIT),
    ("dos437", &IBM866_INIT),
    ("dos850", &WINDOWS_1252_INIT),
    ("dos852", &WINDOWS_1250_INIT),
    ("dos855", &IBM866_INIT),
    ("dos857", &WINDOWS_1254_INIT),
    ("dos860", &WINDOWS_1252_INIT),
    ("dos861", &WINDOWS_1252_INIT),
    ("dos863", &WINDOWS_1252_INIT),
    ("dos865", &WINDOWS_1252_INIT),
    ("dos866", &IBM866_INIT),
    ("dos869", &WINDOWS_1253_INIT),
    ("iso8859-1", &WINDOWS_1252_INIT),
    ("iso8859-2", &ISO_8859_2_INIT),
    ("iso8859-3", &ISO_8859_3_INIT),
    ("iso8859-4", &ISO_8859_4_INIT),
    ("iso8859-5", &ISO_8859_5_INIT),
    ("iso8859-6", &ISO_8859_6_INIT),
    ("iso8859-7", &ISO_8859_7_INIT),
    ("iso8859-8", &ISO_8859_8_INIT),
    ("iso8859-9", &WINDOWS_1254_INIT),
    ("iso8859-10", &ISO_8859_10_INIT),
    ("iso8859-13", &ISO_8859_13_INIT),
    ("iso8859-14", &ISO_8859_14_INIT),
    ("iso8859-15", &ISO_8859_15_INIT),
    ("koi8-r", &KOI8_R_INIT),
    ("koi8-u", &KOI8_U_INIT),
];

/// Names that mean "no transcoding"
const UNICODE_NAMES: &[&str] = &["ascii", "utf-8", "utf8", "unicode"];

/// Encoding for a `$DWGCODEPAGE` value.
///
/// Lookup ignores case and accepts `iso_8859-N` for `iso8859-N`. `None`
/// means strings pass through as UTF-8. Unrecognized names fall back to
/// Windows-1252.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = normalize(code_page);
    if UNICODE_NAMES.contains(&name.as_str()) {
        return None;
    }
    let encoding = CODE_PAGES
        .iter()
        .find(|(known, _)| *known == name)
        .map_or(WINDOWS_1252, |(_, encoding)| *encoding);
    Some(encoding)
}

fn normalize(code_page: &str) -> String {
    let name = code_page.trim().to_ascii_lowercase();
    match name.strip_prefix("iso_8859") {
        Some(rest) => format!("iso8859{rest}"),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_ignore_case_and_spacing() {
        assert_eq!(encoding_from_code_page("ANSI_1251"), Some(WINDOWS_1251));
        assert_eq!(encoding_from_code_page(" ansi_1251 "), Some(WINDOWS_1251));
        assert_eq!(encoding_from_code_page("ISO_8859-5"), Some(ISO_8859_5));
        assert_eq!(encoding_from_code_page("iso8859-15"), Some(ISO_8859_15));
    }

    #[test]
    fn test_unicode_names_skip_transcoding() {
        for name in ["ASCII", "UTF-8", "utf8", "Unicode"] {
            assert_eq!(encoding_from_code_page(name), None, "{name}");
        }
    }

    #[test]
    fn test_unknown_falls_back_to_western() {
        assert_eq!(encoding_from_code_page("ANSI_9999"), Some(WINDOWS_1252));
        assert_eq!(encoding_from_code_page(""), Some(WINDOWS_1252));
    }

    #[test]
    fn test_multibyte_pages() {
        assert_eq!(encoding_from_code_page("GB2312"), Some(GBK));
        assert_eq!(encoding_from_code_page("ANSI_950"), Some(BIG5));
        assert_eq!(encoding_from_code_page("ANSI_932"), Some(SHIFT_JIS));
        assert_eq!(encoding_from_code_page("Johab"), Some(EUC_KR));
    }

    #[test]
    fn test_every_table_name_is_normalized() {
        for (name, encoding) in CODE_PAGES {
            assert_eq!(normalize(name), *name);
            assert_eq!(encoding_from_code_page(&name.to_uppercase()), Some(*encoding));
        }
    }
}
