//! Text decoding for uploaded delimited files.

use encoding_rs::UTF_8;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;

/// Decodes raw bytes to text. A UTF-8 BOM is stripped; content that is not
/// valid UTF-8 is decoded as Windows-1252, the usual encoding of spreadsheet
/// exports on Brazilian Portuguese systems.
pub(crate) fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(strip_bom(bytes)) {
        text
    } else {
        let (text, _, _) = WINDOWS_1252.decode(bytes);
        text
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// First `count` characters of `value` (not bytes).
pub(crate) fn take_chars(value: &str, count: usize) -> &str {
    match value.char_indices().nth(count) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8_with_bom() {
        assert_eq!(decode(b"\xEF\xBB\xBFData;Evento"), "Data;Evento");
    }

    #[test]
    fn falls_back_to_windows_1252() {
        // "Antecipação" in Latin-1
        let bytes = b"Taxa Antecipa\xE7\xE3o";
        assert_eq!(decode(bytes), "Taxa Antecipação");
    }

    #[test]
    fn take_chars_counts_characters() {
        assert_eq!(take_chars("ação", 2), "aç");
        assert_eq!(take_chars("abc", 10), "abc");
        assert_eq!(take_chars("", 3), "");
    }
}
