use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use panchang_logging::panchang_warn;

/// How far into the body a `<meta charset>` declaration is looked for.
const META_PRESCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode a response body to UTF-8: BOM -> Content-Type charset ->
/// `<meta charset>` -> chardetng guess.
///
/// Decoding is lossy. Malformed bytes become U+FFFD and the rest of the
/// page stays readable.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_param)
        .or_else(|| meta_charset(&bytes[..bytes.len().min(META_PRESCAN_BYTES)]))
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn meta_charset(head: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = text.find("charset=")? + "charset=".len();
    let label: String = text[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedHtml {
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        panchang_warn!(
            "Body is not valid {}; malformed bytes replaced",
            actual.name()
        );
    }
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: actual.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_param_is_case_insensitive_and_unquoted() {
        assert_eq!(
            charset_param("text/html; Charset=\"ISO-8859-1\"").as_deref(),
            Some("ISO-8859-1")
        );
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn meta_charset_is_found_in_head() {
        let head = br#"<html><head><meta charset="windows-1252"><title>x</title>"#;
        assert_eq!(meta_charset(head).as_deref(), Some("windows-1252"));
        let http_equiv =
            br#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#;
        assert_eq!(meta_charset(http_equiv).as_deref(), Some("utf-8"));
    }

    #[test]
    fn utf8_body_without_hints_decodes() {
        let decoded = decode_html("<p>Ekadashi — ॐ</p>".as_bytes(), None);
        assert_eq!(decoded.html, "<p>Ekadashi — ॐ</p>");
        assert!(!decoded.had_errors);
    }

    #[test]
    fn malformed_bytes_are_replaced_not_rejected() {
        let decoded = decode_html(b"caf\xe9 au lait", Some("text/html; charset=utf-8"));
        assert_eq!(decoded.html, "caf\u{fffd} au lait");
        assert_eq!(decoded.encoding_label, "UTF-8");
        assert!(decoded.had_errors);
    }

    #[test]
    fn bom_overrides_declared_charset() {
        let decoded = decode_html(b"\xef\xbb\xbfTithi", Some("text/html; charset=windows-1252"));
        assert_eq!(decoded.html, "Tithi");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }
}
