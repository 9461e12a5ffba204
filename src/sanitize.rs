/// Sanitization and escaping utilities.
///
/// Pure string helpers: the URL scheme filter, the HTML entity escapers, the
/// backslash unescape used for link targets, and the source preprocessor run
/// before every parse.
use regex::Regex;
use std::sync::LazyLock;

static UNESCAPE_URL_R: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\([^0-9A-Za-z\s])").expect("unescape regex"));

/// Normalizes a source string before parsing: `\r\n` and lone `\r` become
/// `\n`, form feeds are stripped, and each tab becomes four spaces.
pub fn preprocess(source: &str) -> String {
    source
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{0C}', "")
        .replace('\t', "    ")
}

/// Filters URLs by scheme. Returns `None` for missing URLs, for URLs whose
/// percent-escapes do not decode, and for `javascript:`, `vbscript:` and
/// `data:` targets; otherwise returns the original URL unmodified.
///
/// The scheme check runs on the decoded form with everything outside
/// `[A-Za-z0-9/:]` stripped and lowercased, so encoded or space-padded
/// schemes cannot sneak through.
pub fn sanitize_url(url: Option<&str>) -> Option<String> {
    let url = url?;
    let decoded = percent_decode(url)?;
    let scheme: String = decoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':'))
        .collect::<String>()
        .to_ascii_lowercase();
    if scheme.starts_with("javascript:")
        || scheme.starts_with("vbscript:")
        || scheme.starts_with("data:")
    {
        return None;
    }
    Some(url.to_owned())
}

/// Replaces characters unsafe in HTML text content with their fixed
/// entities.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes attribute values. Slashes and backticks are harmless inside a
/// quoted attribute and stay as-is, which keeps emitted `href` targets
/// readable.
pub fn sanitize_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Removes the backslash from each `\X` where `X` is neither alphanumeric
/// nor whitespace; the escape form used inside link targets.
pub fn unescape_url(raw: &str) -> String {
    UNESCAPE_URL_R.replace_all(raw, "$1").into_owned()
}

// Decodes %XX escapes. Malformed escapes or invalid UTF-8 yield None, which
// sanitize_url treats as a rejected URL.
fn percent_decode(input: &str) -> Option<String> {
    if !input.contains('%') {
        return Some(input.to_owned());
    }
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let high = (hex[0] as char).to_digit(16)?;
            let low = (hex[1] as char).to_digit(16)?;
            out.push((high * 16 + low) as u8);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
