use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Automaton is built once and shared between threads
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters for use in text nodes and attribute values.
///
/// Control characters that XML 1.0 forbids are dropped, except tab, line feed
/// and carriage return.
///
/// # Examples
///
/// ```
/// use deckwright::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// assert_eq!(escape_xml("bell\u{7}"), "bell");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    let escaped = XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]);
    if escaped.chars().any(is_forbidden_control) {
        escaped.chars().filter(|c| !is_forbidden_control(*c)).collect()
    } else {
        escaped
    }
}

#[inline]
fn is_forbidden_control(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\n' | '\r') && (c as u32) < 0x20
}
