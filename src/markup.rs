//! Inline markup to text runs.
//!
//! Paragraph text may carry a small HTML subset. Hosts with their own
//! markup dialect plug in a [`MarkupParser`]; [`HtmlSubsetParser`] is the
//! default and understands:
//!
//! - `<b>`, `<strong>`: bold
//! - `<i>`, `<em>`: italic
//! - `<u>`, `<ins>`: underline
//! - `<s>`, `<del>`, `<strike>`: strikethrough
//! - `<br>`: line break inside the paragraph
//! - character and the common named entities
//!
//! Other tags are ignored but their text is kept.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::model::{Font, TextRun};

/// Turns a paragraph's inline markup into runs.
pub trait MarkupParser: Send + Sync {
    /// Parse `markup`. Every produced run starts from `base`.
    fn parse(&self, markup: &str, base: Option<&Font>) -> Vec<TextRun>;
}

/// Default parser for the HTML subset listed in the module docs.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlSubsetParser;

impl MarkupParser for HtmlSubsetParser {
    fn parse(&self, markup: &str, base: Option<&Font>) -> Vec<TextRun> {
        let base = base.cloned().unwrap_or_default();
        match parse_tagged(markup, &base) {
            Some(runs) => runs,
            None => {
                tracing::debug!(markup, "malformed inline markup, keeping text only");
                let text = strip_tags(markup);
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![make_run(text, &base)]
                }
            },
        }
    }
}

fn make_run(text: String, font: &Font) -> TextRun {
    if *font == Font::default() {
        TextRun::new(text)
    } else {
        TextRun::with_font(text, font.clone())
    }
}

/// Formatting a tag contributes on top of the enclosing font.
fn tag_font(name: &[u8]) -> Font {
    let mut font = Font::default();
    match name.to_ascii_lowercase().as_slice() {
        b"b" | b"strong" => font.weight = Some(700),
        b"i" | b"em" => font.italic = Some(true),
        b"u" | b"ins" => font.underline = Some(true),
        b"s" | b"del" | b"strike" => font.strike = Some(true),
        _ => {},
    }
    font
}

fn is_break(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"br")
}

/// Close HTML void `<br>` tags so the input is well formed.
fn normalize_breaks(markup: &str) -> String {
    markup
        .replace("<br>", "<br/>")
        .replace("<BR>", "<br/>")
        .replace("<br >", "<br/>")
}

struct RunBuilder {
    runs: Vec<TextRun>,
    text: String,
    font: Font,
}

impl RunBuilder {
    fn push(&mut self, text: &str, font: &Font) {
        if text.is_empty() {
            return;
        }
        if *font != self.font {
            self.flush();
            self.font = font.clone();
        }
        self.text.push_str(text);
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.runs.push(make_run(text, &self.font));
        }
    }
}

/// `None` when the markup is not well formed.
fn parse_tagged(markup: &str, base: &Font) -> Option<Vec<TextRun>> {
    let wrapped = format!("<root>{}</root>", normalize_breaks(markup));
    let mut reader = Reader::from_str(&wrapped);

    let mut stack: Vec<Font> = vec![base.clone()];
    let mut builder = RunBuilder {
        runs: Vec::new(),
        text: String::new(),
        font: base.clone(),
    };

    loop {
        let current = stack.last()?.clone();
        match reader.read_event().ok()? {
            Event::Start(e) => {
                let font = current.merged(&tag_font(e.name().as_ref()));
                stack.push(font);
            },
            Event::End(_) => {
                stack.pop();
                if stack.is_empty() {
                    // </root>
                    break;
                }
            },
            Event::Empty(e) => {
                if is_break(e.name().as_ref()) {
                    builder.push("\n", &current);
                }
            },
            Event::Text(t) => {
                builder.push(&String::from_utf8_lossy(&t), &current);
            },
            Event::CData(t) => {
                builder.push(&String::from_utf8_lossy(&t), &current);
            },
            Event::GeneralRef(r) => {
                let name = String::from_utf8_lossy(&r);
                let decoded = decode_entity(&name)?;
                builder.push(&decoded, &current);
            },
            Event::Eof => return None,
            _ => {},
        }
    }

    builder.flush();
    Some(builder.runs)
}

/// Decode the body of `&...;`.
fn decode_entity(name: &str) -> Option<String> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)?
        },
    };
    Some(ch.to_string())
}

/// Drop everything between `<` and `>`.
fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {},
        }
    }
    out
}
