//! Paragraphs and runs from the deck model to text bodies.

use crate::common::Margin;
use crate::common::unit::{pt_to_centipoints, pt_to_emu};
use crate::markup::MarkupParser;
use crate::model::{Alignment, Font, Paragraph, TextRun};
use crate::ooxml::pptx::ext::apply_strike;
use crate::ooxml::pptx::{
    BodyProperties, ParagraphProperties, Run, RunProperties, TextAlign, TextBody, TextParagraph,
};

/// Line spacing unit: 1000ths of a percent.
const LINE_SPACING_PER_MULTIPLE: f64 = 100_000.0;

pub(crate) fn run_properties(font: &Font) -> RunProperties {
    let mut props = RunProperties {
        size: font.size.map(pt_to_centipoints),
        bold: font.bold(),
        italic: font.italic,
        underline: font.underline,
        color: font.color,
        typeface: font.name.clone(),
        ..Default::default()
    };
    apply_strike(&mut props, font.strike);
    props
}

fn text_align(alignment: Alignment) -> TextAlign {
    match alignment {
        Alignment::Left => TextAlign::Left,
        Alignment::Center => TextAlign::Center,
        Alignment::Right => TextAlign::Right,
        Alignment::Justify => TextAlign::Justify,
    }
}

fn paragraph_properties(paragraph: &Paragraph) -> ParagraphProperties {
    let spacing = paragraph.spacing.unwrap_or_default();
    ParagraphProperties {
        alignment: paragraph.alignment.map(text_align),
        line_spacing: paragraph
            .line_height
            .filter(|lh| *lh > 0.0)
            .map(|lh| (lh * LINE_SPACING_PER_MULTIPLE).round() as i64),
        space_before: spacing.top.map(pt_to_centipoints),
        space_after: spacing.bottom.map(pt_to_centipoints),
        default_run: paragraph.font.as_ref().map(run_properties),
    }
}

fn to_run(run: &TextRun) -> Run {
    let props = run.font.as_ref().map(run_properties).unwrap_or_default();
    Run::new(run.text.as_str(), props)
}

/// Inline markup, when present, replaces the explicit runs.
pub(crate) fn build_paragraph(paragraph: &Paragraph, markup: &dyn MarkupParser) -> TextParagraph {
    let runs = match paragraph.text.as_deref() {
        Some(text) => markup
            .parse(text, paragraph.font.as_ref())
            .iter()
            .map(to_run)
            .collect(),
        None => paragraph.text_runs.iter().map(to_run).collect(),
    };
    TextParagraph {
        props: paragraph_properties(paragraph),
        runs,
    }
}

/// Text frame with word wrap and the margin as insets.
pub(crate) fn body_properties(margin: Option<&Margin>, wrap: bool) -> BodyProperties {
    let m = margin.copied().unwrap_or_default();
    BodyProperties {
        wrap,
        insets: [m.left, m.top, m.right, m.bottom].map(|v| pt_to_emu(v.max(0.0))),
        anchor: None,
    }
}

pub(crate) fn build_text_body(
    paragraphs: &[Paragraph],
    body: BodyProperties,
    markup: &dyn MarkupParser,
) -> TextBody {
    let mut text = TextBody::new(body);
    text.paragraphs = paragraphs
        .iter()
        .map(|p| build_paragraph(p, markup))
        .collect();
    text
}
