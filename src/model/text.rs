use serde::{Deserialize, Serialize};

use crate::common::RgbColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// Space before (`top`) and after (`bottom`) a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphSpacing {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
}

/// Character formatting. Unset fields inherit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub name: Option<String>,
    pub size: Option<f64>,
    /// CSS-style weight; 600 and above renders bold.
    pub weight: Option<u16>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strike: Option<bool>,
    pub color: Option<RgbColor>,
}

impl Font {
    pub fn bold(&self) -> Option<bool> {
        self.weight.map(|w| w >= 600)
    }

    /// Fields set on `overrides` replace the ones on `self`.
    pub fn merged(&self, overrides: &Font) -> Font {
        Font {
            name: overrides.name.clone().or_else(|| self.name.clone()),
            size: overrides.size.or(self.size),
            weight: overrides.weight.or(self.weight),
            italic: overrides.italic.or(self.italic),
            underline: overrides.underline.or(self.underline),
            strike: overrides.strike.or(self.strike),
            color: overrides.color.or(self.color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub font: Option<Font>,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    pub fn with_font(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font: Some(font),
        }
    }
}

/// A paragraph of text.
///
/// When `text` (inline markup) is set it is parsed into runs and
/// `text_runs` is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub alignment: Option<Alignment>,
    /// Line height as a multiple of the font's single spacing.
    pub line_height: Option<f64>,
    pub font: Option<Font>,
    pub spacing: Option<ParagraphSpacing>,
    pub text: Option<String>,
    pub text_runs: Vec<TextRun>,
}

impl Paragraph {
    pub fn markup(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn runs(text_runs: Vec<TextRun>) -> Self {
        Self {
            text_runs,
            ..Default::default()
        }
    }
}
