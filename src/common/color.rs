use std::fmt;

use serde::{Deserialize, Serialize};

/// An sRGB color.
///
/// Deserializes from a hex string with or without the leading `#`
/// (`"1F6FEB"`, `"#1f6feb"`) and serializes back to the bare uppercase form
/// that `a:srgbClr/@val` expects.
///
/// # Examples
///
/// ```rust
/// use deckwright::common::RgbColor;
///
/// let teal = RgbColor::from_hex("#008080").unwrap();
/// assert_eq!(teal.to_hex(), "008080");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
    pub const WHITE: RgbColor = RgbColor::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `RRGGBB` or `#RRGGBB`. Three-digit shorthand is expanded.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            },
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            },
            _ => None,
        }
    }

    /// Uppercase hex without the `#` prefix.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for RgbColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value:?}"))
    }
}

impl From<RgbColor> for String {
    fn from(value: RgbColor) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}
