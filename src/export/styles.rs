//! Colours and cell formats used by the workbook renderer.

use rust_xlsxwriter::{Color, Format};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::TipsError;

const HEADER_FILL: u32 = 0xB2B2B2;
const HEADER_FONT: u32 = 0xFFFFFF;
const POSITIVE_FILL: u32 = 0xC6EFCE;
const POSITIVE_FONT: u32 = 0x006400;
const NEGATIVE_FILL: u32 = 0xFFC7CE;
const NEGATIVE_FONT: u32 = 0x8B0000;

pub const PROFIT_NUM_FORMAT: &str = "0.00";
pub const ROI_NUM_FORMAT: &str = "0.00%";
pub const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";
pub const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
pub const TIME_NUM_FORMAT: &str = "hh:mm:ss";

/// 24-bit RGB colour, parsed from `#RRGGBB` or `RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u32);

impl FromStr for Rgb {
    type Err = TipsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TipsError::Validation(format!(
                "invalid colour '{}', expected #RRGGBB",
                s
            )));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|e| TipsError::Validation(format!("invalid colour '{}': {}", s, e)))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Optional fill overrides for positive/negative cells.
///
/// When a hint is absent the built-in light green / light red fill is used.
/// Font colours are never overridden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ColorHints {
    pub positive: Option<Rgb>,
    pub negative: Option<Rgb>,
}

/// Sign-driven colouring of a data cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Positive,
    Negative,
}

/// Visual style of one data cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub bold: bool,
    pub tone: Option<Tone>,
    pub num_format: Option<&'static str>,
}

impl CellStyle {
    pub fn is_plain(&self) -> bool {
        *self == CellStyle::default()
    }
}

/// Concrete colours for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePalette {
    pub positive_fill: Rgb,
    pub negative_fill: Rgb,
}

impl StylePalette {
    pub fn from_hints(hints: &ColorHints) -> Self {
        Self {
            positive_fill: hints.positive.unwrap_or(Rgb(POSITIVE_FILL)),
            negative_fill: hints.negative.unwrap_or(Rgb(NEGATIVE_FILL)),
        }
    }

    /// Solid gray fill, white bold text
    pub fn header_format(&self) -> Format {
        Format::new()
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_font_color(Color::RGB(HEADER_FONT))
            .set_bold()
    }

    pub fn cell_format(&self, style: &CellStyle) -> Format {
        let mut format = Format::new();
        if style.bold {
            format = format.set_bold();
        }
        if let Some(num_format) = style.num_format {
            format = format.set_num_format(num_format);
        }
        match style.tone {
            Some(Tone::Positive) => {
                format = format
                    .set_background_color(Color::RGB(self.positive_fill.0))
                    .set_font_color(Color::RGB(POSITIVE_FONT))
                    .set_bold();
            }
            Some(Tone::Negative) => {
                format = format
                    .set_background_color(Color::RGB(self.negative_fill.0))
                    .set_font_color(Color::RGB(NEGATIVE_FONT))
                    .set_bold();
            }
            None => {}
        }
        format
    }
}

impl Default for StylePalette {
    fn default() -> Self {
        Self::from_hints(&ColorHints::default())
    }
}

/// Builds each distinct `Format` once per render
#[derive(Debug)]
pub struct FormatCache {
    palette: StylePalette,
    formats: HashMap<CellStyle, Format>,
}

impl FormatCache {
    pub fn new(palette: StylePalette) -> Self {
        Self {
            palette,
            formats: HashMap::new(),
        }
    }

    pub fn get(&mut self, style: &CellStyle) -> &Format {
        let palette = self.palette;
        self.formats
            .entry(*style)
            .or_insert_with(|| palette.cell_format(style))
    }
}
