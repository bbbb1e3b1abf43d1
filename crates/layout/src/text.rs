//! Advance-based text measurement and greedy line wrapping.

use crate::fonts::{FontLibrary, FontWeight};
use folio_scene::{FontFace, TextRun};
use folio_types::{Color, Point};

/// Average advance, in ems, used when no font program is available.
const FALLBACK_ADVANCE_EM: f32 = 0.55;
const FALLBACK_BOLD_ADVANCE_EM: f32 = 0.6;
/// Baseline offset from the top of the line box, in ems.
const ASCENT_EM: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
    /// Line box height as a multiple of `size`.
    pub line_height: f32,
}

impl TextStyle {
    pub fn new(size: f32, weight: FontWeight, color: Color) -> Self {
        Self {
            size,
            weight,
            color,
            line_height: 1.4,
        }
    }

    pub fn line_height(mut self, factor: f32) -> Self {
        self.line_height = factor;
        self
    }

    pub fn line_box(&self) -> f32 {
        self.size * self.line_height
    }

    /// Distance from the top of a line box to its baseline.
    pub fn baseline_offset(&self) -> f32 {
        (self.line_box() - self.size) / 2.0 + self.size * ASCENT_EM
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone)]
pub struct Typesetter {
    fonts: FontLibrary,
}

impl Typesetter {
    pub fn new(fonts: FontLibrary) -> Self {
        Self { fonts }
    }

    pub fn face(&self, weight: FontWeight) -> Option<FontFace> {
        self.fonts.resolve(weight)
    }

    pub fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        let face = self.face(style.weight);
        Metrics::new(face.as_ref()).width(text, style)
    }

    /// Splits `text` into lines no wider than `max_width`.
    ///
    /// Explicit newlines always break. Runs of spaces collapse. A single word
    /// wider than the line is broken between characters.
    pub fn wrap(&self, text: &str, style: &TextStyle, max_width: f32) -> Vec<String> {
        let face = self.face(style.weight);
        let metrics = Metrics::new(face.as_ref());
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                if metrics.width(&candidate, style) <= max_width {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if metrics.width(word, style) <= max_width {
                    current = word.to_string();
                } else {
                    let mut pieces = break_word(&metrics, word, style, max_width);
                    current = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                }
            }
            lines.push(current);
        }
        lines
    }

    /// A run whose line box starts at `top`, aligned within `[x, x + width]`.
    pub fn run(
        &self,
        text: &str,
        x: f32,
        top: f32,
        width: f32,
        align: Align,
        style: &TextStyle,
    ) -> TextRun {
        let measured = self.measure(text, style);
        let left = match align {
            Align::Left => x,
            Align::Center => x + (width - measured) / 2.0,
            Align::Right => x + width - measured,
        };
        TextRun {
            origin: Point::new(left, top + style.baseline_offset()),
            text: text.to_string(),
            size: style.size,
            color: style.color,
            font: self.face(style.weight),
        }
    }
}

fn break_word(metrics: &Metrics<'_>, word: &str, style: &TextStyle, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1 && metrics.width(&current, style) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    pieces.push(current);
    pieces
}

/// Advance source for one wrap or measure call. The font program is parsed
/// once here, not per candidate line.
enum Metrics<'a> {
    Face(ttf_parser::Face<'a>),
    Fallback,
}

impl<'a> Metrics<'a> {
    fn new(face: Option<&'a FontFace>) -> Self {
        face.and_then(|face| ttf_parser::Face::parse(&face.data, face.index).ok())
            .map_or(Metrics::Fallback, Metrics::Face)
    }

    /// Sum of horizontal advances, without kerning. Characters missing from
    /// the font advance by the fallback width.
    fn width(&self, text: &str, style: &TextStyle) -> f32 {
        let parsed = match self {
            Metrics::Face(parsed) => parsed,
            Metrics::Fallback => return fallback_width(text, style),
        };
        let scale = style.size / parsed.units_per_em().max(1) as f32;
        text.chars()
            .map(|ch| {
                parsed
                    .glyph_index(ch)
                    .and_then(|gid| parsed.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 * scale)
                    .unwrap_or(style.size * FALLBACK_ADVANCE_EM)
            })
            .sum()
    }
}

pub fn measure_with_face(face: &FontFace, text: &str, style: &TextStyle) -> f32 {
    Metrics::new(Some(face)).width(text, style)
}

pub fn fallback_width(text: &str, style: &TextStyle) -> f32 {
    let em = match style.weight {
        FontWeight::Regular => FALLBACK_ADVANCE_EM,
        _ => FALLBACK_BOLD_ADVANCE_EM,
    };
    text.chars().count() as f32 * style.size * em
}
