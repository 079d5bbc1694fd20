//! Text metrics.
//!
//! The layout engine sizes pieces from the rendered width of their labels.
//! Hosts provide a [`TextMeasure`] backed by their text shaper (the web
//! bridge uses a canvas 2D context); headless hosts and tests use
//! [`AdvanceMeasure`]. A measurer that cannot measure returns 0, which the
//! layout engine treats as "unknown" and answers with the minimum width.

use serde::{Deserialize, Serialize};

/// Font description used to measure piece labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    /// CSS font weight (e.g., 700 for bold).
    pub weight: u16,
    /// Font size in CSS pixels.
    pub size_px: f32,
    /// CSS font-family list.
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            weight: 700,
            size_px: 20.0,
            family: "\"Fredoka\", sans-serif".to_string(),
        }
    }
}

impl FontSpec {
    /// Create a bold display font at the given size.
    pub fn new(size_px: f32) -> Self {
        Self {
            size_px,
            ..Default::default()
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_family(mut self, family: &str) -> Self {
        self.family = family.to_string();
        self
    }

    /// CSS `font` shorthand, e.g. `700 20px "Fredoka", sans-serif`.
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size_px, self.family)
    }
}

/// Measures the rendered pixel width of a label.
pub trait TextMeasure {
    /// Width of `text` rendered with `font`, in CSS pixels. 0 means unknown.
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32;
}

/// Fixed-advance estimate: every character advances `advance × size_px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceMeasure {
    /// Horizontal advance as fraction of the font size (0.6 is typical for a bold sans).
    pub advance: f32,
}

impl Default for AdvanceMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl AdvanceMeasure {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl TextMeasure for AdvanceMeasure {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size_px * self.advance
    }
}

/// Measurer for contexts without text shaping (pre-render, server side).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMeasure;

impl TextMeasure for NullMeasure {
    fn measure(&mut self, _text: &str, _font: &FontSpec) -> f32 {
        0.0
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        (**self).measure(text, font)
    }
}
