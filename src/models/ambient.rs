//! Ambient color model

use serde::{Deserialize, Serialize};

/// RGB color sampled from an image
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AmbientColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AmbientColor {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex color
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Overlay of this color at the given opacity
    #[must_use]
    pub fn overlay(self, opacity: f32) -> Overlay {
        Overlay {
            color: self,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

/// Page-wide background tint
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub color: AmbientColor,
    pub opacity: f32,
}

impl Overlay {
    /// CSS value, e.g. `rgba(200,100,50,0.3)`
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.color.r, self.color.g, self.color.b, self.opacity
        )
    }
}
