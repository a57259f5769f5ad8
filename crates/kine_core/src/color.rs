//! Color values

use crate::error::{ConfigError, ConfigResult};
use serde::Serialize;

/// RGBA color (sRGB, straight alpha)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Parse a `#rrggbb` / `#rrggbbaa` string or one of the renderer's
    /// palette names (`white`, `blue`, `red`, `green`, `yellow`, `gray`).
    pub fn parse(input: &str) -> ConfigResult<Self> {
        let trimmed = input.trim();
        let named = match trimmed.to_ascii_lowercase().as_str() {
            "white" => Some(0xFFFFFF),
            "black" => Some(0x000000),
            "blue" => Some(0x58C4DD),
            "red" => Some(0xFC6258),
            "green" => Some(0x83C167),
            "yellow" => Some(0xFFFF00),
            "gray" | "grey" => Some(0x888888),
            _ => None,
        };
        if let Some(hex) = named {
            return Ok(Self::from_hex(hex));
        }

        let invalid = || ConfigError::InvalidColor(input.to_string());
        let digits = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        match digits.len() {
            6 => {
                let hex = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                Ok(Self::from_hex(hex))
            }
            8 => {
                let hex = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                Ok(Self::from_hex(hex >> 8).with_alpha((hex & 0xFF) as f32 / 255.0))
            }
            _ => Err(invalid()),
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
