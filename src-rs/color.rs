//! Colour tokens used by the grid.
//!
//! Every cell stores a [`Color`], an opaque 8-bit RGB triple that prints as
//! `#RRGGBB`. White is the background sentinel and means "no stitch".

use crate::error::ChartError;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xFF, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);

    /// Colour that marks an unworked cell.
    pub const BACKGROUND: Color = Color::WHITE;

    pub fn is_background(self) -> bool {
        self == Self::BACKGROUND
    }

    /// Accepts `#RRGGBB` or bare `RRGGBB`, either case.
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let s = raw.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// Hex string or palette name ("dark green", "Red").
    pub fn parse_named(raw: &str) -> Option<Self> {
        Self::parse_hex(raw).or_else(|| {
            let wanted = raw.trim().to_ascii_lowercase().replace(['-', '_'], " ");
            PALETTE
                .iter()
                .find(|entry| entry.name.to_ascii_lowercase() == wanted)
                .map(|entry| entry.color)
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Alpha is dropped; every sampled pixel counts as opaque.
    pub fn from_rgba(px: Rgba<u8>) -> Self {
        let [r, g, b, _] = px.0;
        Self::rgb(r, g, b)
    }

    /// Name from the fixed palette when the colour matches an entry exactly.
    pub fn palette_name(self) -> Option<&'static str> {
        PALETTE
            .iter()
            .find(|entry| entry.color == self)
            .map(|entry| entry.name)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BACKGROUND
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s).ok_or_else(|| ChartError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Color,
    pub name: &'static str,
}

const fn entry(r: u8, g: u8, b: u8, name: &'static str) -> PaletteEntry {
    PaletteEntry {
        color: Color::rgb(r, g, b),
        name,
    }
}

/// The twelve paint colours offered by the editor, in display order.
pub const PALETTE: [PaletteEntry; 12] = [
    entry(0xFF, 0x00, 0x00, "Red"),
    entry(0xFF, 0x99, 0x00, "Orange"),
    entry(0xFF, 0xFF, 0x00, "Yellow"),
    entry(0x00, 0xFF, 0x00, "Green"),
    entry(0x00, 0x00, 0xFF, "Blue"),
    entry(0x99, 0x00, 0xFF, "Purple"),
    entry(0xFF, 0x00, 0xFF, "Pink"),
    entry(0xFF, 0xFF, 0xFF, "White"),
    entry(0x00, 0x00, 0x00, "Black"),
    entry(0xCC, 0xCC, 0xCC, "Gray"),
    entry(0x66, 0x33, 0x00, "Brown"),
    entry(0x00, 0x66, 0x00, "Dark Green"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_in_either_case() {
        assert_eq!(Color::parse_hex("#ff9900"), Some(Color::rgb(0xFF, 0x99, 0x00)));
        assert_eq!(Color::parse_hex("663300"), Some(Color::rgb(0x66, 0x33, 0x00)));
        assert_eq!(Color::parse_hex("#12345"), None);
        assert_eq!(Color::parse_hex("#GG0000"), None);
    }

    #[test]
    fn formats_uppercase_hex() {
        assert_eq!(Color::rgb(0xab, 0x0c, 0x01).to_string(), "#AB0C01");
        assert_eq!(Color::BACKGROUND.to_hex(), "#FFFFFF");
    }

    #[test]
    fn lowercase_white_is_background() {
        let white: Color = "#ffffff".parse().unwrap();
        assert!(white.is_background());
    }

    #[test]
    fn palette_names_resolve_both_ways() {
        assert_eq!(Color::GREEN.palette_name(), Some("Green"));
        assert_eq!(Color::rgb(1, 2, 3).palette_name(), None);
        assert_eq!(Color::parse_named("dark-green"), Some(Color::rgb(0x00, 0x66, 0x00)));
        assert_eq!(Color::parse_named("RED"), Some(Color::RED));
        assert_eq!(Color::parse_named("mauve"), None);
    }

    #[test]
    fn serializes_as_hex_string() {
        let raw = serde_json::to_string(&Color::BLUE).unwrap();
        assert_eq!(raw, "\"#0000FF\"");
        let back: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(back, Color::GREEN);
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }

    #[test]
    fn alpha_is_ignored() {
        assert_eq!(Color::from_rgba(Rgba([10, 20, 30, 0])), Color::rgb(10, 20, 30));
    }
}
