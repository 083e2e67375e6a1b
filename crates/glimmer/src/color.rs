use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel colour, as sampled from a slide photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Fallback theme colour used while a slide has no sampled colour.
    pub const HOT_PINK: Rgb = Rgb::new(255, 105, 180);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceptual brightness on a 0..=255 scale (ITU-R BT.601 weights).
    pub fn brightness(&self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }

    pub fn is_light(&self) -> bool {
        self.brightness() > 128.0
    }

    pub fn complement(&self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_weights() {
        assert_eq!(Rgb::new(0, 0, 0).brightness(), 0.0);
        assert!((Rgb::new(255, 255, 255).brightness() - 255.0).abs() < 0.01);
        assert!((Rgb::new(255, 0, 0).brightness() - 76.245).abs() < 0.01);
    }

    #[test]
    fn test_light_and_dark() {
        assert!(Rgb::new(240, 240, 200).is_light());
        assert!(!Rgb::new(20, 30, 90).is_light());
    }

    #[test]
    fn test_hex_parse() {
        assert_eq!(Rgb::from_hex("#ff69b4"), Some(Rgb::HOT_PINK));
        assert_eq!(Rgb::from_hex("FF69B4"), Some(Rgb::HOT_PINK));
        assert_eq!(Rgb::from_hex("#ff69b"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
        assert_eq!(Rgb::HOT_PINK.to_hex(), "#ff69b4");
    }

    #[test]
    fn test_complement() {
        assert_eq!(Rgb::new(255, 0, 10).complement(), Rgb::new(0, 255, 245));
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "rgb(1, 2, 3)");
    }
}
