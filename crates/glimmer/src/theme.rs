use eframe::egui::Color32;

use crate::color::Rgb;

/// Window chrome shared by every slide. Per-slide colours live in [`SlidePalette`].
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color32,
    pub foreground: Color32,
    pub muted: Color32,
    /// Colour used for slides whose photo has not been sampled (or failed to).
    pub default_accent: Rgb,
    pub title_size: f32,
    pub caption_size: f32,
    pub control_size: f32,
}

impl Theme {
    pub fn night() -> Self {
        Self {
            background: Color32::from_rgb(0x0B, 0x0B, 0x1A),
            foreground: Color32::from_rgb(0xF2, 0xF2, 0xF7),
            muted: Color32::from_rgb(0x6E, 0x6E, 0x8A),
            default_accent: Rgb::HOT_PINK,
            title_size: 56.0,
            caption_size: 30.0,
            control_size: 44.0,
        }
    }

    pub fn with_default_accent(mut self, accent: Rgb) -> Self {
        self.default_accent = accent;
        self
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    /// Resolve the palette for a slide from its cached colour, if any.
    pub fn palette_for(&self, sampled: Option<Rgb>) -> SlidePalette {
        match sampled {
            Some(rgb) => SlidePalette::from_sample(rgb),
            None => SlidePalette::fallback(self.default_accent),
        }
    }
}

/// Theme-dependent colours for the current slide: glow, active dot and
/// navigation controls all follow the accent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidePalette {
    pub accent: Rgb,
    /// False when the accent is the fallback rather than a sampled colour.
    pub sampled: bool,
    pub brightness: f32,
    /// Text colour that contrasts with the accent.
    pub contrast: Color32,
    pub glow: Color32,
    pub indicator: Color32,
    pub indicator_glow: Color32,
    pub nav: Color32,
    pub nav_border: Color32,
    pub frame_border: Color32,
    pub caption_background: Color32,
    pub caption_border: Color32,
}

impl SlidePalette {
    pub fn from_sample(rgb: Rgb) -> Self {
        Self::build(rgb, true)
    }

    pub fn fallback(rgb: Rgb) -> Self {
        Self::build(rgb, false)
    }

    fn build(rgb: Rgb, sampled: bool) -> Self {
        let base = Color32::from_rgb(rgb.r, rgb.g, rgb.b);
        let brightness = rgb.brightness();
        let contrast = if rgb.is_light() {
            Color32::from_rgb(0x12, 0x12, 0x1E)
        } else {
            Color32::WHITE
        };
        Self {
            accent: rgb,
            sampled,
            brightness,
            contrast,
            glow: Theme::with_opacity(base, 0.8),
            indicator: base,
            indicator_glow: base,
            nav: base,
            nav_border: Theme::with_opacity(base, 0.5),
            frame_border: Theme::with_opacity(base, 0.7),
            caption_background: Theme::with_opacity(base, 0.3),
            caption_border: Theme::with_opacity(base, 0.5),
        }
    }
}
