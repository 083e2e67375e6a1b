pub mod image_cache;

use std::f32::consts::{PI, TAU};

use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};

use crate::deck::{Slide, SlideShape};
use crate::slideshow::SlideView;
use crate::slideshow::observer::Flourish;
use crate::theme::Theme;

use image_cache::ImageCache;

/// Number of outline points used to approximate curved shapes.
const CURVE_SEGMENTS: usize = 96;

/// Screen areas of the navigation controls, shared by drawing and hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsLayout {
    pub prev: Rect,
    pub next: Rect,
    pub dots: Vec<Rect>,
}

/// Design resolution is 1920x1080; everything scales from there.
pub fn compute_scale(rect: Rect) -> f32 {
    (rect.width() / 1920.0).min(rect.height() / 1080.0).max(0.1)
}

/// Square area that holds the framed photo.
pub fn frame_rect(rect: Rect, scale: f32) -> Rect {
    let side = (rect.height() - 320.0 * scale)
        .min(rect.width() - 360.0 * scale)
        .max(40.0);
    let center_y = rect.top() + 120.0 * scale + side / 2.0;
    Rect::from_center_size(Pos2::new(rect.center().x, center_y), Vec2::splat(side))
}

pub fn controls_layout(
    rect: Rect,
    slide_count: usize,
    scale: f32,
    theme: &Theme,
) -> ControlsLayout {
    let size = theme.control_size * scale;
    let frame = frame_rect(rect, scale);
    let button = Vec2::splat(size);
    let prev = Rect::from_center_size(
        Pos2::new(rect.left() + 40.0 * scale + size / 2.0, frame.center().y),
        button,
    );
    let next = Rect::from_center_size(
        Pos2::new(rect.right() - 40.0 * scale - size / 2.0, frame.center().y),
        button,
    );

    let dot = 14.0 * scale;
    let gap = 12.0 * scale;
    let total = slide_count as f32 * dot + slide_count.saturating_sub(1) as f32 * gap;
    let y = rect.bottom() - 40.0 * scale - dot / 2.0;
    let dots = (0..slide_count)
        .map(|i| {
            let x = rect.center().x - total / 2.0 + i as f32 * (dot + gap) + dot / 2.0;
            Rect::from_center_size(Pos2::new(x, y), Vec2::splat(dot))
        })
        .collect();

    ControlsLayout { prev, next, dots }
}

/// Closed outline of `shape` inscribed in the circle at `center` with `radius`.
/// Every outline is star-shaped around `center`, so it can be filled as a fan.
pub fn shape_outline(shape: SlideShape, center: Pos2, radius: f32) -> Vec<Pos2> {
    let polar = |angle: f32, r: f32| center + Vec2::angled(angle) * r;
    // Start at the top, clockwise in screen space.
    let top = -PI / 2.0;
    match shape {
        SlideShape::Circle => (0..CURVE_SEGMENTS)
            .map(|i| polar(top + TAU * i as f32 / CURVE_SEGMENTS as f32, radius))
            .collect(),
        SlideShape::Hexagon => regular_polygon(6, radius, top, &polar),
        SlideShape::Pentagon => regular_polygon(5, radius, top, &polar),
        SlideShape::Diamond => regular_polygon(4, radius, top, &polar),
        SlideShape::Star => (0..10)
            .map(|i| {
                let r = if i % 2 == 0 { radius } else { radius * 0.5 };
                polar(top + TAU * i as f32 / 10.0, r)
            })
            .collect(),
        SlideShape::Heart => (0..CURVE_SEGMENTS)
            .map(|i| {
                // Classic parametric heart, x in [-16, 16], y in [-17, 12].
                let t = TAU * i as f32 / CURVE_SEGMENTS as f32;
                let x = 16.0 * t.sin().powi(3);
                let y = 13.0 * t.cos()
                    - 5.0 * (2.0 * t).cos()
                    - 2.0 * (3.0 * t).cos()
                    - (4.0 * t).cos();
                let k = radius / 17.0;
                Pos2::new(center.x + x * k, center.y - (y + 2.5) * k)
            })
            .collect(),
    }
}

fn regular_polygon(
    sides: usize,
    radius: f32,
    start: f32,
    polar: &dyn Fn(f32, f32) -> Pos2,
) -> Vec<Pos2> {
    (0..sides)
        .map(|i| polar(start + TAU * i as f32 / sides as f32, radius))
        .collect()
}

/// CSS-style `hue-rotate` applied to a single colour.
pub fn hue_rotate(color: Color32, degrees: f32) -> Color32 {
    let (s, c) = degrees.to_radians().sin_cos();
    let [r, g, b] = [color.r() as f32, color.g() as f32, color.b() as f32];
    let m = [
        [
            0.213 + c * 0.787 - s * 0.213,
            0.715 - c * 0.715 - s * 0.715,
            0.072 - c * 0.072 + s * 0.928,
        ],
        [
            0.213 - c * 0.213 + s * 0.143,
            0.715 + c * 0.285 + s * 0.140,
            0.072 - c * 0.072 - s * 0.283,
        ],
        [
            0.213 - c * 0.213 - s * 0.787,
            0.715 - c * 0.715 + s * 0.715,
            0.072 + c * 0.928 + s * 0.072,
        ],
    ];
    let channel = |row: [f32; 3]| {
        (row[0] * r + row[1] * g + row[2] * b)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Color32::from_rgba_unmultiplied(channel(m[0]), channel(m[1]), channel(m[2]), color.a())
}

/// Draw the visible slide: glow, clipped photo, frame, reflection, caption.
#[allow(clippy::too_many_arguments)]
pub fn draw_slide(
    ui: &egui::Ui,
    slide: &Slide,
    view: &SlideView,
    flourish: &Flourish,
    theme: &Theme,
    image_cache: &ImageCache,
    rect: Rect,
    scale: f32,
) {
    let painter = ui.painter();
    let palette = &view.palette;
    let frame = frame_rect(rect, scale);
    let radius = frame.width() / 2.0;
    let outline = shape_outline(slide.shape(), frame.center(), radius);
    let opacity = flourish.opacity.clamp(0.0, 1.0);

    // Glow: a few widening, fading strokes.
    let glow = flourish.glow.unwrap_or(palette.glow);
    for step in 1..=4 {
        let t = step as f32 / 4.0;
        let color = Theme::with_opacity(glow, 0.35 * (1.0 - t) * opacity);
        painter.add(egui::Shape::closed_line(
            outline.clone(),
            Stroke::new(10.0 * scale * t, color),
        ));
    }

    match image_cache.get_or_load(ui.ctx(), &slide.image) {
        Some(texture) => {
            let tint = Theme::with_opacity(Color32::WHITE, opacity);
            painter.add(textured_fan(&texture, frame, &outline, tint, false));

            if let Some(progress) = flourish.mirror {
                let reflection = frame.translate(Vec2::new(0.0, frame.height() + 8.0 * scale));
                let mirrored: Vec<Pos2> = outline
                    .iter()
                    .map(|p| Pos2::new(p.x, reflection.center().y - (p.y - frame.center().y)))
                    .collect();
                let alpha = 0.25 * (progress * PI).sin() * opacity;
                painter.add(textured_fan(
                    &texture,
                    reflection,
                    &mirrored,
                    Theme::with_opacity(Color32::WHITE, alpha),
                    true,
                ));
            }
        }
        None => {
            let placeholder = Theme::with_opacity(theme.muted, 0.3 * opacity);
            painter.add(fan(frame.center(), &outline, placeholder));
            painter.text(
                frame.center(),
                egui::Align2::CENTER_CENTER,
                slide.file_name(),
                egui::FontId::proportional(theme.caption_size * scale * 0.7),
                theme.muted,
            );
        }
    }

    // Colour flourishes are painted as overlays since egui tints multiply.
    if flourish.hue_shift_deg != 0.0 {
        let shifted = hue_rotate(palette.indicator, flourish.hue_shift_deg);
        let strength = (flourish.hue_shift_deg.abs() / 30.0).min(1.0) * 0.25;
        let overlay = Theme::with_opacity(shifted, strength * opacity);
        painter.add(fan(frame.center(), &outline, overlay));
    }
    if flourish.brightness > 1.0 {
        let a = (flourish.brightness - 1.0).min(1.0) * opacity;
        let lift = Theme::with_opacity(Color32::WHITE, a);
        painter.add(fan(frame.center(), &outline, lift));
    } else if flourish.brightness < 1.0 {
        let a = (1.0 - flourish.brightness).min(1.0) * opacity;
        let dim = Theme::with_opacity(Color32::BLACK, a);
        painter.add(fan(frame.center(), &outline, dim));
    }

    painter.add(egui::Shape::closed_line(
        outline,
        Stroke::new(6.0 * scale, palette.frame_border),
    ));

    if let Some(ref caption) = slide.caption {
        draw_caption(ui, caption, view, theme, rect, frame, scale);
    }
}

fn draw_caption(
    ui: &egui::Ui,
    caption: &str,
    view: &SlideView,
    theme: &Theme,
    rect: Rect,
    frame: Rect,
    scale: f32,
) {
    let painter = ui.painter();
    let galley = painter.layout(
        caption.to_string(),
        egui::FontId::proportional(theme.caption_size * scale),
        theme.foreground,
        rect.width() * 0.7,
    );
    let padding = Vec2::new(24.0, 12.0) * scale;
    let size = galley.size() + padding * 2.0;
    let top = (frame.bottom() + 24.0 * scale).min(rect.bottom() - 100.0 * scale - size.y);
    let bg = Rect::from_min_size(Pos2::new(rect.center().x - size.x / 2.0, top), size);
    painter.rect(
        bg,
        12.0 * scale,
        view.palette.caption_background,
        Stroke::new(2.0 * scale, view.palette.caption_border),
        egui::StrokeKind::Outside,
    );
    painter.galley(bg.min + padding, galley, theme.foreground);
}

/// Prev/next buttons and one indicator dot per slide.
pub fn draw_controls(
    ui: &egui::Ui,
    layout: &ControlsLayout,
    view: &SlideView,
    theme: &Theme,
    scale: f32,
) {
    let painter = ui.painter();
    let palette = &view.palette;

    for (rect, glyph) in [(layout.prev, "\u{2039}"), (layout.next, "\u{203A}")] {
        painter.circle(
            rect.center(),
            rect.width() / 2.0,
            Theme::with_opacity(palette.nav, 0.2),
            Stroke::new(2.0 * scale, palette.nav_border),
        );
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            glyph,
            egui::FontId::proportional(rect.height() * 0.8),
            palette.nav,
        );
    }

    for (i, dot) in layout.dots.iter().enumerate() {
        let r = dot.width() / 2.0;
        if i == view.active_dot {
            let halo = Theme::with_opacity(palette.indicator_glow, 0.35);
            painter.circle_filled(dot.center(), r * 1.8, halo);
            painter.circle_filled(dot.center(), r, palette.indicator);
        } else {
            painter.circle_filled(dot.center(), r * 0.7, Theme::with_opacity(theme.muted, 0.8));
        }
    }
}

pub fn draw_title(
    ui: &egui::Ui,
    title: &str,
    view: &SlideView,
    theme: &Theme,
    rect: Rect,
    scale: f32,
) {
    let accent = view.palette.accent;
    ui.painter().text(
        Pos2::new(rect.center().x, rect.top() + 60.0 * scale),
        egui::Align2::CENTER_CENTER,
        title,
        egui::FontId::proportional(theme.title_size * scale),
        Color32::from_rgb(accent.r, accent.g, accent.b),
    );
}

/// Photo mapped onto the outline, cover-fitted to the square `frame`.
fn textured_fan(
    texture: &egui::TextureHandle,
    frame: Rect,
    outline: &[Pos2],
    tint: Color32,
    flip_v: bool,
) -> egui::Shape {
    let [w, h] = texture.size();
    let aspect = w as f32 / h.max(1) as f32;
    // Visible UV window for a centred square crop.
    let (du, dv) = if aspect >= 1.0 {
        (0.5 / aspect, 0.5)
    } else {
        (0.5, 0.5 * aspect)
    };
    let uv_of = |p: Pos2| {
        let nx = (p.x - frame.center().x) / frame.width();
        let ny = (p.y - frame.center().y) / frame.height();
        let ny = if flip_v { -ny } else { ny };
        Pos2::new(0.5 + nx * 2.0 * du, 0.5 + ny * 2.0 * dv)
    };

    let mut mesh = egui::Mesh::with_texture(texture.id());
    mesh.colored_vertex(frame.center(), tint);
    mesh.vertices[0].uv = uv_of(frame.center());
    for &p in outline {
        mesh.vertices.push(egui::epaint::Vertex {
            pos: p,
            uv: uv_of(p),
            color: tint,
        });
    }
    push_fan_indices(&mut mesh, outline.len());
    egui::Shape::mesh(mesh)
}

/// Flat-coloured fan over the outline (handles the non-convex heart and star).
fn fan(center: Pos2, outline: &[Pos2], color: Color32) -> egui::Shape {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(center, color);
    for &p in outline {
        mesh.colored_vertex(p, color);
    }
    push_fan_indices(&mut mesh, outline.len());
    egui::Shape::mesh(mesh)
}

fn push_fan_indices(mesh: &mut egui::Mesh, rim: usize) {
    let rim = rim as u32;
    for i in 0..rim {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % rim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(1920.0, 1080.0))
    }

    #[test]
    fn test_outline_vertex_counts() {
        let c = Pos2::new(100.0, 100.0);
        assert_eq!(shape_outline(SlideShape::Hexagon, c, 50.0).len(), 6);
        assert_eq!(shape_outline(SlideShape::Pentagon, c, 50.0).len(), 5);
        assert_eq!(shape_outline(SlideShape::Diamond, c, 50.0).len(), 4);
        assert_eq!(shape_outline(SlideShape::Star, c, 50.0).len(), 10);
        assert_eq!(
            shape_outline(SlideShape::Circle, c, 50.0).len(),
            CURVE_SEGMENTS
        );
    }

    #[test]
    fn test_outlines_stay_inside_frame() {
        let c = Pos2::new(300.0, 300.0);
        let bounds = Rect::from_center_size(c, Vec2::splat(200.0)).expand(0.5);
        for shape in SlideShape::ALL {
            for p in shape_outline(shape, c, 100.0) {
                assert!(bounds.contains(p), "{} point {p:?} escapes", shape.name());
            }
        }
    }

    #[test]
    fn test_outline_starts_at_top() {
        let c = Pos2::new(0.0, 0.0);
        let first = shape_outline(SlideShape::Diamond, c, 10.0)[0];
        assert!(first.x.abs() < 1e-4);
        assert!((first.y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_hue_rotate() {
        let pink = Color32::from_rgb(255, 105, 180);
        assert_eq!(hue_rotate(pink, 0.0), pink);
        // Greys have no hue to rotate.
        let grey = Color32::from_rgb(128, 128, 128);
        assert_eq!(hue_rotate(grey, 30.0), grey);
        assert_ne!(hue_rotate(pink, 30.0), pink);
    }

    #[test]
    fn test_controls_layout() {
        let theme = Theme::night();
        let layout = controls_layout(screen(), 5, 1.0, &theme);
        assert_eq!(layout.dots.len(), 5);
        assert!(layout.prev.center().x < layout.next.center().x);
        for pair in layout.dots.windows(2) {
            assert!(pair[0].right() < pair[1].left());
        }
        let middle = layout.dots[2].center().x;
        assert!((middle - 960.0).abs() < 0.5);
    }

    #[test]
    fn test_scale() {
        assert_eq!(compute_scale(screen()), 1.0);
        let half = Rect::from_min_size(Pos2::ZERO, Vec2::new(960.0, 1080.0));
        assert_eq!(compute_scale(half), 0.5);
    }
}
