use std::time::{Duration, Instant};

use eframe::egui::Color32;

use crate::theme::SlidePalette;

const MIRROR_PULSE: Duration = Duration::from_millis(1000);
const GLITCH_PHASE: Duration = Duration::from_millis(150);
const SHAPE_FADE: Duration = Duration::from_millis(400);
/// Opacity a freshly shown shape starts its fade-in from.
const SHAPE_FADE_FROM: f32 = 0.4;

/// What just happened: the slideshow moved to `to` and resolved `palette` for it.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub palette: SlidePalette,
    pub at: Instant,
}

/// Per-frame adjustments contributed by observers, applied to the current slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flourish {
    /// Extra glow around the frame (used while no sampled glow exists).
    pub glow: Option<Color32>,
    /// 0.0..=1.0 progress of the mirror shimmer, if running.
    pub mirror: Option<f32>,
    pub hue_shift_deg: f32,
    pub brightness: f32,
    pub opacity: f32,
}

impl Default for Flourish {
    fn default() -> Self {
        Self {
            glow: None,
            mirror: None,
            hue_shift_deg: 0.0,
            brightness: 1.0,
            opacity: 1.0,
        }
    }
}

/// Notified by the controller after every transition. Registered once, at
/// construction; observers never see the controller itself.
pub trait TransitionObserver {
    fn name(&self) -> &'static str;

    fn on_transition(&mut self, transition: &Transition);

    /// The current slide was re-themed without moving (a late colour sample).
    fn on_palette(&mut self, _palette: &SlidePalette) {}

    fn apply(&self, _now: Instant, _flourish: &mut Flourish) {}
}

/// One-second shimmer; also lends the slide a fallback glow while its own
/// colour is unknown.
#[derive(Default)]
pub struct MirrorPulse {
    active: Option<(Instant, Option<Color32>)>,
}

impl TransitionObserver for MirrorPulse {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn on_transition(&mut self, transition: &Transition) {
        let fallback_glow = (!transition.palette.sampled).then_some(transition.palette.glow);
        self.active = Some((transition.at, fallback_glow));
    }

    fn on_palette(&mut self, palette: &SlidePalette) {
        if !palette.sampled {
            return;
        }
        if let Some((_, glow)) = &mut self.active {
            *glow = None;
        }
    }

    fn apply(&self, now: Instant, flourish: &mut Flourish) {
        let Some((start, fallback_glow)) = self.active else {
            return;
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= MIRROR_PULSE {
            return;
        }
        flourish.mirror = Some(elapsed.as_secs_f32() / MIRROR_PULSE.as_secs_f32());
        if fallback_glow.is_some() {
            flourish.glow = fallback_glow;
        }
    }
}

/// Two quick hue-shift phases. With a sampled colour the shifts derive from
/// the red channel and its complement; otherwise a fixed ±30°.
#[derive(Default)]
pub struct GlitchFlourish {
    active: Option<(Instant, [f32; 2])>,
}

impl GlitchFlourish {
    fn shifts(palette: &SlidePalette) -> [f32; 2] {
        if palette.sampled {
            let r = palette.accent.r;
            let comp = palette.accent.complement().r;
            [(r % 30) as f32 - 15.0, (comp % 30) as f32 - 15.0]
        } else {
            [30.0, -30.0]
        }
    }
}

impl TransitionObserver for GlitchFlourish {
    fn name(&self) -> &'static str {
        "glitch"
    }

    fn on_transition(&mut self, transition: &Transition) {
        self.active = Some((transition.at, Self::shifts(&transition.palette)));
    }

    fn apply(&self, now: Instant, flourish: &mut Flourish) {
        let Some((start, [first, second])) = self.active else {
            return;
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed < GLITCH_PHASE {
            flourish.hue_shift_deg += first;
            flourish.brightness *= 1.2;
        } else if elapsed < GLITCH_PHASE * 2 {
            flourish.hue_shift_deg += second;
            flourish.brightness *= 0.9;
        }
    }
}

/// Fades the newly current shape in from 40% opacity and settles it fully
/// opaque. Every transition restarts the fade, so a slide left mid-fade is
/// never stuck translucent.
#[derive(Default)]
pub struct ShapeRefresh {
    shown_at: Option<Instant>,
}

impl TransitionObserver for ShapeRefresh {
    fn name(&self) -> &'static str {
        "shape"
    }

    fn on_transition(&mut self, transition: &Transition) {
        self.shown_at = Some(transition.at);
    }

    fn apply(&self, now: Instant, flourish: &mut Flourish) {
        let Some(shown_at) = self.shown_at else {
            return;
        };
        let elapsed = now.saturating_duration_since(shown_at);
        let t = elapsed.as_secs_f32() / SHAPE_FADE.as_secs_f32();
        flourish.opacity = if t >= 1.0 {
            1.0
        } else {
            SHAPE_FADE_FROM + (1.0 - SHAPE_FADE_FROM) * t
        };
    }
}

/// The observers every slideshow window registers.
pub fn standard_observers() -> Vec<Box<dyn TransitionObserver>> {
    vec![
        Box::new(MirrorPulse::default()),
        Box::new(GlitchFlourish::default()),
        Box::new(ShapeRefresh::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn transition(palette: SlidePalette, at: Instant) -> Transition {
        Transition {
            from: 0,
            to: 1,
            palette,
            at,
        }
    }

    fn applied(observer: &dyn TransitionObserver, now: Instant) -> Flourish {
        let mut f = Flourish::default();
        observer.apply(now, &mut f);
        f
    }

    #[test]
    fn test_glitch_phases_with_colour() {
        let t0 = Instant::now();
        let mut glitch = GlitchFlourish::default();
        // r = 200: 200 % 30 = 20 -> +5; complement 55 % 30 = 25 -> +10
        let red = SlidePalette::from_sample(Rgb::new(200, 0, 0));
        glitch.on_transition(&transition(red, t0));

        let first = applied(&glitch, t0 + Duration::from_millis(10));
        assert_eq!(first.hue_shift_deg, 5.0);
        assert!((first.brightness - 1.2).abs() < 1e-6);

        let second = applied(&glitch, t0 + Duration::from_millis(160));
        assert_eq!(second.hue_shift_deg, 10.0);
        assert!((second.brightness - 0.9).abs() < 1e-6);

        let settled = applied(&glitch, t0 + Duration::from_millis(300));
        assert_eq!(settled, Flourish::default());
    }

    #[test]
    fn test_glitch_without_colour() {
        let t0 = Instant::now();
        let mut glitch = GlitchFlourish::default();
        glitch.on_transition(&transition(SlidePalette::fallback(Rgb::HOT_PINK), t0));
        assert_eq!(applied(&glitch, t0).hue_shift_deg, 30.0);
        assert_eq!(
            applied(&glitch, t0 + Duration::from_millis(200)).hue_shift_deg,
            -30.0
        );
    }

    #[test]
    fn test_mirror_glow_only_without_sample() {
        let t0 = Instant::now();
        let mut mirror = MirrorPulse::default();
        mirror.on_transition(&transition(SlidePalette::fallback(Rgb::HOT_PINK), t0));
        let f = applied(&mirror, t0 + Duration::from_millis(500));
        assert!(f.glow.is_some());
        assert!((f.mirror.unwrap() - 0.5).abs() < 1e-3);
        let settled = applied(&mirror, t0 + Duration::from_secs(1));
        assert_eq!(settled, Flourish::default());

        let sampled = SlidePalette::from_sample(Rgb::new(1, 2, 3));
        mirror.on_transition(&transition(sampled, t0));
        let f = applied(&mirror, t0 + Duration::from_millis(500));
        assert!(f.glow.is_none());
        assert!(f.mirror.is_some());
    }

    #[test]
    fn test_mirror_drops_fallback_glow_once_sampled() {
        let t0 = Instant::now();
        let mut mirror = MirrorPulse::default();
        mirror.on_transition(&transition(SlidePalette::fallback(Rgb::HOT_PINK), t0));
        assert!(applied(&mirror, t0).glow.is_some());

        // A fallback palette arriving again keeps the glow.
        mirror.on_palette(&SlidePalette::fallback(Rgb::HOT_PINK));
        assert!(applied(&mirror, t0).glow.is_some());

        mirror.on_palette(&SlidePalette::from_sample(Rgb::new(0, 200, 0)));
        let f = applied(&mirror, t0 + Duration::from_millis(100));
        assert!(f.glow.is_none());
        assert!(f.mirror.is_some(), "the shimmer itself keeps running");
    }

    #[test]
    fn test_shape_fades_in_after_transition() {
        let t0 = Instant::now();
        let mut shape = ShapeRefresh::default();
        shape.on_transition(&transition(SlidePalette::fallback(Rgb::HOT_PINK), t0));

        let start = applied(&shape, t0).opacity;
        assert!((start - 0.4).abs() < 1e-6);
        let mid = applied(&shape, t0 + Duration::from_millis(200)).opacity;
        assert!((mid - 0.7).abs() < 1e-3);
        assert_eq!(applied(&shape, t0 + SHAPE_FADE).opacity, 1.0);
        assert_eq!(
            applied(&shape, t0 + Duration::from_secs(5)),
            Flourish::default()
        );

        // Navigating mid-fade restarts the fade for the new slide.
        let t1 = t0 + Duration::from_millis(100);
        shape.on_transition(&transition(SlidePalette::fallback(Rgb::HOT_PINK), t1));
        assert!((applied(&shape, t1).opacity - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_idle_observers_are_neutral() {
        let now = Instant::now();
        for observer in standard_observers() {
            let f = applied(observer.as_ref(), now);
            assert_eq!(f, Flourish::default(), "{}", observer.name());
        }
    }
}
