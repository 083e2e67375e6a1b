use eframe::egui::Key;

/// Minimum horizontal drag, in points, for a gesture to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Navigation request produced by user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Advance(i64),
    GoTo(i64),
    First,
    Last,
    ToggleAutoAdvance,
}

/// Horizontal start/end of one touch or pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureSample {
    start_x: f32,
    end_x: f32,
}

/// Turns drags and arrow keys into [`NavCommand`]s.
#[derive(Debug, Clone)]
pub struct InputAdapter {
    threshold: f32,
    gesture: Option<GestureSample>,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}

impl InputAdapter {
    /// A threshold that is not a positive finite number falls back to
    /// [`SWIPE_THRESHOLD`].
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() && threshold > 0.0 {
            threshold
        } else {
            SWIPE_THRESHOLD
        };
        Self {
            threshold,
            gesture: None,
        }
    }

    /// Pointer or finger went down; any unfinished gesture is discarded.
    pub fn gesture_start(&mut self, x: f32) {
        self.gesture = Some(GestureSample {
            start_x: x,
            end_x: x,
        });
    }

    pub fn gesture_move(&mut self, x: f32) {
        if let Some(g) = &mut self.gesture {
            g.end_x = x;
        }
    }

    /// Pointer or finger lifted. The gesture is consumed either way.
    pub fn gesture_end(&mut self, x: f32) -> Option<NavCommand> {
        let mut sample = self.gesture.take()?;
        sample.end_x = x;
        classify_swipe(sample.end_x - sample.start_x, self.threshold)
    }

    pub fn gesture_cancel(&mut self) {
        self.gesture = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn key(&self, key: Key) -> Option<NavCommand> {
        match key {
            Key::ArrowLeft => Some(NavCommand::Advance(-1)),
            Key::ArrowRight => Some(NavCommand::Advance(1)),
            Key::Home => Some(NavCommand::First),
            Key::End => Some(NavCommand::Last),
            Key::Space => Some(NavCommand::ToggleAutoAdvance),
            _ => None,
        }
    }
}

/// Swiping left (negative dx) moves forward, swiping right moves back; drags
/// inside the deadzone are ignored.
pub fn classify_swipe(dx: f32, threshold: f32) -> Option<NavCommand> {
    if dx <= -threshold {
        Some(NavCommand::Advance(1))
    } else if dx >= threshold {
        Some(NavCommand::Advance(-1))
    } else {
        None
    }
}
