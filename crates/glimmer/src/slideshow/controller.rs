use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::color::Rgb;
use crate::error::SampleResult;
use crate::sampler::{ColorCache, ColorSampler};
use crate::theme::{SlidePalette, Theme};

use super::observer::{Flourish, Transition, TransitionObserver};
use super::state::{AutoAdvance, SlideshowState, in_range};
use super::timer::{Clock, IntervalTimer};

/// What the renderer needs to draw the deck right now.
#[derive(Debug, Clone)]
pub struct SlideView {
    /// One flag per slide; exactly one is set.
    pub visible: Vec<bool>,
    /// Highlighted indicator dot (one dot per slide).
    pub active_dot: usize,
    pub palette: SlidePalette,
}

impl SlideView {
    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}

/// Owns the current index, the auto-advance timer and the sampled colours,
/// and re-themes the view after every move.
pub struct SlideshowController {
    state: SlideshowState,
    timer: IntervalTimer,
    clock: Box<dyn Clock>,
    theme: Theme,
    cache: ColorCache,
    observers: Vec<Box<dyn TransitionObserver>>,
    view: SlideView,
}

impl SlideshowController {
    pub fn new(
        slide_count: usize,
        start: usize,
        theme: Theme,
        clock: Box<dyn Clock>,
        observers: Vec<Box<dyn TransitionObserver>>,
    ) -> Self {
        let state = SlideshowState::new(slide_count, start);
        let palette = theme.palette_for(None);
        let mut controller = Self {
            state,
            timer: IntervalTimer::default(),
            clock,
            theme,
            cache: ColorCache::new(slide_count),
            observers,
            view: SlideView {
                visible: vec![false; slide_count],
                active_dot: state.current(),
                palette,
            },
        };
        let current = controller.state.current();
        controller.render(current);
        controller
    }

    pub fn current(&self) -> usize {
        self.state.current()
    }

    pub fn slide_count(&self) -> usize {
        self.state.slide_count()
    }

    pub fn view(&self) -> &SlideView {
        &self.view
    }

    pub fn cache(&self) -> &ColorCache {
        &self.cache
    }

    pub fn auto_advance(&self) -> AutoAdvance {
        if self.timer.is_running() {
            AutoAdvance::AutoAdvancing
        } else {
            AutoAdvance::Idle
        }
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.timer.next_due()
    }

    /// Move by `delta` slides (wrapping) and restart the auto-advance period.
    pub fn advance(&mut self, delta: i64) {
        let from = self.state.current();
        self.state.step(delta);
        trace!(from, delta, to = self.state.current(), "advance");
        self.timer.restart(self.clock.now());
        self.render(from);
    }

    /// Show slide `index`; out-of-range targets wrap instead of failing.
    pub fn go_to(&mut self, index: i64) {
        let count = self.state.slide_count();
        if !in_range(index, count) {
            trace!(index, count, "navigation target out of range, wrapping");
        }
        let from = self.state.current();
        self.state.jump(index);
        self.timer.restart(self.clock.now());
        self.render(from);
    }

    /// Start (or restart) the recurring `advance(1)`. Never leaves two timers armed.
    pub fn start_auto_advance(&mut self, interval: Duration) {
        self.timer.stop();
        self.timer.start(interval, self.clock.now());
        debug!(interval_ms = interval.as_millis() as u64, "auto-advance started");
    }

    pub fn stop_auto_advance(&mut self) {
        if self.timer.is_running() {
            debug!("auto-advance stopped");
        }
        self.timer.stop();
    }

    pub fn toggle_auto_advance(&mut self, interval: Duration) {
        match self.auto_advance() {
            AutoAdvance::Idle => self.start_auto_advance(interval),
            AutoAdvance::AutoAdvancing => self.stop_auto_advance(),
        }
    }

    /// Fire the auto-advance if it is due. Returns true if the slide changed.
    pub fn tick(&mut self) -> bool {
        if !self.timer.poll(self.clock.now()) {
            return false;
        }
        let from = self.state.current();
        self.state.step(1);
        self.render(from);
        true
    }

    /// Pull finished samples into the cache. A colour landing for the slide on
    /// screen re-themes it straight away; others wait until they are shown.
    pub fn absorb_samples(&mut self, sampler: &mut ColorSampler) {
        for (index, outcome) in sampler.pump(self.clock.now()) {
            self.record_sample(index, outcome);
        }
    }

    pub fn record_sample(&mut self, index: usize, outcome: SampleResult<Rgb>) {
        if self.cache.record(index, outcome) && index == self.state.current() {
            self.view.palette = self.palette_for(index);
            let palette = self.view.palette;
            for observer in &mut self.observers {
                observer.on_palette(&palette);
            }
        }
    }

    /// Combined observer adjustments for the current slide at this instant.
    pub fn flourish(&self) -> Flourish {
        let now = self.clock.now();
        let mut flourish = Flourish::default();
        for observer in &self.observers {
            observer.apply(now, &mut flourish);
        }
        flourish
    }

    fn palette_for(&self, index: usize) -> SlidePalette {
        self.theme.palette_for(self.cache.get(index))
    }

    /// Hide everything, show the current slide, theme it, notify observers.
    fn render(&mut self, from: usize) {
        let current = self.state.current();
        self.view.visible.iter_mut().for_each(|v| *v = false);
        self.view.visible[current] = true;
        self.view.active_dot = current;
        self.view.palette = self.palette_for(current);
        debug_assert_eq!(self.view.visible_count(), 1);

        let transition = Transition {
            from,
            to: current,
            palette: self.view.palette,
            at: self.clock.now(),
        };
        for observer in &mut self.observers {
            trace!(
                observer = observer.name(),
                from = transition.from,
                to = transition.to,
                "notify"
            );
            observer.on_transition(&transition);
        }
    }
}
