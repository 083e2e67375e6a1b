/// Whether the auto-advance timer is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoAdvance {
    Idle,
    AutoAdvancing,
}

/// Position within the deck. `current` is always `< slide_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideshowState {
    current: usize,
    slide_count: usize,
}

impl SlideshowState {
    /// `slide_count` must be at least one; `start` is wrapped into range.
    pub fn new(slide_count: usize, start: usize) -> Self {
        assert!(slide_count > 0, "a slideshow needs at least one slide");
        Self {
            current: start % slide_count,
            slide_count,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Move by `delta` slides, wrapping in both directions.
    pub fn step(&mut self, delta: i64) -> usize {
        let offset = wrap_index(delta, self.slide_count) as i64;
        self.current = wrap_index(self.current as i64 + offset, self.slide_count);
        self.current
    }

    /// Jump to `index`; out-of-range targets wrap like [`step`](Self::step).
    pub fn jump(&mut self, index: i64) -> usize {
        self.current = wrap_index(index, self.slide_count);
        self.current
    }
}

/// Euclidean modulo: the result is always in `0..count`.
pub fn wrap_index(index: i64, count: usize) -> usize {
    index.rem_euclid(count as i64) as usize
}

pub fn in_range(index: i64, count: usize) -> bool {
    index >= 0 && (index as u64) < count as u64
}
