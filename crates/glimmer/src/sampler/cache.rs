use tracing::{debug, trace};

use crate::color::Rgb;
use crate::error::SampleResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Pending,
    Ready(Rgb),
    /// Sampling failed; the slide keeps the default theme for good.
    Absent,
}

/// Sampled colour per slide index. Each slot settles at most once and is
/// never invalidated afterwards.
#[derive(Debug, Clone)]
pub struct ColorCache {
    slots: Vec<Slot>,
}

impl ColorCache {
    pub fn new(slide_count: usize) -> Self {
        Self {
            slots: vec![Slot::Pending; slide_count],
        }
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        match self.slots.get(index) {
            Some(Slot::Ready(rgb)) => Some(*rgb),
            _ => None,
        }
    }

    /// True once the slide has either a colour or a recorded failure.
    pub fn is_settled(&self, index: usize) -> bool {
        !matches!(self.slots.get(index), Some(Slot::Pending) | None)
    }

    pub fn is_absent(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Absent))
    }

    /// Store the outcome of sampling slide `index`. Returns false (and keeps the
    /// existing entry) if the slot was already settled or does not exist.
    pub fn record(&mut self, index: usize, outcome: SampleResult<Rgb>) -> bool {
        if self.is_settled(index) {
            trace!(index, "slide colour already settled");
            return false;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            debug!(index, "ignoring sample for unknown slide");
            return false;
        };
        *slot = match outcome {
            Ok(rgb) => {
                debug!(index, color = %rgb, "slide colour sampled");
                Slot::Ready(rgb)
            }
            Err(e) => {
                debug!(index, error = %e, "slide colour unavailable, keeping default theme");
                Slot::Absent
            }
        };
        true
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn ready_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Ready(_)))
            .count()
    }

    pub fn settled_count(&self) -> usize {
        self.slots.iter().filter(|s| **s != Slot::Pending).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SampleError;

    #[test]
    fn test_starts_empty() {
        let cache = ColorCache::new(3);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(0), None);
        assert!(!cache.is_settled(0));
        assert_eq!(cache.settled_count(), 0);
    }

    #[test]
    fn test_record_once() {
        let mut cache = ColorCache::new(2);
        assert!(cache.record(1, Ok(Rgb::new(1, 2, 3))));
        assert!(!cache.record(1, Ok(Rgb::new(9, 9, 9))));
        assert_eq!(cache.get(1), Some(Rgb::new(1, 2, 3)));
        assert_eq!(cache.ready_count(), 1);
    }

    #[test]
    fn test_failure_is_permanent() {
        let mut cache = ColorCache::new(2);
        assert!(cache.record(0, Err(SampleError::Interrupted)));
        assert_eq!(cache.get(0), None);
        assert!(cache.is_absent(0));
        // A late success cannot overwrite a recorded failure.
        assert!(!cache.record(0, Ok(Rgb::new(5, 5, 5))));
        assert_eq!(cache.get(0), None);
        assert_eq!(cache.settled_count(), 1);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut cache = ColorCache::new(1);
        assert!(!cache.record(4, Ok(Rgb::new(1, 1, 1))));
        assert_eq!(cache.get(4), None);
        assert!(!cache.is_settled(4));
    }
}
