#[cfg(test)]
use std::cell::Cell;
#[cfg(test)]
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current time for deadline timers.
pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[cfg(test)]
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Recurring deadline. At most one is armed at a time; arming again replaces it.
#[derive(Debug, Clone, Default)]
pub struct IntervalTimer {
    armed: Option<Armed>,
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    interval: Duration,
    next_due: Instant,
}

/// Shortest period a timer can be armed with. A zero period would fire on every poll.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl IntervalTimer {
    pub fn start(&mut self, interval: Duration, now: Instant) {
        let interval = interval.max(MIN_PERIOD);
        self.armed = Some(Armed {
            interval,
            next_due: now + interval,
        });
    }

    pub fn stop(&mut self) {
        self.armed = None;
    }

    /// Push the next deadline a full interval past `now`, keeping the period.
    pub fn restart(&mut self, now: Instant) {
        if let Some(armed) = &mut self.armed {
            armed.next_due = now + armed.interval;
        }
    }

    pub fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.armed.map(|a| a.next_due)
    }

    /// Returns true when the deadline has passed and re-arms it. Missed
    /// periods are coalesced into a single firing.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(armed) = &mut self.armed else {
            return false;
        };
        if now < armed.next_due {
            return false;
        }
        armed.next_due += armed.interval;
        if armed.next_due <= now {
            armed.next_due = now + armed.interval;
        }
        true
    }
}
