//! Background colour sampling for slide photos.
//!
//! Decoding and averaging happen on the rayon pool. Each request hands back a
//! [`SampleFuture`]; the UI thread drains finished futures once per frame via
//! [`ColorSampler::pump`], so cache writes happen one at a time on that thread.

pub mod average;
pub mod cache;

use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures::channel::oneshot;
use tracing::{debug, trace};

use crate::color::Rgb;
use crate::deck::Slide;
use crate::error::{SampleError, SampleResult};

pub use cache::ColorCache;

/// Pending average colour of one photo.
pub struct SampleFuture {
    rx: oneshot::Receiver<SampleResult<Rgb>>,
}

impl SampleFuture {
    /// Non-blocking check; `None` while the worker is still busy.
    pub fn try_take(&mut self) -> Option<SampleResult<Rgb>> {
        match self.rx.try_recv() {
            Ok(Some(outcome)) => Some(outcome),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(SampleError::Interrupted)),
        }
    }
}

impl Future for SampleFuture {
    type Output = SampleResult<Rgb>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.unwrap_or(Err(SampleError::Interrupted)))
    }
}

/// Start sampling `path` on the worker pool.
pub fn sample(path: PathBuf) -> SampleFuture {
    let (tx, rx) = oneshot::channel();
    rayon::spawn(move || {
        let outcome = average::sample_file(&path);
        // The receiver may have been dropped along with the app; nothing to do then.
        let _ = tx.send(outcome);
    });
    SampleFuture { rx }
}

/// Stagger offsets are capped so a deadline always fits in an [`Instant`].
const MAX_STAGGER_OFFSET: Duration = Duration::from_secs(24 * 60 * 60);

struct ScheduledSample {
    index: usize,
    path: PathBuf,
    due: Instant,
}

/// Staggers sampling requests across slides. Outcomes are handed back to the
/// caller, which records them in a [`ColorCache`].
pub struct ColorSampler {
    queue: VecDeque<ScheduledSample>,
    in_flight: Vec<(usize, SampleFuture)>,
}

impl ColorSampler {
    /// Slide `i` becomes eligible at `start + i * stagger`.
    pub fn schedule(slides: &[Slide], start: Instant, stagger: Duration) -> Self {
        let queue = slides
            .iter()
            .map(|slide| {
                let steps = u32::try_from(slide.index).unwrap_or(u32::MAX);
                let offset = stagger.saturating_mul(steps).min(MAX_STAGGER_OFFSET);
                ScheduledSample {
                    index: slide.index,
                    path: slide.image.clone(),
                    due: start + offset,
                }
            })
            .collect();
        Self {
            queue,
            in_flight: Vec::new(),
        }
    }

    /// Launch every request that is due and collect every finished one, in
    /// the order they are found complete.
    pub fn pump(&mut self, now: Instant) -> Vec<(usize, SampleResult<Rgb>)> {
        while self.queue.front().is_some_and(|s| s.due <= now) {
            let Some(next) = self.queue.pop_front() else {
                break;
            };
            trace!(index = next.index, path = %next.path.display(), "sampling slide colour");
            self.in_flight.push((next.index, sample(next.path)));
        }

        let mut finished = Vec::new();
        self.in_flight.retain_mut(|(index, fut)| match fut.try_take() {
            Some(outcome) => {
                finished.push((*index, outcome));
                false
            }
            None => true,
        });
        finished
    }

    /// Block until every request, including ones not yet due, has finished.
    pub fn finish(mut self) -> Vec<(usize, SampleResult<Rgb>)> {
        for next in self.queue.drain(..) {
            self.in_flight.push((next.index, sample(next.path)));
        }
        let finished: Vec<_> = self
            .in_flight
            .drain(..)
            .map(|(index, fut)| (index, futures::executor::block_on(fut)))
            .collect();
        debug!(count = finished.len(), "colour sampling finished");
        finished
    }

    /// When the next queued request becomes due, if any are left.
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.front().map(|s| s.due)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.in_flight.is_empty()
    }
}
