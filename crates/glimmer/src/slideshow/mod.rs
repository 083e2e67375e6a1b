pub mod controller;
pub mod observer;
pub mod state;
pub mod timer;

pub use controller::{SlideView, SlideshowController};
pub use state::AutoAdvance;
pub use timer::SystemClock;
