//! Core runtime services for the Genie interaction core.
//!
//! The runtime owns three kinds of scheduled work: one-shot frame callbacks
//! drained by the host with an explicit frame timestamp, delayed timers that
//! fire once their delay has elapsed on the frame timeline, and a logic-task
//! queue for work that must run on the runtime thread rather than inside a
//! frame callback. Hosts drive all of it by calling
//! [`RuntimeHandle::drain_frame_callbacks`] once per display frame and
//! [`RuntimeHandle::drain_ui`] in between.

mod frame_clock;
mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{Clock, RuntimeScheduler};
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle, UiDispatcher};

pub type FrameCallbackId = u64;
pub type TimerId = u64;
