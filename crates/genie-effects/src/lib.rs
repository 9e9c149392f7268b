//! The Genie interaction core.
//!
//! Two controllers driven by a single touch gesture and sampled by the host
//! rendering layer every frame: [`TrailController`] animates a lead cursor
//! with a chain of spring-lagged followers, and [`WipeTransition`] drives a
//! full-screen progress value that gates a navigation action.

mod trail;
mod transition;

pub use trail::{TrailConfig, TrailController, TrailNodePose, TrailSnapshot};
pub use transition::{WipeSpec, WipeTransition};
