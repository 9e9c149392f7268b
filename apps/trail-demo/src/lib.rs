//! Headless demo host for the Genie interaction core.
//!
//! Wires the trail controller and wipe transition to a synthetic frame pump
//! and a minimal screen router, standing in for a real rendering host.

pub mod app;
pub mod router;

pub use app::{DemoApp, FRAME_NANOS};
pub use router::{Router, Screen};
