//! Pointer input plumbing for the Genie interaction core.

mod input;

pub use input::{PointerDispatcher, PointerPhase, PointerSample};
