//! Animation system for the Genie interaction core.
//!
//! Provides time-based tweens with easing curves and physics-based spring
//! animations, driven by the runtime's one-shot frame callbacks.

mod animation;

pub use animation::{Animatable, AnimationSpec, AnimationType, Easing, Lerp, SpringScalar, SpringSpec};
