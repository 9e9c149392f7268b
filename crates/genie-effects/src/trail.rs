//! Fluid cursor-trail gesture controller.
//!
//! One lead cursor plus a configurable chain of followers. The lead tracks
//! the raw pointer with no interpolation; each follower chases it through a
//! delayed spring whose stiffness drops and damping grows with chain index,
//! so the tail lags further and moves more loosely than the head. A stretch
//! value on the lead pulses on every move sample for a squash-and-stretch
//! feel.
//!
//! Delayed follower updates are never cancelled. A later move supersedes an
//! earlier one only when its timer fires, so per-follower targets land in
//! arrival order and the last write wins.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use genie_animation::{Animatable, AnimationSpec, AnimationType, SpringSpec};
use genie_core::RuntimeHandle;
use genie_foundation::{PointerPhase, PointerSample};
use genie_ui_graphics::{GraphicsLayer, Point};

const SCALE_IN_SPRING: SpringSpec = SpringSpec::new(200.0, 15.0);
const STRETCH_RISE_SPRING: SpringSpec = SpringSpec::new(300.0, 12.0);
const STRETCH_PULSE_SPRING: SpringSpec = SpringSpec::new(400.0, 8.0);
const STRETCH_RELEASE_SPRING: SpringSpec = SpringSpec::new(200.0, 15.0);

const STRETCH_PEAK: f32 = 1.3;
const PULSE_RETURN_DELAY_MILLIS: u64 = 100;
const DEACTIVATE_DELAY_MILLIS: u64 = 500;

const MOVE_DELAY_STEP_MILLIS: u64 = 50;
const BASE_STIFFNESS: f32 = 80.0;
const STIFFNESS_STEP: f32 = 8.0;
const STIFFNESS_FLOOR: f32 = 10.0;
const BASE_DAMPING: f32 = 6.0;
const DAMPING_STEP: f32 = 2.0;

const OPACITY_BASE: f32 = 0.8;
const OPACITY_STEP: f32 = 0.08;
const FADE_IN_BASE_MILLIS: u64 = 100;
const FADE_IN_STEP_MILLIS: u64 = 50;
const FADE_OUT_BASE_MILLIS: u64 = 200;
const FADE_OUT_STEP_MILLIS: u64 = 30;

const SCALE_FALLOFF_STEP: f32 = 0.1;
const ROTATION_STEP_DEGREES: f32 = 15.0;

/// Trail construction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailConfig {
    /// Number of followers in the chain.
    pub follower_count: usize,
    /// Rest position for the lead and followers, typically the screen centre.
    pub origin: Point,
}

impl TrailConfig {
    pub fn new(follower_count: usize, origin: Point) -> Self {
        Self {
            follower_count,
            origin,
        }
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            follower_count: 8,
            origin: Point::ZERO,
        }
    }
}

/// Renderable pose of one trail node, derived per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailNodePose {
    pub position: Point,
    pub scale: f32,
    pub opacity: f32,
    pub rotation_degrees: f32,
}

impl TrailNodePose {
    /// Transform snapshot for a renderer that consumes graphics layers.
    pub fn layer(&self) -> GraphicsLayer {
        GraphicsLayer {
            alpha: self.opacity,
            scale: self.scale,
            rotation_degrees: self.rotation_degrees,
            translation_x: self.position.x,
            translation_y: self.position.y,
        }
    }

    fn is_finite(&self) -> bool {
        self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.scale.is_finite()
            && self.opacity.is_finite()
    }
}

/// Immutable per-frame read of the whole trail.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailSnapshot {
    pub active: bool,
    pub lead: TrailNodePose,
    pub followers: Vec<TrailNodePose>,
}

impl TrailSnapshot {
    fn is_finite(&self) -> bool {
        self.lead.is_finite() && self.followers.iter().all(TrailNodePose::is_finite)
    }
}

struct Follower {
    x: Animatable<f32>,
    y: Animatable<f32>,
    scale: Animatable<f32>,
    opacity: Animatable<f32>,
}

/// Owns the animated state for the lead cursor and its follower chain.
///
/// The host feeds raw pointer samples in via [`TrailController::on_pointer_sample`]
/// (or the three gesture operations directly) and reads a [`TrailSnapshot`]
/// once per frame. Nodes are allocated once and reused across gesture
/// sessions.
pub struct TrailController {
    runtime: RuntimeHandle,
    lead: Point,
    stretch: Animatable<f32>,
    followers: Vec<Follower>,
    active: Rc<Cell<bool>>,
    generation: Rc<Cell<u64>>,
    last_good: RefCell<TrailSnapshot>,
}

fn follower_move_spring(index: usize) -> SpringSpec {
    let stiffness = (BASE_STIFFNESS - index as f32 * STIFFNESS_STEP).max(STIFFNESS_FLOOR);
    let damping = BASE_DAMPING + index as f32 * DAMPING_STEP;
    SpringSpec::new(stiffness, damping)
}

impl TrailController {
    pub fn new(runtime: RuntimeHandle, config: TrailConfig) -> Self {
        let followers = (0..config.follower_count)
            .map(|_| Follower {
                x: Animatable::new(config.origin.x, runtime.clone()),
                y: Animatable::new(config.origin.y, runtime.clone()),
                scale: Animatable::new(0.0, runtime.clone()),
                opacity: Animatable::new(0.0, runtime.clone()),
            })
            .collect();

        let rest = TrailSnapshot {
            active: false,
            lead: TrailNodePose {
                position: config.origin,
                scale: 0.0,
                opacity: 1.0,
                rotation_degrees: 0.0,
            },
            followers: (0..config.follower_count)
                .map(|index| TrailNodePose {
                    position: config.origin,
                    scale: 0.0,
                    opacity: 0.0,
                    rotation_degrees: index as f32 * ROTATION_STEP_DEGREES,
                })
                .collect(),
        };

        Self {
            stretch: Animatable::new(0.0, runtime.clone()),
            runtime,
            lead: config.origin,
            followers,
            active: Rc::new(Cell::new(false)),
            generation: Rc::new(Cell::new(0)),
            last_good: RefCell::new(rest),
        }
    }

    /// Starts a gesture session at `point`.
    ///
    /// The lead snaps to the start point with no interpolation. Followers
    /// scale up and fade in with a stagger that reveals the tail last. A
    /// start while a session is already active restarts it from the new
    /// point.
    pub fn gesture_start(&mut self, point: Point) {
        self.generation.set(self.generation.get() + 1);
        self.active.set(true);
        self.lead = point;

        for (index, follower) in self.followers.iter_mut().enumerate() {
            follower
                .scale
                .animate_to(1.0, AnimationType::Spring(SCALE_IN_SPRING));
            let opacity_target = (OPACITY_BASE - index as f32 * OPACITY_STEP).max(0.0);
            let fade_in = FADE_IN_BASE_MILLIS + index as u64 * FADE_IN_STEP_MILLIS;
            follower.opacity.animate_to(
                opacity_target,
                AnimationType::Tween(AnimationSpec::linear(fade_in)),
            );
        }

        self.stretch
            .animate_to(1.0, AnimationType::Spring(STRETCH_RISE_SPRING));
    }

    /// Feeds one move sample into the active session.
    ///
    /// The lead snaps to `point`; each follower gets a delayed spring toward
    /// it, the delay and spring looseness growing with chain index. Moves
    /// without an active session are ignored.
    pub fn gesture_move(&mut self, point: Point) {
        if !self.active.get() {
            log::trace!("pointer move ignored: no active trail session");
            return;
        }
        self.lead = point;

        for (index, follower) in self.followers.iter().enumerate() {
            let delay = (index as u64 + 1) * MOVE_DELAY_STEP_MILLIS;
            let spring = follower_move_spring(index);
            let mut x = follower.x.clone();
            let mut y = follower.y.clone();
            let _ = self.runtime.register_delayed(delay, move || {
                x.animate_to(point.x, AnimationType::Spring(spring));
                y.animate_to(point.y, AnimationType::Spring(spring));
            });
        }

        self.stretch
            .animate_to(STRETCH_PEAK, AnimationType::Spring(STRETCH_PULSE_SPRING));
        let mut stretch = self.stretch.clone();
        let _ = self
            .runtime
            .register_delayed(PULSE_RETURN_DELAY_MILLIS, move || {
                stretch.animate_to(1.0, AnimationType::Spring(STRETCH_RISE_SPRING));
            });
    }

    /// Ends the active session.
    ///
    /// Followers shrink and fade out, earlier ones first; the session stays
    /// active for a grace period so the fade-out remains visible, then
    /// deactivates unless a newer session has started in the meantime.
    pub fn gesture_end(&mut self) {
        if !self.active.get() {
            log::trace!("pointer up ignored: no active trail session");
            return;
        }

        for (index, follower) in self.followers.iter_mut().enumerate() {
            let fade_out = FADE_OUT_BASE_MILLIS + index as u64 * FADE_OUT_STEP_MILLIS;
            let spec = AnimationType::Tween(AnimationSpec::linear(fade_out));
            follower.scale.animate_to(0.0, spec);
            follower.opacity.animate_to(0.0, spec);
        }

        self.stretch
            .animate_to(0.0, AnimationType::Spring(STRETCH_RELEASE_SPRING));

        let generation = Rc::clone(&self.generation);
        let active = Rc::clone(&self.active);
        let ended = generation.get();
        let _ = self
            .runtime
            .register_delayed(DEACTIVATE_DELAY_MILLIS, move || {
                // A newer session owns the flag now; leave it alone.
                if generation.get() == ended {
                    active.set(false);
                }
            });
    }

    /// Adapter from raw pointer samples to the three gesture operations.
    pub fn on_pointer_sample(&mut self, sample: PointerSample) {
        match sample.phase {
            PointerPhase::Down => self.gesture_start(sample.position),
            PointerPhase::Move => self.gesture_move(sample.position),
            PointerPhase::Up => self.gesture_end(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    /// Per-frame read for the renderer.
    ///
    /// Follower scale carries a static falloff by chain index on top of the
    /// animated value, and each follower gets a fixed rotation per index.
    /// Non-finite values never reach the renderer: a faulted pose is
    /// replaced by the last finite snapshot.
    pub fn snapshot(&self) -> TrailSnapshot {
        let lead = TrailNodePose {
            position: self.lead,
            scale: self.stretch.value(),
            opacity: 1.0,
            rotation_degrees: 0.0,
        };

        let followers = self
            .followers
            .iter()
            .enumerate()
            .map(|(index, follower)| {
                let falloff = (1.0 - index as f32 * SCALE_FALLOFF_STEP).max(0.0);
                TrailNodePose {
                    position: Point::new(follower.x.value(), follower.y.value()),
                    scale: follower.scale.value() * falloff,
                    opacity: follower.opacity.value(),
                    rotation_degrees: index as f32 * ROTATION_STEP_DEGREES,
                }
            })
            .collect();

        let snapshot = TrailSnapshot {
            active: self.active.get(),
            lead,
            followers,
        };

        if snapshot.is_finite() {
            *self.last_good.borrow_mut() = snapshot.clone();
            snapshot
        } else {
            log::warn!("non-finite trail pose; serving last known good snapshot");
            let mut held = self.last_good.borrow().clone();
            held.active = self.active.get();
            held
        }
    }
}

#[cfg(test)]
#[path = "tests/trail_tests.rs"]
mod tests;
