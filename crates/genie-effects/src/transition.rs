//! Full-screen wipe transition gating a navigation action.
//!
//! A single progress value in `[0, 1]` driven through a fixed state machine:
//! idle, rising to peak, action fired exactly once at peak, falling back to
//! idle. Triggers while a wipe is in flight are dropped; there is no
//! cancellation. The action is posted to the runtime's logic-task queue at
//! peak rather than invoked inside the frame callback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use genie_animation::Easing;
use genie_core::{FrameCallbackRegistration, FrameClock, RuntimeHandle};

/// Timing of one wipe cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WipeSpec {
    /// Rise duration in milliseconds.
    pub rise_millis: u64,
    /// Easing applied while rising.
    pub rise_easing: Easing,
    /// Fall duration in milliseconds; the fall is linear.
    pub fall_millis: u64,
}

impl WipeSpec {
    pub fn new(rise_millis: u64, fall_millis: u64) -> Self {
        Self {
            rise_millis,
            fall_millis,
            ..Self::default()
        }
    }
}

impl Default for WipeSpec {
    fn default() -> Self {
        Self {
            rise_millis: 600,
            rise_easing: Easing::CubicBezier(0.3, 0.0, 0.3, 1.0),
            fall_millis: 80,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum WipePhase {
    Rising,
    Falling,
}

struct WipeState {
    phase: WipePhase,
    phase_start_nanos: Option<u64>,
    action: Option<Box<dyn FnOnce() + 'static>>,
    registration: Option<FrameCallbackRegistration>,
}

/// Drives the wipe overlay and fires the gated action at peak.
pub struct WipeTransition {
    state: Rc<RefCell<Option<WipeState>>>,
    progress: Rc<Cell<f32>>,
    spec: WipeSpec,
    frame_clock: FrameClock,
    runtime: RuntimeHandle,
}

impl WipeTransition {
    pub fn new(runtime: RuntimeHandle, spec: WipeSpec) -> Self {
        Self {
            state: Rc::new(RefCell::new(None)),
            progress: Rc::new(Cell::new(0.0)),
            spec,
            frame_clock: runtime.frame_clock(),
            runtime,
        }
    }

    /// Runs the wipe, then performs `action`.
    ///
    /// The action fires exactly once, only after progress has reached 1.0,
    /// and on the runtime's logic queue. If a wipe is already in flight the
    /// call is dropped.
    pub fn trigger(&self, action: impl FnOnce() + 'static) {
        if self.progress.get() != 0.0 || self.state.borrow().is_some() {
            log::debug!("wipe trigger dropped: transition already in flight");
            return;
        }

        *self.state.borrow_mut() = Some(WipeState {
            phase: WipePhase::Rising,
            phase_start_nanos: None,
            action: Some(Box::new(action)),
            registration: None,
        });

        schedule_next_frame(
            self.state.clone(),
            self.progress.clone(),
            self.spec,
            self.frame_clock.clone(),
            self.runtime.clone(),
        );
    }

    /// Current wipe progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    /// Whether a wipe cycle is in flight.
    pub fn is_running(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Curtain overlay height for a screen of the given height.
    pub fn overlay_height(&self, screen_height: f32) -> f32 {
        self.progress.get() * screen_height
    }

    pub fn spec(&self) -> WipeSpec {
        self.spec
    }
}

impl Clone for WipeTransition {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            progress: self.progress.clone(),
            spec: self.spec,
            frame_clock: self.frame_clock.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

/// Schedules the next wipe frame. Called recursively to drive the cycle
/// forward until the fall completes.
fn schedule_next_frame(
    state: Rc<RefCell<Option<WipeState>>>,
    progress: Rc<Cell<f32>>,
    spec: WipeSpec,
    frame_clock: FrameClock,
    runtime: RuntimeHandle,
) {
    let state_for_closure = state.clone();
    let clock_for_closure = frame_clock.clone();

    let registration = frame_clock.with_frame_nanos(move |frame_time_nanos| {
        let mut finished = false;
        let should_continue = {
            let mut guard = state_for_closure.borrow_mut();
            let Some(wipe) = guard.as_mut() else {
                return;
            };

            let start = *wipe.phase_start_nanos.get_or_insert(frame_time_nanos);
            let elapsed = frame_time_nanos.saturating_sub(start);

            match wipe.phase {
                WipePhase::Rising => {
                    let duration = (spec.rise_millis * 1_000_000).max(1);
                    let linear = (elapsed as f32 / duration as f32).clamp(0.0, 1.0);
                    progress.set(spec.rise_easing.transform(linear));

                    if linear >= 1.0 {
                        progress.set(1.0);
                        if let Some(action) = wipe.action.take() {
                            // Peak reached: hand the action to the logic
                            // queue, never run it inside the frame callback.
                            runtime.enqueue_ui_task(action);
                        }
                        wipe.phase = WipePhase::Falling;
                        wipe.phase_start_nanos = None;
                    }
                    true
                }
                WipePhase::Falling => {
                    let duration = (spec.fall_millis * 1_000_000).max(1);
                    let linear = (elapsed as f32 / duration as f32).clamp(0.0, 1.0);
                    progress.set(1.0 - linear);

                    if linear >= 1.0 {
                        progress.set(0.0);
                        finished = true;
                        false
                    } else {
                        true
                    }
                }
            }
        };

        if finished {
            *state_for_closure.borrow_mut() = None;
        }
        if should_continue {
            schedule_next_frame(
                state_for_closure.clone(),
                progress.clone(),
                spec,
                clock_for_closure.clone(),
                runtime.clone(),
            );
        }
    });

    if let Some(wipe) = state.borrow_mut().as_mut() {
        wipe.registration = Some(registration);
    }
}

#[cfg(test)]
#[path = "tests/transition_tests.rs"]
mod tests;
