use super::*;

use genie_core::{DefaultScheduler, Runtime, RuntimeHandle};
use std::sync::Arc;

const FRAME_NANOS: u64 = 16_000_000;

fn test_runtime() -> (Runtime, RuntimeHandle) {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    (runtime, handle)
}

#[test]
fn tween_interpolates_linearly_over_time() {
    let (_runtime, handle) = test_runtime();
    let mut value = Animatable::new(0.0f32, handle.clone());

    value.animate_to(1.0, AnimationType::Tween(AnimationSpec::linear(100)));

    handle.drain_frame_callbacks(0);
    assert!((value.value() - 0.0).abs() < 1e-6);

    handle.drain_frame_callbacks(50_000_000);
    assert!((value.value() - 0.5).abs() < 1e-6);

    handle.drain_frame_callbacks(100_000_000);
    assert_eq!(value.value(), 1.0);
    assert!(!value.is_animating());
}

#[test]
fn tween_holds_start_value_through_delay() {
    let (_runtime, handle) = test_runtime();
    let mut value = Animatable::new(0.0f32, handle.clone());

    value.animate_to(
        1.0,
        AnimationType::Tween(AnimationSpec::linear(100).with_delay(100)),
    );

    handle.drain_frame_callbacks(0);
    handle.drain_frame_callbacks(50_000_000);
    assert_eq!(value.value(), 0.0);

    handle.drain_frame_callbacks(150_000_000);
    assert!((value.value() - 0.5).abs() < 1e-6);

    handle.drain_frame_callbacks(200_000_000);
    assert_eq!(value.value(), 1.0);
}

#[test]
fn retarget_mid_flight_starts_from_current_value() {
    let (_runtime, handle) = test_runtime();
    let mut value = Animatable::new(0.0f32, handle.clone());

    value.animate_to(1.0, AnimationType::Tween(AnimationSpec::linear(100)));
    handle.drain_frame_callbacks(0);
    handle.drain_frame_callbacks(50_000_000);
    assert!((value.value() - 0.5).abs() < 1e-6);

    value.animate_to(0.0, AnimationType::Tween(AnimationSpec::linear(100)));
    handle.drain_frame_callbacks(66_000_000);
    assert!((value.value() - 0.5).abs() < 1e-6);

    handle.drain_frame_callbacks(166_000_000);
    assert_eq!(value.value(), 0.0);
}

#[test]
fn snap_to_cancels_in_flight_animation() {
    let (_runtime, handle) = test_runtime();
    let mut value = Animatable::new(0.0f32, handle.clone());

    value.animate_to(1.0, AnimationType::Tween(AnimationSpec::linear(100)));
    handle.drain_frame_callbacks(0);

    value.snap_to(5.0);
    assert_eq!(value.value(), 5.0);
    assert!(!value.is_animating());

    handle.drain_frame_callbacks(50_000_000);
    assert_eq!(value.value(), 5.0);
}

#[test]
fn spring_settles_exactly_on_target() {
    let (_runtime, handle) = test_runtime();
    let mut value = Animatable::new(0.0f32, handle.clone());

    value.animate_to(1.0, AnimationType::Spring(SpringSpec::new(200.0, 15.0)));

    let mut now = 0u64;
    while value.is_animating() && now < 3_000_000_000 {
        handle.drain_frame_callbacks(now);
        now += FRAME_NANOS;
    }

    assert_eq!(value.value(), 1.0);
    assert!(!value.is_animating());
}

#[test]
fn stiff_spring_reaches_target_before_loose_spring() {
    let (_runtime, handle) = test_runtime();
    let mut stiff = Animatable::new(0.0f32, handle.clone());
    let mut loose = Animatable::new(0.0f32, handle.clone());

    stiff.animate_to(100.0, AnimationType::Spring(SpringSpec::new(80.0, 6.0)));
    loose.animate_to(100.0, AnimationType::Spring(SpringSpec::new(24.0, 20.0)));

    let epsilon = 1.0f32;
    let mut stiff_arrival = None;
    let mut loose_arrival = None;
    let mut now = 0u64;
    while (stiff_arrival.is_none() || loose_arrival.is_none()) && now < 10_000_000_000 {
        handle.drain_frame_callbacks(now);
        if stiff_arrival.is_none() && (stiff.value() - 100.0).abs() < epsilon {
            stiff_arrival = Some(now);
        }
        if loose_arrival.is_none() && (loose.value() - 100.0).abs() < epsilon {
            loose_arrival = Some(now);
        }
        now += FRAME_NANOS;
    }

    let stiff_arrival = stiff_arrival.expect("stiff spring arrives");
    let loose_arrival = loose_arrival.expect("loose spring arrives");
    assert!(stiff_arrival < loose_arrival);
}

#[test]
fn clones_share_animation_state() {
    let (_runtime, handle) = test_runtime();
    let value = Animatable::new(0.0f32, handle.clone());
    let mut alias = value.clone();

    alias.animate_to(1.0, AnimationType::Tween(AnimationSpec::linear(100)));
    handle.drain_frame_callbacks(0);
    handle.drain_frame_callbacks(100_000_000);

    assert_eq!(value.value(), 1.0);
}

#[test]
fn cubic_bezier_easing_hits_endpoints() {
    let easing = Easing::CubicBezier(0.3, 0.0, 0.3, 1.0);
    assert_eq!(easing.transform(0.0), 0.0);
    assert_eq!(easing.transform(1.0), 1.0);

    let mid = easing.transform(0.5);
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn linear_easing_is_identity() {
    for fraction in [0.0, 0.25, 0.5, 0.75, 1.0] {
        assert_eq!(Easing::Linear.transform(fraction), fraction);
    }
}
