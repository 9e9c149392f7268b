use super::*;

use genie_core::{DefaultScheduler, Runtime, RuntimeHandle};
use std::sync::Arc;

const FRAME_NANOS: u64 = 16_000_000;

fn test_runtime() -> (Runtime, RuntimeHandle) {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    (runtime, handle)
}

fn controller_with_origin(handle: &RuntimeHandle, origin: Point) -> TrailController {
    TrailController::new(handle.clone(), TrailConfig::new(8, origin))
}

#[test]
fn chain_looseness_is_monotonic_by_index() {
    for index in 1..8 {
        let earlier = follower_move_spring(index - 1);
        let later = follower_move_spring(index);
        assert!(earlier.stiffness >= later.stiffness);
        assert!(earlier.damping <= later.damping);
    }
}

#[test]
fn stiffness_never_drops_below_floor() {
    assert_eq!(follower_move_spring(12).stiffness, STIFFNESS_FLOOR);
    assert_eq!(follower_move_spring(100).stiffness, STIFFNESS_FLOOR);
}

#[test]
fn start_snaps_lead_exactly_to_start_point() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.gesture_start(Point::new(123.5, 67.25));

    let snap = trail.snapshot();
    assert!(snap.active);
    assert_eq!(snap.lead.position, Point::new(123.5, 67.25));
}

#[test]
fn move_without_start_is_ignored() {
    let (_runtime, handle) = test_runtime();
    let origin = Point::new(50.0, 50.0);
    let mut trail = controller_with_origin(&handle, origin);

    trail.gesture_move(Point::new(200.0, 200.0));

    let snap = trail.snapshot();
    assert!(!snap.active);
    assert_eq!(snap.lead.position, origin);
    assert!(!handle.has_pending_timers());
}

#[test]
fn end_without_start_is_ignored() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.gesture_end();

    assert!(!trail.is_active());
    assert!(!handle.has_pending_timers());
}

#[test]
fn active_clears_only_after_grace_period() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.gesture_start(Point::new(10.0, 10.0));
    handle.drain_frame_callbacks(0);
    trail.gesture_end();

    let mut now = FRAME_NANOS;
    while now < 500_000_000 {
        handle.drain_frame_callbacks(now);
        assert!(trail.is_active());
        now += FRAME_NANOS;
    }

    handle.drain_frame_callbacks(500_000_000);
    assert!(!trail.is_active());
}

#[test]
fn new_session_within_grace_window_stays_active() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.gesture_start(Point::new(10.0, 10.0));
    handle.drain_frame_callbacks(0);
    trail.gesture_end();

    let mut now = FRAME_NANOS;
    while now < 300_000_000 {
        handle.drain_frame_callbacks(now);
        now += FRAME_NANOS;
    }

    // Second touch lands before the deactivation fires; the stale timer
    // must not turn the newer session off.
    trail.gesture_start(Point::new(20.0, 20.0));

    while now < 700_000_000 {
        handle.drain_frame_callbacks(now);
        now += FRAME_NANOS;
    }
    assert!(trail.is_active());
}

#[test]
fn restart_while_active_restarts_from_new_point() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.gesture_start(Point::new(10.0, 10.0));
    handle.drain_frame_callbacks(0);
    trail.gesture_start(Point::new(90.0, 90.0));

    let snap = trail.snapshot();
    assert!(snap.active);
    assert_eq!(snap.lead.position, Point::new(90.0, 90.0));
}

#[test]
fn follower_zero_arrives_before_follower_seven() {
    let (_runtime, handle) = test_runtime();
    let start = Point::new(100.0, 100.0);
    let target = Point::new(200.0, 200.0);
    let mut trail = controller_with_origin(&handle, start);

    trail.gesture_start(start);
    handle.drain_frame_callbacks(0);
    trail.gesture_move(target);

    let epsilon = 1.0;
    let mut head_arrival = None;
    let mut tail_arrival = None;
    let mut now = FRAME_NANOS;
    while (head_arrival.is_none() || tail_arrival.is_none()) && now < 20_000_000_000 {
        handle.drain_frame_callbacks(now);
        let snap = trail.snapshot();
        if head_arrival.is_none() && snap.followers[0].position.distance_to(target) < epsilon {
            head_arrival = Some(now);
        }
        if tail_arrival.is_none() && snap.followers[7].position.distance_to(target) < epsilon {
            tail_arrival = Some(now);
        }
        now += FRAME_NANOS;
    }

    let head_arrival = head_arrival.expect("follower 0 arrives");
    let tail_arrival = tail_arrival.expect("follower 7 arrives");
    assert!(head_arrival < tail_arrival);
}

#[test]
fn reveal_staggers_opacity_with_scale_and_rotation_falloff() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.gesture_start(Point::new(10.0, 10.0));
    let mut now = 0;
    while now <= 1_500_000_000 {
        handle.drain_frame_callbacks(now);
        now += FRAME_NANOS;
    }

    let snap = trail.snapshot();
    for (index, follower) in snap.followers.iter().enumerate() {
        let expected_opacity = (0.8 - index as f32 * 0.08).max(0.0);
        let expected_scale = (1.0 - index as f32 * 0.1).max(0.0);
        assert!((follower.opacity - expected_opacity).abs() < 1e-3);
        assert!((follower.scale - expected_scale).abs() < 1e-3);
        assert_eq!(follower.rotation_degrees, index as f32 * 15.0);
    }
}

#[test]
fn release_fades_earlier_followers_first() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.gesture_start(Point::new(10.0, 10.0));
    let mut now = 0;
    while now <= 1_000_000_000 {
        handle.drain_frame_callbacks(now);
        now += FRAME_NANOS;
    }

    trail.gesture_end();
    let release_time = now;
    while now <= release_time + 250_000_000 {
        handle.drain_frame_callbacks(now);
        now += FRAME_NANOS;
    }

    let snap = trail.snapshot();
    assert_eq!(snap.followers[0].opacity, 0.0);
    assert!(snap.followers[7].opacity > 0.0);
}

#[test]
fn non_finite_input_serves_last_good_pose() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.gesture_start(Point::new(10.0, 10.0));
    handle.drain_frame_callbacks(0);
    let good = trail.snapshot();

    trail.gesture_move(Point::new(f32::NAN, 20.0));
    let held = trail.snapshot();

    assert!(held.active);
    assert_eq!(held.lead.position, good.lead.position);
    assert!(held.lead.position.x.is_finite());
}

#[test]
fn pointer_samples_drive_a_full_session() {
    let (_runtime, handle) = test_runtime();
    let mut trail = controller_with_origin(&handle, Point::ZERO);

    trail.on_pointer_sample(PointerSample::down(Point::new(10.0, 10.0)));
    assert!(trail.is_active());
    assert_eq!(trail.snapshot().lead.position, Point::new(10.0, 10.0));

    handle.drain_frame_callbacks(0);
    trail.on_pointer_sample(PointerSample::moved(Point::new(40.0, 40.0)));
    assert_eq!(trail.snapshot().lead.position, Point::new(40.0, 40.0));

    trail.on_pointer_sample(PointerSample::up(Point::new(40.0, 40.0)));
    let mut now = FRAME_NANOS;
    while now <= 600_000_000 {
        handle.drain_frame_callbacks(now);
        now += FRAME_NANOS;
    }
    assert!(!trail.is_active());
}

#[test]
fn node_pose_maps_to_graphics_layer() {
    let pose = TrailNodePose {
        position: Point::new(3.0, 4.0),
        scale: 0.9,
        opacity: 0.5,
        rotation_degrees: 30.0,
    };
    let layer = pose.layer();
    assert_eq!(layer.translation_x, 3.0);
    assert_eq!(layer.translation_y, 4.0);
    assert_eq!(layer.scale, 0.9);
    assert_eq!(layer.alpha, 0.5);
    assert_eq!(layer.rotation_degrees, 30.0);
}
