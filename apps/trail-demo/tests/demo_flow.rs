use genie_foundation::PointerSample;
use genie_ui_graphics::{Point, Size};
use trail_demo::{DemoApp, Screen};

#[test]
fn drag_then_wipe_navigates_to_profile() {
    let screen = Size::new(390.0, 844.0);
    let mut app = DemoApp::new(screen);
    assert_eq!(app.current_screen(), Screen::Home);

    let start = screen.center();
    app.push_sample(PointerSample::down(start));
    app.advance_frame();
    assert!(app.trail().is_active());

    let mut last = start;
    for step in 1..=10 {
        let t = step as f32 / 10.0;
        last = Point::new(start.x + t * 100.0, start.y - t * 100.0);
        app.push_sample(PointerSample::moved(last));
        app.advance_frame();
    }
    let snapshot = app.advance_frame();
    assert_eq!(snapshot.lead.position, last);

    app.push_sample(PointerSample::up(last));
    for _ in 0..60 {
        app.advance_frame();
    }
    assert!(!app.trail().is_active());

    app.navigate_to(Screen::Profile);
    assert!(app.wipe().is_running());

    let mut peak_seen = false;
    for _ in 0..120 {
        app.advance_frame();
        if app.wipe().progress() >= 1.0 {
            peak_seen = true;
        }
        if !app.wipe().is_running() {
            break;
        }
    }

    assert!(peak_seen);
    assert!(!app.wipe().is_running());
    assert_eq!(app.wipe().progress(), 0.0);
    assert_eq!(app.current_screen(), Screen::Profile);

    assert!(app.go_back());
    assert_eq!(app.current_screen(), Screen::Home);
}

#[test]
fn double_navigation_trigger_navigates_once() {
    let mut app = DemoApp::new(Size::new(390.0, 844.0));

    app.navigate_to(Screen::Profile);
    app.navigate_to(Screen::Explore);

    for _ in 0..120 {
        app.advance_frame();
        if !app.wipe().is_running() {
            break;
        }
    }

    assert_eq!(app.current_screen(), Screen::Profile);
    assert_eq!(app.nav_depth(), 2);
}
