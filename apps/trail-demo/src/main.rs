use anyhow::Result;
use genie_foundation::PointerSample;
use genie_ui_graphics::{Point, Size};
use trail_demo::{DemoApp, Screen};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Genie Trail Demo ===");
    println!("Headless run of the interaction core:");
    println!("  - drag gesture driving the lead cursor and 8 spring followers");
    println!("  - staggered reveal, pulsing stretch, reverse-stagger fade-out");
    println!("  - wipe transition gating navigation to the profile screen");
    println!();

    let screen = Size::new(390.0, 844.0);
    let mut app = DemoApp::new(screen);

    // Synthetic drag: press at the centre, arc toward the upper right,
    // release. One move sample per frame, as a touch screen would deliver.
    let start = screen.center();
    app.push_sample(PointerSample::down(start));
    app.advance_frame();

    let mut last = start;
    for step in 1..=30 {
        let t = step as f32 / 30.0;
        last = Point::new(
            start.x + t * 140.0,
            start.y - t * 220.0 + (t * 6.0).sin() * 24.0,
        );
        app.push_sample(PointerSample::moved(last));
        let snapshot = app.advance_frame();
        if step % 10 == 0 {
            let tail = snapshot.followers.last().expect("followers configured");
            log::info!(
                "lead ({:.1}, {:.1})  stretch {:.2}  tail ({:.1}, {:.1})",
                snapshot.lead.position.x,
                snapshot.lead.position.y,
                snapshot.lead.scale,
                tail.position.x,
                tail.position.y,
            );
        }
    }

    app.push_sample(PointerSample::up(last));
    for _ in 0..60 {
        app.advance_frame();
    }
    log::info!("trail active after release window: {}", app.trail().is_active());

    // Wipe-gated navigation, as the home screen's profile button does.
    app.navigate_to(Screen::Profile);
    let mut peak_height = 0.0f32;
    for _ in 0..120 {
        app.advance_frame();
        peak_height = peak_height.max(app.overlay_height());
        if !app.wipe().is_running() {
            break;
        }
    }
    log::info!("wipe covered {peak_height:.0}px at peak");

    println!();
    println!("final screen: {}", app.current_screen().title());
    Ok(())
}
