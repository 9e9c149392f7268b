//! Demo host wiring: runtime, input queue, controllers, and router.

use std::cell::RefCell;
use std::rc::Rc;

use genie_effects::{TrailConfig, TrailController, TrailSnapshot, WipeSpec, WipeTransition};
use genie_foundation::{PointerDispatcher, PointerSample};
use genie_runtime_std::StdRuntime;
use genie_ui_graphics::Size;

use crate::router::{Router, Screen};

/// Synthetic display frame period (~60 fps).
pub const FRAME_NANOS: u64 = 16_666_667;

/// Headless stand-in for a rendering host.
///
/// Owns the runtime and both controllers, queues raw pointer samples the way
/// a platform input system would, and advances everything one display frame
/// at a time.
pub struct DemoApp {
    runtime: StdRuntime,
    trail: TrailController,
    wipe: WipeTransition,
    router: Rc<RefCell<Router>>,
    input: PointerDispatcher,
    screen: Size,
    now_nanos: u64,
}

impl DemoApp {
    pub fn new(screen: Size) -> Self {
        let runtime = StdRuntime::new();
        let handle = runtime.runtime_handle();
        let trail = TrailController::new(handle.clone(), TrailConfig::new(8, screen.center()));
        let wipe = WipeTransition::new(handle, WipeSpec::default());
        Self {
            runtime,
            trail,
            wipe,
            router: Rc::new(RefCell::new(Router::new(Screen::Home))),
            input: PointerDispatcher::new(),
            screen,
            now_nanos: 0,
        }
    }

    /// Queues a raw pointer sample for the next frame.
    pub fn push_sample(&mut self, sample: PointerSample) {
        self.input.push(sample);
    }

    /// Runs one display frame: dispatch queued input, advance animations,
    /// drain the logic queue, and return the trail pose for rendering.
    pub fn advance_frame(&mut self) -> TrailSnapshot {
        let trail = &mut self.trail;
        self.input.drain(|sample| trail.on_pointer_sample(sample));

        self.now_nanos += FRAME_NANOS;
        self.runtime.drain_frame_callbacks(self.now_nanos);
        self.runtime.drain_ui();

        self.trail.snapshot()
    }

    /// Navigates through the wipe: the screen change lands only once the
    /// overlay fully covers the screen.
    pub fn navigate_to(&self, screen: Screen) {
        let router = Rc::clone(&self.router);
        self.wipe.trigger(move || {
            log::info!("navigating to {}", screen.title());
            router.borrow_mut().push(screen);
        });
    }

    pub fn go_back(&self) -> bool {
        self.router.borrow_mut().back()
    }

    pub fn current_screen(&self) -> Screen {
        self.router.borrow().current()
    }

    pub fn nav_depth(&self) -> usize {
        self.router.borrow().depth()
    }

    pub fn trail(&self) -> &TrailController {
        &self.trail
    }

    pub fn wipe(&self) -> &WipeTransition {
        &self.wipe
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    /// Curtain overlay height for the configured screen.
    pub fn overlay_height(&self) -> f32 {
        self.wipe.overlay_height(self.screen.height)
    }
}
