//! Raw pointer samples and the queue platform integrations feed them through.
//!
//! Hosts enqueue samples as the input system delivers them and drain the
//! queue once per frame into the gesture consumers. There is no gesture
//! disambiguation here: a single touch drives a single consumer.

use genie_ui_graphics::Point;

/// Phase of a raw touch/pointer sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// One raw touch sample as delivered by the host input system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerSample {
    pub fn new(phase: PointerPhase, position: Point) -> Self {
        Self { phase, position }
    }

    pub fn down(position: Point) -> Self {
        Self::new(PointerPhase::Down, position)
    }

    pub fn moved(position: Point) -> Self {
        Self::new(PointerPhase::Move, position)
    }

    pub fn up(position: Point) -> Self {
        Self::new(PointerPhase::Up, position)
    }
}

/// Queue for platform integrations to enqueue pointer samples and have them
/// dispatched to handlers in arrival order.
#[derive(Default)]
pub struct PointerDispatcher {
    queue: Vec<PointerSample>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn push(&mut self, sample: PointerSample) {
        self.queue.push(sample);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain<F>(&mut self, mut handler: F)
    where
        F: FnMut(PointerSample),
    {
        for sample in self.queue.drain(..) {
            handler(sample);
        }
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
