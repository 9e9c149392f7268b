//! Pure math/data shared by the Genie input and rendering layers.

mod geometry;

pub use geometry::{GraphicsLayer, Point, Size};
