//! Planar primitives.

mod rect;
mod size;

pub use rect::Rect;
pub use size::Size;
