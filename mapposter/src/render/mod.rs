//! CPU rasterization of poster geometry and text.
//!
//! Everything is drawn with `tiny-skia` onto a [`Canvas`]. Sizes handed to the drawing functions are in
//! typographic points and are converted to pixels with the canvas resolution, so a poster looks the same
//! at preview and print resolution.

mod canvas;
mod paint;
mod shape;
mod text;
mod view;

pub use canvas::Canvas;
pub use paint::{linear_gradient, radial_gradient, LineStyle};
pub use shape::{area_path, line_path, lines_path, point_positions};
pub use text::{draw_text, text_path, text_width};
pub use view::MapView;

/// Typographic points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;
