use mapposter_types::Size;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Shader, Transform};

use super::paint::LineStyle;
use super::POINTS_PER_INCH;
use crate::color::Color;
use crate::error::PosterError;

/// Raster image a poster is painted on.
///
/// The canvas keeps its resolution so that drawing operations can take their sizes in points.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    dpi: u32,
}

impl Canvas {
    /// Creates a transparent canvas of the given pixel size.
    pub fn new(size: Size<u32>, dpi: u32) -> Result<Self, PosterError> {
        let pixmap = Pixmap::new(size.width(), size.height()).ok_or(
            PosterError::CanvasAllocation {
                width: size.width(),
                height: size.height(),
            },
        )?;

        Ok(Self { pixmap, dpi })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Size in pixels.
    pub fn size(&self) -> Size<u32> {
        Size::new(self.width(), self.height())
    }

    /// Resolution in dots per inch.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Converts a length in points to pixels.
    pub fn pt(&self, points: f32) -> f32 {
        points * self.dpi as f32 / POINTS_PER_INCH
    }

    /// Color of a pixel. `None` if the pixel is outside of the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }

        self.pixmap.pixel(x, y).map(|pixel| {
            let color = pixel.demultiply();
            Color::rgba(color.red(), color.green(), color.blue(), color.alpha())
        })
    }

    /// Underlying pixmap.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Pixels as non-premultiplied RGBA bytes, row by row.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect()
    }

    /// Fills the whole canvas, replacing its content.
    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color.into());
    }

    /// Fills a path. Overlapping sub-paths cut holes (even-odd rule).
    pub fn fill_path(&mut self, path: &Path, color: Color) {
        self.fill_path_with_rule(path, color, FillRule::EvenOdd);
    }

    /// Fills glyph outlines, which use the non-zero winding rule.
    pub fn fill_glyphs(&mut self, path: &Path, color: Color) {
        self.fill_path_with_rule(path, color, FillRule::Winding);
    }

    fn fill_path_with_rule(&mut self, path: &Path, color: Color, rule: FillRule) {
        if color.a() == 0 {
            return;
        }

        self.pixmap
            .fill_path(path, &solid(color), rule, Transform::identity(), None);
    }

    /// Strokes a path. Widths and dashes of the style are in points.
    pub fn stroke_path(&mut self, path: &Path, style: &LineStyle, color: Color) {
        if color.a() == 0 || style.width <= 0.0 {
            return;
        }

        let stroke = style.to_stroke(self.pt(1.0));
        self.pixmap
            .stroke_path(path, &solid(color), &stroke, Transform::identity(), None);
    }

    /// Fills a circle given in pixel coordinates.
    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }

        if let Some(path) = PathBuilder::from_circle(x, y, radius) {
            self.fill_path(&path, color);
        }
    }

    /// Paints a rectangle given in pixel coordinates with a shader. Pixels outside of the rectangle are not
    /// touched.
    pub fn fill_rect(&mut self, rect: Rect, shader: Shader<'_>) {
        let paint = Paint {
            shader,
            anti_alias: false,
            ..Default::default()
        };

        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.into());
    paint.anti_alias = true;
    paint
}
