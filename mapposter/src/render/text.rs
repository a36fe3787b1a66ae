use log::{trace, warn};
use rustybuzz::ttf_parser::{GlyphId, OutlineBuilder};
use rustybuzz::{GlyphBuffer, UnicodeBuffer};
use tiny_skia::{Path, PathBuilder, Transform};

use super::canvas::Canvas;
use super::paint::LineStyle;
use crate::font::{FontBundle, FontWeight};
use crate::render_spec::Alignment;
use crate::typography::{TextLayout, TextMeasure, TextRun};

fn shape(face: &rustybuzz::Face<'_>, text: &str) -> GlyphBuffer {
    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.guess_segment_properties();

    rustybuzz::shape(face, &[], buffer)
}

/// Advance width of the text set at `size` units per em.
pub fn text_width(face: &rustybuzz::Face<'_>, text: &str, size: f32) -> f32 {
    if text.is_empty() {
        return 0.0;
    }

    let scale = size / face.units_per_em() as f32;
    let glyph_buffer = shape(face, text);
    glyph_buffer
        .glyph_positions()
        .iter()
        .map(|position| position.x_advance as f32 * scale)
        .sum()
}

/// Outlines of the shaped text set at `size` units per em, with the start of the baseline at the origin
/// and the `y` axis pointing down. `None` if the text has no visible glyphs.
pub fn text_path(face: &rustybuzz::Face<'_>, text: &str, size: f32) -> Option<Path> {
    if text.is_empty() {
        return None;
    }

    let scale = size / face.units_per_em() as f32;
    let glyph_buffer = shape(face, text);
    let mut path_builder = GlyphPathBuilder::new(scale);
    let mut advance_x = 0.0;

    for (info, position) in glyph_buffer
        .glyph_infos()
        .iter()
        .zip(glyph_buffer.glyph_positions())
    {
        path_builder.offset_x = advance_x + position.x_offset as f32 * scale;
        path_builder.offset_y = -position.y_offset as f32 * scale;
        face.outline_glyph(GlyphId(info.glyph_id as u16), &mut path_builder);

        advance_x += position.x_advance as f32 * scale;
    }

    path_builder.builder.finish()
}

impl TextMeasure for FontBundle {
    fn text_width(&self, text: &str, weight: FontWeight, size: f32) -> f32 {
        match self.face(weight).face() {
            Some(face) => text_width(&face, text, size),
            None => {
                warn!("Cannot shape text with {weight} face of '{}'", self.family());
                0.0
            }
        }
    }
}

/// Draws the text block of a poster.
pub fn draw_text(canvas: &mut Canvas, layout: &TextLayout, fonts: &FontBundle) {
    for run in &layout.runs {
        draw_run(canvas, run, fonts);
    }

    let rule = &layout.rule;
    if rule.x_end <= rule.x_start {
        return;
    }

    let width = canvas.width() as f32;
    let y = (1.0 - rule.y) * canvas.height() as f32;
    let mut builder = PathBuilder::new();
    builder.move_to(rule.x_start * width, y);
    builder.line_to(rule.x_end * width, y);
    if let Some(path) = builder.finish() {
        canvas.stroke_path(&path, &LineStyle::new(rule.thickness).butt(), rule.color);
    }
}

fn draw_run(canvas: &mut Canvas, run: &TextRun, fonts: &FontBundle) {
    let Some(face) = fonts.face(run.weight).face() else {
        warn!(
            "Skipping '{}': cannot shape text with {} face of '{}'",
            run.text,
            run.weight,
            fonts.family()
        );
        return;
    };

    let size = canvas.pt(run.size);
    let Some(path) = text_path(&face, &run.text, size) else {
        return;
    };

    let width = text_width(&face, &run.text, size);
    let anchor = run.x * canvas.width() as f32;
    let x = match run.alignment {
        Alignment::Left => anchor,
        Alignment::Center => anchor - width / 2.0,
        Alignment::Right => anchor - width,
    };
    let y = (1.0 - run.y) * canvas.height() as f32;
    trace!("Drawing {:?} run '{}' at ({x}, {y}), {size} px", run.role, run.text);

    if let Some(path) = path.transform(Transform::from_translate(x.round(), y.round())) {
        canvas.fill_glyphs(&path, run.color);
    }
}

struct GlyphPathBuilder {
    builder: PathBuilder,
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl GlyphPathBuilder {
    fn new(scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            scale,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    fn x(&self, x: f32) -> f32 {
        self.offset_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.offset_y - y * self.scale
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.x(x), self.y(y));
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.x(x), self.y(y));
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.x(x1), self.y(y1), self.x(x), self.y(y));
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.x(x1), self.y(y1));
        let (x2, y2) = (self.x(x2), self.y(y2));
        let (x, y) = (self.x(x), self.y(y));
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use mapposter_types::{latlon, Size};

    use super::*;
    use crate::color::Color;
    use crate::location::Location;
    use crate::render_spec::RenderSpec;
    use crate::tests::{font_store, TEST_FONT};
    use crate::typography::{layout, TextRole};

    #[test]
    fn width_grows_with_text_and_size() {
        let fonts = font_store().load(TEST_FONT).unwrap();

        let short = fonts.text_width("BERLIN", FontWeight::Bold, 20.0);
        let long = fonts.text_width("BERLIN BERLIN", FontWeight::Bold, 20.0);
        let large = fonts.text_width("BERLIN", FontWeight::Bold, 40.0);

        assert!(short > 0.0);
        assert!(long > short * 2.0);
        assert!((large - short * 2.0).abs() < 0.01);
        assert_eq!(fonts.text_width("", FontWeight::Light, 20.0), 0.0);
    }

    #[test]
    fn glyphs_sit_on_the_baseline() {
        let fonts = font_store().load(TEST_FONT).unwrap();
        let face = fonts.face(FontWeight::Regular).face().unwrap();

        let path = text_path(&face, "HH", 100.0).unwrap();
        let bounds = path.bounds();
        assert!(bounds.bottom() <= 0.5);
        assert!(bounds.top() < -50.0);
        assert!(bounds.left() >= 0.0);
        assert!(bounds.right() <= text_width(&face, "HH", 100.0));

        assert!(text_path(&face, " ", 100.0).is_none());
    }

    #[test]
    fn draw_layout() {
        let fonts = font_store().load(TEST_FONT).unwrap();
        let location = Location::new(latlon!(52.52, 13.405)).with_city("Berlin");
        let spec = RenderSpec::default().with_font(TEST_FONT).with_dpi(72);
        let text = layout(&spec, &location, Color::BLACK, &fonts).unwrap();

        let paper = Size::new(595, 842);
        let mut canvas = Canvas::new(paper, 72).unwrap();
        canvas.fill(Color::WHITE);
        draw_text(&mut canvas, &text, &fonts);

        let city = text.run(TextRole::City).unwrap();
        let baseline = ((1.0 - city.y) * 842.0) as u32;
        let dark_pixels = (0..595)
            .flat_map(|x| (baseline - 20..baseline).map(move |y| (x, y)))
            .filter(|(x, y)| canvas.pixel(*x, *y) != Some(Color::WHITE))
            .count();
        assert!(dark_pixels > 100);

        // The rule is drawn at its own position.
        let rule_y = ((1.0 - text.rule.y) * 842.0) as u32;
        assert_ne!(canvas.pixel(297, rule_y), Some(Color::WHITE));
    }
}
