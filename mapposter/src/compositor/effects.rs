use tiny_skia::{Path, Rect, Transform};

use crate::color::Color;
use crate::render::{linear_gradient, radial_gradient, Canvas, LineStyle};
use crate::render_spec::MAX_EDGE_FADE;

const GRADIENT_STEPS: usize = 16;

/// Fades the four edges of the canvas into `color`.
///
/// Each band is `round(band × dimension)` pixels wide: the left and right bands follow the width, the top
/// and bottom ones the height. The color is opaque at the border and transparent at the inner side of
/// the band. Pixels outside of the bands are not touched. The band is clamped to `0..=0.5`; a NaN band
/// paints nothing.
pub fn edge_fade(canvas: &mut Canvas, color: Color, band: f32) {
    let band = if band.is_nan() {
        0.0
    } else {
        band.clamp(0.0, MAX_EDGE_FADE)
    };
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    let band_x = (band * width).round();
    let band_y = (band * height).round();
    let stops = [(0.0, color), (1.0, color.with_alpha(0))];

    if band_x >= 1.0 {
        fade(canvas, Rect::from_xywh(0.0, 0.0, band_x, height), (0.0, 0.0), (band_x, 0.0), &stops);
        fade(
            canvas,
            Rect::from_xywh(width - band_x, 0.0, band_x, height),
            (width, 0.0),
            (width - band_x, 0.0),
            &stops,
        );
    }

    if band_y >= 1.0 {
        fade(canvas, Rect::from_xywh(0.0, 0.0, width, band_y), (0.0, 0.0), (0.0, band_y), &stops);
        fade(
            canvas,
            Rect::from_xywh(0.0, height - band_y, width, band_y),
            (0.0, height),
            (0.0, height - band_y),
            &stops,
        );
    }
}

fn fade(
    canvas: &mut Canvas,
    rect: Option<Rect>,
    start: (f32, f32),
    end: (f32, f32),
    stops: &[(f32, Color)],
) {
    if let (Some(rect), Some(shader)) = (rect, linear_gradient(start, end, stops)) {
        canvas.fill_rect(rect, shader);
    }
}

/// Glow rising from the top of the canvas: `color` at `max_opacity` at the top edge fading quadratically
/// to nothing at `height_fraction` of the height.
pub fn horizon_glow(canvas: &mut Canvas, color: Color, height_fraction: f32, max_opacity: f32) {
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    let glow_height = (height * height_fraction).round();
    if glow_height < 1.0 {
        return;
    }

    let stops: Vec<(f32, Color)> = (0..=GRADIENT_STEPS)
        .map(|step| {
            let position = step as f32 / GRADIENT_STEPS as f32;
            let t = 1.0 - position;
            (position, color.with_opacity(max_opacity * t * t))
        })
        .collect();

    fade(
        canvas,
        Rect::from_xywh(0.0, 0.0, width, glow_height),
        (0.0, 0.0),
        (0.0, glow_height),
        &stops,
    );
}

/// Darkens the canvas toward its corners.
///
/// With `d` the distance from the center normalized to 1 at the middle of each edge, the opacity of
/// `color` is `min(d² × intensity, 0.6) / 2`.
pub fn vignette(canvas: &mut Canvas, color: Color, intensity: f32) {
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    let max_distance = std::f32::consts::SQRT_2;

    let stops: Vec<(f32, Color)> = (0..=GRADIENT_STEPS)
        .map(|step| {
            let position = step as f32 / GRADIENT_STEPS as f32;
            let d = position * max_distance;
            let opacity = (d * d * intensity).clamp(0.0, 0.6) * 0.5;
            (position, color.with_opacity(opacity))
        })
        .collect();

    let (cx, cy) = (width / 2.0, height / 2.0);
    let transform = Transform::from_row(cx, 0.0, 0.0, cy, cx, cy);
    if let (Some(rect), Some(shader)) = (
        Rect::from_xywh(0.0, 0.0, width, height),
        radial_gradient(max_distance, &stops, transform),
    ) {
        canvas.fill_rect(rect, shader);
    }
}

/// One halo stroke of a glowing line.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlowPass {
    /// Stroke width as a multiple of the base line width.
    pub width: f32,
    /// Stroke opacity.
    pub opacity: f32,
}

/// Shape of the halo around a glowing line.
///
/// Halo `i` of `n` (1 is the innermost) is `1 + (i - 1)^falloff × spread` times as wide as the line. With
/// `t = (n - i) / n`, its opacity is `intensity × exp(-decay × (1 - t)²) × strength`, so the outer halos
/// are wide and faint.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlowProfile {
    /// Number of halo strokes.
    pub layers: u32,
    /// Overall opacity multiplier.
    pub intensity: f32,
    /// Exponent of the width growth.
    pub falloff: f32,
    /// Width growth per halo.
    pub spread: f32,
    /// How fast the opacity drops toward the outer halos.
    pub decay: f32,
    /// Opacity of the innermost halo at full intensity.
    pub strength: f32,
}

impl GlowProfile {
    /// Halo strokes from the widest to the narrowest.
    pub fn passes(&self) -> Vec<GlowPass> {
        let n = self.layers;
        (1..=n)
            .rev()
            .map(|i| {
                let t = (n - i) as f32 / n as f32;
                GlowPass {
                    width: 1.0 + ((i - 1) as f32).powf(self.falloff) * self.spread,
                    opacity: self.intensity
                        * (-self.decay * (1.0 - t) * (1.0 - t)).exp()
                        * self.strength,
                }
            })
            .collect()
    }

    /// Strokes the halos of a line `width` points wide.
    pub fn paint(&self, canvas: &mut Canvas, path: &Path, width: f32, color: Color) {
        for pass in self.passes() {
            canvas.stroke_path(
                path,
                &LineStyle::new(width * pass.width),
                color.with_opacity(pass.opacity),
            );
        }
    }
}

/// Stroke drawn over the halos of a glowing line.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Highlight {
    /// Width as a multiple of the base line width.
    pub width: f32,
    /// Stroke opacity.
    pub opacity: f32,
    /// Stroke color.
    pub color: Color,
}

/// Paints a glowing line: the halos of the profile followed by the highlights.
pub fn paint_glow(
    canvas: &mut Canvas,
    path: &Path,
    width: f32,
    color: Color,
    profile: &GlowProfile,
    highlights: &[Highlight],
) {
    profile.paint(canvas, path, width, color);
    for highlight in highlights {
        canvas.stroke_path(
            path,
            &LineStyle::new(width * highlight.width),
            highlight.color.with_opacity(highlight.opacity),
        );
    }
}

/// Soft glowing dot. `area` is the area of the dot in square points, as in scatter plots.
pub fn glow_dot(canvas: &mut Canvas, x: f32, y: f32, area: f32, color: Color, opacity: f32) {
    let radius = canvas.pt(area.max(0.0).sqrt()) / 2.0;
    canvas.fill_circle(x, y, radius, color.with_opacity(opacity));
}

#[cfg(test)]
mod tests {
    use mapposter_types::Size;

    use super::*;

    fn white_canvas(width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(Size::new(width, height), 72).unwrap();
        canvas.fill(Color::WHITE);
        canvas
    }

    #[test]
    fn edge_fade_leaves_center_untouched() {
        let mut canvas = white_canvas(100, 200);
        edge_fade(&mut canvas, Color::BLACK, 0.1);

        for x in 10..90 {
            for y in 20..180 {
                assert_eq!(canvas.pixel(x, y), Some(Color::WHITE), "({x}, {y})");
            }
        }

        let border = canvas.pixel(50, 0).unwrap();
        assert!(border.r() < 40, "{border:?}");
        let left = canvas.pixel(0, 100).unwrap();
        assert!(left.r() < 40, "{left:?}");
        let inner = canvas.pixel(50, 19).unwrap();
        assert!(inner.r() > 200, "{inner:?}");
    }

    #[test]
    fn zero_band_does_nothing() {
        let mut canvas = white_canvas(50, 50);
        edge_fade(&mut canvas, Color::BLACK, 0.0);
        assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn band_is_clamped() {
        for band in [-0.2, f32::NAN] {
            let mut canvas = white_canvas(50, 50);
            edge_fade(&mut canvas, Color::BLACK, band);
            assert_eq!(canvas.pixel(0, 0), Some(Color::WHITE), "{band}");
        }

        let mut wide = white_canvas(50, 50);
        edge_fade(&mut wide, Color::BLACK, 3.0);
        let mut half = white_canvas(50, 50);
        edge_fade(&mut half, Color::BLACK, MAX_EDGE_FADE);
        assert_eq!(wide.to_rgba8(), half.to_rgba8());
    }

    #[test]
    fn horizon_glow_covers_the_top() {
        let mut canvas = Canvas::new(Size::new(50, 100), 72).unwrap();
        canvas.fill(Color::BLACK);
        horizon_glow(&mut canvas, Color::WHITE, 0.3, 0.25);

        assert!(canvas.pixel(25, 0).unwrap().r() > 50);
        assert!(canvas.pixel(25, 0).unwrap().r() > canvas.pixel(25, 20).unwrap().r());
        assert_eq!(canvas.pixel(25, 50), Some(Color::BLACK));
    }

    #[test]
    fn vignette_darkens_corners() {
        let mut canvas = white_canvas(100, 100);
        vignette(&mut canvas, Color::BLACK, 0.3);

        let center = canvas.pixel(50, 50).unwrap();
        let corner = canvas.pixel(0, 0).unwrap();
        assert!(center.r() > 250, "{center:?}");
        assert!(corner.r() < center.r());
    }

    #[test]
    fn glow_passes() {
        let profile = GlowProfile {
            layers: 8,
            intensity: 0.9,
            falloff: 1.2,
            spread: 0.5,
            decay: 3.0,
            strength: 0.4,
        };

        let passes = profile.passes();
        assert_eq!(passes.len(), 8);
        assert!(passes.windows(2).all(|w| w[0].width > w[1].width));
        assert!(passes.windows(2).all(|w| w[0].opacity < w[1].opacity));
        assert_eq!(passes[7].width, 1.0);
        assert!(passes.iter().all(|pass| pass.opacity <= 0.9 * 0.4));
    }
}
