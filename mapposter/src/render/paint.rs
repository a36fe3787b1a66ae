use tiny_skia::{
    GradientStop, LineCap, LineJoin, LinearGradient, Point, RadialGradient, Shader, SpreadMode,
    Stroke, StrokeDash, Transform,
};

use crate::color::Color;

/// Stroke parameters. Lengths are in points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// Line width.
    pub width: f32,
    /// Dash and gap lengths.
    pub dash: Option<[f32; 2]>,
    /// Round line ends. Otherwise lines end flat at their end points.
    pub round_caps: bool,
}

impl LineStyle {
    /// Solid line with round caps and joins.
    pub fn new(width: f32) -> Self {
        Self {
            width,
            dash: None,
            round_caps: true,
        }
    }

    /// Dashed line with flat caps.
    pub fn dashed(self, dash: f32, gap: f32) -> Self {
        Self {
            dash: Some([dash, gap]),
            round_caps: false,
            ..self
        }
    }

    /// Same line ending flat at its end points.
    pub fn butt(self) -> Self {
        Self {
            round_caps: false,
            ..self
        }
    }

    /// Same line with the width multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            ..self.clone()
        }
    }

    pub(super) fn to_stroke(&self, pixels_per_point: f32) -> Stroke {
        let dash = self.dash.and_then(|[dash, gap]| {
            StrokeDash::new(
                vec![dash * pixels_per_point, gap * pixels_per_point],
                0.0,
            )
        });

        Stroke {
            width: self.width * pixels_per_point,
            line_cap: if self.round_caps {
                LineCap::Round
            } else {
                LineCap::Butt
            },
            line_join: LineJoin::Round,
            dash,
            ..Default::default()
        }
    }
}

/// Linear gradient between two pixel positions. Colors are clamped beyond the ends.
pub fn linear_gradient(
    start: (f32, f32),
    end: (f32, f32),
    stops: &[(f32, Color)],
) -> Option<Shader<'static>> {
    LinearGradient::new(
        Point::from_xy(start.0, start.1),
        Point::from_xy(end.0, end.1),
        gradient_stops(stops),
        SpreadMode::Pad,
        Transform::identity(),
    )
}

/// Radial gradient around the origin of `transform`, reaching the last stop at `radius` units.
pub fn radial_gradient(
    radius: f32,
    stops: &[(f32, Color)],
    transform: Transform,
) -> Option<Shader<'static>> {
    let center = Point::from_xy(0.0, 0.0);
    RadialGradient::new(
        center,
        center,
        radius,
        gradient_stops(stops),
        SpreadMode::Pad,
        transform,
    )
}

fn gradient_stops(stops: &[(f32, Color)]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|(position, color)| GradientStop::new(*position, (*color).into()))
        .collect()
}
