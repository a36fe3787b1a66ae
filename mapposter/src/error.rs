//! Error types used by the crate.

use thiserror::Error;

use crate::export::ExportError;
use crate::fetch::FetchError;
use crate::font::FontError;
use crate::theme::ThemeError;
use crate::typography::TypographyError;

/// Poster generation error type.
///
/// Every variant is fatal to the render. [`PosterError::stage`] tells which step of the pipeline failed.
#[derive(Debug, Error)]
pub enum PosterError {
    /// Theme could not be found or is invalid.
    #[error(transparent)]
    Theme(#[from] ThemeError),
    /// Font bundle could not be resolved.
    #[error(transparent)]
    Font(#[from] FontError),
    /// Geographic data source failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Layout parameters are not supported.
    #[error(transparent)]
    Typography(#[from] TypographyError),
    /// Requested distance is not positive or exceeds the configured maximum.
    #[error("distance {distance} m is outside of the allowed range (0, {max}] m")]
    DistanceOutOfRange {
        /// Requested distance in meters.
        distance: f64,
        /// Configured maximum in meters.
        max: f64,
    },
    /// Edge fade band is not a number in `0..=0.5`.
    #[error("edge fade {band} is outside of the allowed range [0, 0.5]")]
    EdgeFadeOutOfRange {
        /// Requested band as a fraction of the canvas dimension.
        band: f32,
    },
    /// Location is not a valid WGS84 point.
    #[error("location ({lat}, {lon}) is not a valid WGS84 point")]
    InvalidLocation {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
    /// Canvas of the requested size cannot be created.
    #[error("cannot allocate a {width}x{height} px canvas")]
    CanvasAllocation {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Finished canvas could not be written.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Step of the poster pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Theme loading and validation.
    Theme,
    /// Font resolution.
    Fonts,
    /// Validation of paper size, distance and text parameters.
    Layout,
    /// Feature fetching.
    Fetch,
    /// Canvas creation and compositing.
    Canvas,
    /// Encoding of the finished canvas.
    Export,
}

impl PosterError {
    /// Step of the pipeline that produced the error.
    pub fn stage(&self) -> Stage {
        match self {
            PosterError::Theme(_) => Stage::Theme,
            PosterError::Font(_) => Stage::Fonts,
            PosterError::Fetch(_) => Stage::Fetch,
            PosterError::Typography(_)
            | PosterError::DistanceOutOfRange { .. }
            | PosterError::EdgeFadeOutOfRange { .. }
            | PosterError::InvalidLocation { .. } => Stage::Layout,
            PosterError::CanvasAllocation { .. } => Stage::Canvas,
            PosterError::Export(_) => Stage::Export,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_of_errors() {
        let err = PosterError::from(ThemeError::NotFound("does_not_exist".into()));
        assert_eq!(err.stage(), Stage::Theme);
        assert_eq!(err.to_string(), "theme 'does_not_exist' not found");

        let err = PosterError::from(TypographyError::UnknownPaperSize("B5".into()));
        assert_eq!(err.stage(), Stage::Layout);

        let err = PosterError::InvalidLocation {
            lat: 200.0,
            lon: 0.0,
        };
        assert_eq!(err.stage(), Stage::Layout);

        let err = PosterError::CanvasAllocation {
            width: 0,
            height: 10,
        };
        assert_eq!(err.stage(), Stage::Canvas);
    }
}
