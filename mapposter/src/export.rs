//! Encoding of finished posters.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder, RgbaImage};
use log::info;
use thiserror::Error;

use crate::render::Canvas;

/// Quality of JPEG output.
pub const JPEG_QUALITY: u8 = 95;

/// Export error.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Format is known, but cannot be produced by the raster canvas.
    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),
    /// Image encoder failed.
    #[error("failed to encode image")]
    Encode(#[from] image::ImageError),
    /// Output cannot be written.
    #[error("failed to write image")]
    Io(#[from] std::io::Error),
}

/// Output file format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    Png,
    /// JPEG without alpha.
    Jpeg,
    /// Vector SVG. Not produced by this crate.
    Svg,
    /// Vector PDF. Not produced by this crate.
    Pdf,
}

impl ExportFormat {
    /// Guesses the format from the extension of a path.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }

    /// Lowercase name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Encodes the canvas into the writer.
pub fn write(canvas: &Canvas, format: ExportFormat, writer: impl Write) -> Result<(), ExportError> {
    let (width, height) = (canvas.width(), canvas.height());
    match format {
        ExportFormat::Png => {
            PngEncoder::new(writer).write_image(
                &canvas.to_rgba8(),
                width,
                height,
                ColorType::Rgba8,
            )?;
        }
        ExportFormat::Jpeg => {
            let rgba = RgbaImage::from_raw(width, height, canvas.to_rgba8())
                .ok_or_else(|| ExportError::UnsupportedFormat(format.to_string()))?;
            let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
            JpegEncoder::new_with_quality(writer, JPEG_QUALITY).write_image(
                rgb.as_raw(),
                width,
                height,
                ColorType::Rgb8,
            )?;
        }
        ExportFormat::Svg | ExportFormat::Pdf => {
            return Err(ExportError::UnsupportedFormat(format.to_string()))
        }
    }

    Ok(())
}

/// Writes the canvas into a file. The file is not created for unsupported formats.
pub fn save(canvas: &Canvas, path: impl AsRef<Path>, format: ExportFormat) -> Result<(), ExportError> {
    if matches!(format, ExportFormat::Svg | ExportFormat::Pdf) {
        return Err(ExportError::UnsupportedFormat(format.to_string()));
    }

    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write(canvas, format, &mut writer)?;
    writer.flush()?;

    info!(
        "Saved {}x{} px {format} poster to {path:?}",
        canvas.width(),
        canvas.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use image::{GenericImageView, ImageFormat};
    use mapposter_types::Size;

    use super::*;
    use crate::color::Color;

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(Size::new(40, 60), 72).unwrap();
        canvas.fill(Color::rgb(10, 21, 48));
        canvas
    }

    #[test]
    fn png_round_trip() {
        let mut buffer = vec![];
        write(&canvas(), ExportFormat::Png, &mut buffer).unwrap();

        let image = image::load_from_memory_with_format(&buffer, ImageFormat::Png).unwrap();
        assert_eq!(image.dimensions(), (40, 60));
        assert_eq!(image.get_pixel(5, 5).0, [10, 21, 48, 255]);
    }

    #[test]
    fn jpeg_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.jpg");
        let format = ExportFormat::from_path(&path).unwrap();
        assert_eq!(format, ExportFormat::Jpeg);

        save(&canvas(), &path, format).unwrap();

        let image = image::open(&path).unwrap();
        assert_eq!(image.dimensions(), (40, 60));
    }

    #[test]
    fn vector_formats_are_not_produced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.svg");

        assert_matches!(
            save(&canvas(), &path, ExportFormat::Svg),
            Err(ExportError::UnsupportedFormat(name)) if name == "svg"
        );
        assert!(!path.exists());

        assert_matches!(
            write(&canvas(), ExportFormat::Pdf, vec![]),
            Err(ExportError::UnsupportedFormat(_))
        );
        assert_matches!("tiff".parse::<ExportFormat>(), Err(ExportError::UnsupportedFormat(_)));
    }
}
