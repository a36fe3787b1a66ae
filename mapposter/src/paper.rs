use std::fmt::{Display, Formatter};
use std::str::FromStr;

use mapposter_types::Size;
use serde::{Deserialize, Serialize};

use crate::typography::TypographyError;

/// Named paper preset.
///
/// Only the presets are supported. There is no interpolation between them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaperSize {
    /// 420 × 594 mm.
    A2,
    /// 297 × 420 mm.
    A3,
    /// 210 × 297 mm.
    A4,
    /// 148 × 210 mm.
    A5,
}

impl PaperSize {
    /// All presets, largest first.
    pub const ALL: [PaperSize; 4] = [Self::A2, Self::A3, Self::A4, Self::A5];

    /// Portrait size of the sheet in inches.
    pub fn inches(&self) -> Size {
        match self {
            PaperSize::A2 => Size::new(16.54, 23.39),
            PaperSize::A3 => Size::new(11.69, 16.54),
            PaperSize::A4 => Size::new(8.27, 11.69),
            PaperSize::A5 => Size::new(5.83, 8.27),
        }
    }

    /// Size of the sheet in pixels at the given resolution. Fractional pixels are dropped.
    pub fn pixel_size(&self, dpi: u32) -> Size<u32> {
        let inches = self.inches();
        let dpi = dpi as f64;
        Size::new(
            (inches.width() * dpi) as u32,
            (inches.height() * dpi) as u32,
        )
    }

    /// Typography multiplier of the preset relative to A4.
    pub fn scale_factor(&self) -> f64 {
        match self {
            PaperSize::A2 => 1.4,
            PaperSize::A3 => 1.2,
            PaperSize::A4 => 1.0,
            PaperSize::A5 => 0.7,
        }
    }

    /// Name of the preset.
    pub fn name(&self) -> &'static str {
        match self {
            PaperSize::A2 => "A2",
            PaperSize::A3 => "A3",
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
        }
    }
}

impl FromStr for PaperSize {
    type Err = TypographyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypographyError::UnknownPaperSize(s.to_string()))
    }
}

impl TryFrom<String> for PaperSize {
    type Error = TypographyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaperSize> for String {
    fn from(value: PaperSize) -> Self {
        value.name().to_string()
    }
}

impl Display for PaperSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_presets() {
        assert_eq!("A4".parse::<PaperSize>().unwrap(), PaperSize::A4);
        assert_eq!("a3".parse::<PaperSize>().unwrap(), PaperSize::A3);
        assert_matches!(
            "Letter".parse::<PaperSize>(),
            Err(TypographyError::UnknownPaperSize(name)) if name == "Letter"
        );
    }

    #[test]
    fn pixel_sizes() {
        assert_eq!(PaperSize::A4.pixel_size(150), Size::new(1240, 1753));
        assert_eq!(PaperSize::A4.pixel_size(72), Size::new(595, 841));
        assert_eq!(PaperSize::A2.pixel_size(10), Size::new(165, 233));
    }

    #[test]
    fn factors() {
        let factors: Vec<f64> = PaperSize::ALL.iter().map(|p| p.scale_factor()).collect();
        assert_eq!(factors, vec![1.4, 1.2, 1.0, 0.7]);
    }
}
