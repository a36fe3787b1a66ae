use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TypographyError;

/// Notation of the coordinates line.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordsFormat {
    /// `48.8566° N / 2.3522° E`
    #[default]
    Default,
    /// `48.8566, 2.3522`, signed.
    Decimal,
    /// `48.9°N / 2.4°E`
    Compact,
    /// `48°51'N / 2°21'E`, minutes rounded.
    Dms,
}

impl FromStr for CoordsFormat {
    type Err = TypographyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "decimal" => Ok(Self::Decimal),
            "compact" => Ok(Self::Compact),
            "dms" => Ok(Self::Dms),
            _ => Err(TypographyError::UnsupportedCoordsFormat(s.to_string())),
        }
    }
}

impl CoordsFormat {
    /// Formats the coordinates.
    pub fn format(&self, lat: f64, lon: f64) -> String {
        let ns = if lat >= 0.0 { 'N' } else { 'S' };
        let ew = if lon >= 0.0 { 'E' } else { 'W' };

        match self {
            CoordsFormat::Default => {
                format!("{:.4}° {ns} / {:.4}° {ew}", lat.abs(), lon.abs())
            }
            CoordsFormat::Decimal => format!("{lat:.4}, {lon:.4}"),
            CoordsFormat::Compact => format!("{:.1}°{ns} / {:.1}°{ew}", lat.abs(), lon.abs()),
            CoordsFormat::Dms => {
                let (lat_deg, lat_min) = degrees_minutes(lat);
                let (lon_deg, lon_min) = degrees_minutes(lon);
                format!("{lat_deg}°{lat_min}'{ns} / {lon_deg}°{lon_min}'{ew}")
            }
        }
    }
}

/// Whole degrees and rounded minutes of the absolute value. Minutes that round up to 60 carry into the
/// degrees.
fn degrees_minutes(value: f64) -> (u32, u32) {
    let value = value.abs();
    let degrees = value.trunc();
    let minutes = ((value - degrees) * 60.0).round();

    if minutes >= 60.0 {
        (degrees as u32 + 1, 0)
    } else {
        (degrees as u32, minutes as u32)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn paris() {
        let (lat, lon) = (48.8566, 2.3522);
        assert_eq!(CoordsFormat::Default.format(lat, lon), "48.8566° N / 2.3522° E");
        assert_eq!(CoordsFormat::Decimal.format(lat, lon), "48.8566, 2.3522");
        assert_eq!(CoordsFormat::Compact.format(lat, lon), "48.9°N / 2.4°E");
        assert_eq!(CoordsFormat::Dms.format(lat, lon), "48°51'N / 2°21'E");
    }

    #[test]
    fn southern_and_western_hemispheres() {
        let (lat, lon) = (-33.8688, -70.6693);
        assert_eq!(
            CoordsFormat::Default.format(lat, lon),
            "33.8688° S / 70.6693° W"
        );
        assert_eq!(CoordsFormat::Decimal.format(lat, lon), "-33.8688, -70.6693");
        assert_eq!(CoordsFormat::Compact.format(lat, lon), "33.9°S / 70.7°W");
        assert_eq!(CoordsFormat::Dms.format(lat, lon), "33°52'S / 70°40'W");
    }

    #[test]
    fn dms_minutes_carry() {
        assert_eq!(CoordsFormat::Dms.format(10.9999, 0.0), "11°0'N / 0°0'E");
    }

    #[test]
    fn parse_format_names() {
        assert_eq!("DMS".parse::<CoordsFormat>().unwrap(), CoordsFormat::Dms);
        assert_matches!(
            "utm".parse::<CoordsFormat>(),
            Err(TypographyError::UnsupportedCoordsFormat(name)) if name == "utm"
        );
    }
}
