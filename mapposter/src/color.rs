use serde::{Deserialize, Serialize};

/// Color representation.
///
/// Theme files and personalization use the string form. Accepted notations are `#RGB`, `#RRGGBB`,
/// `#RRGGBBAA`, `rgb(r, g, b)` and `rgba(r, g, b, a)` where `a` is in `0..=1`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Error returned when a string is not a color in any of the supported notations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color value '{0}'")]
pub struct ColorParseError(pub String);

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ColorParseError(value))
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_hex()
    }
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ColorParseError(s.to_string()))
    }
}

impl Color {
    /// Transparent color: `#00000000`
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// White color: `#FFFFFFFF`
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Black color: `#000000FF`
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Constructs an opaque color from its RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Converts the color into u8 array (RGBA).
    pub fn to_u8_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts the color into HEX8 string: `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Parses a color in any of the supported notations.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('#') {
            return Self::try_from_hex(value);
        }

        let lower = value.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            let [r, g, b, a] = parts[..] else {
                return None;
            };
            let alpha: f32 = a.parse().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }

            return Some(Self::rgba(
                r.parse().ok()?,
                g.parse().ok()?,
                b.parse().ok()?,
                (alpha * 255.0).round() as u8,
            ));
        }

        if let Some(args) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            let [r, g, b] = parts[..] else {
                return None;
            };

            return Some(Self::rgb(
                r.parse().ok()?,
                g.parse().ok()?,
                b.parse().ok()?,
            ));
        }

        None
    }

    /// Parses a color from the hex string. Hex string can be HEX3 (`#RGB`), HEX6 (`#RRGGBB`) or HEX8
    /// (`#RRGGBBAA`).
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        let digits = hex_string.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();

        match digits.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Some(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Parses a color from the hex string. Hex string can be either HEX6 (`#RRGGBB`) or HEX8 (`#RRGGBBAA`).
    ///
    /// # Panics
    ///
    /// Panics if the parsing fails.
    pub const fn from_hex(hex_string: &'static str) -> Self {
        let bytes = hex_string.as_bytes();
        if bytes.len() != 7 && bytes.len() != 9 || bytes[0] != b'#' {
            panic!("Invalid color hex string");
        }

        let r = decode_byte(bytes[1], bytes[2]);
        let g = decode_byte(bytes[3], bytes[4]);
        let b = decode_byte(bytes[5], bytes[6]);
        let a = if bytes.len() == 9 {
            decode_byte(bytes[7], bytes[8])
        } else {
            255
        };

        Self { r, g, b, a }
    }

    /// Returns a new color instance, copied from the base one but with the given alpha channel.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Returns a copy of the color with its alpha multiplied by `opacity` (clamped to `0..=1`).
    pub fn with_opacity(&self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        self.with_alpha((self.a as f32 * opacity).round() as u8)
    }

    /// Red component of the color in RGBA space.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// Green component of the color in RGBA space.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// Blue component of the color in RGBA space.
    pub fn b(&self) -> u8 {
        self.b
    }

    /// Opacity component of the color.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Alpha blends `self` color with the given foreground one using foreground color alpha.
    pub fn blend(&self, fore: Color) -> Color {
        let a = fore.a as f32 / 255.0;
        let mix = |back: u8, fore: u8| (back as f32 * (1.0 - a) + fore as f32 * a).round() as u8;

        Color {
            r: mix(self.r, fore.r),
            g: mix(self.g, fore.g),
            b: mix(self.b, fore.b),
            a: self.a,
        }
    }

    /// Composites `self` at the given opacity over `back`.
    pub fn over(&self, back: Color, opacity: f32) -> Color {
        back.blend(self.with_opacity(opacity))
    }

    /// HSL lightness of the color in `0..=1`.
    pub fn lightness(&self) -> f32 {
        self.to_hsl().2
    }

    /// Returns the color with its HSL lightness moved by `delta`, clamped to `0..=1`. Hue, saturation and
    /// alpha are preserved.
    pub fn shift_lightness(&self, delta: f32) -> Color {
        let (h, s, l) = self.to_hsl();
        let (r, g, b) = hsl_to_rgb(h, s, (l + delta).clamp(0.0, 1.0));
        Color::rgba(r, g, b, self.a)
    }

    /// Relative luminance as defined by WCAG, in `0..=1`.
    pub fn luminance(&self) -> f32 {
        let linear = |c: u8| {
            let c = c as f32 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };

        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    fn to_hsl(self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d == 0.0 {
            return (0.0, 0.0, l);
        }

        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        (h / 6.0, s, l)
    }
}

impl From<Color> for tiny_skia::Color {
    fn from(value: Color) -> Self {
        tiny_skia::Color::from_rgba8(value.r, value.g, value.b, value.a)
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let to_u8 = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    if s == 0.0 {
        let v = to_u8(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        to_u8(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_channel(p, q, h)),
        to_u8(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

const fn decode_byte(high: u8, low: u8) -> u8 {
    decode_char(high) * 16 + decode_char(low)
}

const fn decode_char(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => panic!("Invalid hex character"),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn color_serialization() {
        let hex = "#FF1000AA";
        let color = Color::try_from_hex(hex).unwrap();
        assert_eq!(&color.to_hex(), hex);
        assert_eq!(Color::from_hex(hex), color);

        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#FF1000AA\"");
        assert_eq!(serde_json::from_str::<Color>(&json).unwrap(), color);
        assert!(serde_json::from_str::<Color>("\"navy-ish\"").is_err());
    }

    #[test]
    fn parse_notations() {
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#0A1530"), Some(Color::rgb(10, 21, 48)));
        assert_eq!(
            Color::parse("rgb(10, 21, 48)"),
            Some(Color::rgb(10, 21, 48))
        );
        assert_eq!(
            Color::parse("RGBA(255,0,0,0.5)"),
            Some(Color::rgba(255, 0, 0, 128))
        );

        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("rgb(256, 0, 0)"), None);
        assert_eq!(Color::parse("rgba(0, 0, 0, 2)"), None);
        assert_eq!(Color::parse("#ééé"), None);
        assert_eq!(Color::parse("blue"), None);
    }

    #[test]
    fn blend_and_over() {
        let back = Color::BLACK;
        let fore = Color::rgba(255, 255, 255, 128);
        assert_eq!(back.blend(fore), Color::rgb(128, 128, 128));
        assert_eq!(Color::WHITE.over(Color::BLACK, 0.3), Color::rgb(77, 77, 77));
        assert_eq!(Color::WHITE.over(Color::BLACK, 1.0), Color::WHITE);
    }

    #[test]
    fn lightness_shift_preserves_hue() {
        let color = Color::from_hex("#3366CC");
        assert_abs_diff_eq!(color.lightness(), 0.5, epsilon = 0.01);

        let darker = color.shift_lightness(-0.15);
        assert_abs_diff_eq!(darker.lightness(), 0.35, epsilon = 0.01);
        assert!(darker.b() > darker.g() && darker.g() > darker.r());

        assert_eq!(Color::WHITE.shift_lightness(0.2), Color::WHITE);
        assert_eq!(Color::BLACK.shift_lightness(0.5), Color::rgb(128, 128, 128));
    }

    #[test]
    fn luminance() {
        assert_abs_diff_eq!(Color::WHITE.luminance(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Color::BLACK.luminance(), 0.0, epsilon = 1e-6);
    }
}
