//! Colours and the viridis ramp used to tint landmarks

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use posefx_core::{PosefxError, PosefxResult};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`
    pub fn from_hex(hex: &str) -> PosefxResult<Self> {
        let invalid = || PosefxError::InvalidColor(hex.to_string());
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        // from_str_radix alone would accept a sign
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            6 => Ok(Color::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Color::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel-wise linear interpolation
    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = PosefxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

/// Viridis stops, dark purple to yellow
pub const VIRIDIS_STOPS: [Color; 5] = [
    Color::rgb(0x44, 0x01, 0x54),
    Color::rgb(0x3b, 0x52, 0x8b),
    Color::rgb(0x21, 0x91, 0x8c),
    Color::rgb(0x5e, 0xc9, 0x62),
    Color::rgb(0xfd, 0xe7, 0x25),
];

/// Piecewise-linear ramp over evenly spaced stops
pub fn ramp(stops: &[Color], t: f32) -> Color {
    match stops {
        [] => Color::BLACK,
        [only] => *only,
        _ => {
            let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
            let scaled = t * (stops.len() - 1) as f32;
            let lower = (scaled.floor() as usize).min(stops.len() - 2);
            stops[lower].lerp(&stops[lower + 1], scaled - lower as f32)
        }
    }
}

/// Viridis colour at `t` in `[0, 1]`
pub fn viridis(t: f32) -> Color {
    ramp(&VIRIDIS_STOPS, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), VIRIDIS_STOPS[0]);
        assert_eq!(viridis(1.0), VIRIDIS_STOPS[4]);
        assert_eq!(viridis(-3.0), VIRIDIS_STOPS[0]);
        assert_eq!(viridis(7.0), VIRIDIS_STOPS[4]);
        assert_eq!(viridis(0.5), VIRIDIS_STOPS[2]);
    }

    #[test]
    fn test_viridis_between_adjacent_stops() {
        // Every channel moves monotonically from one stop to the next
        let (a, b) = (VIRIDIS_STOPS[3], VIRIDIS_STOPS[4]);
        let mut prev = viridis(0.75);
        assert_eq!(prev, a);
        for step in 1..=25 {
            let c = viridis(0.75 + 0.01 * step as f32);
            for (p, n, lo, hi) in [
                (prev.r, c.r, a.r, b.r),
                (prev.g, c.g, a.g, b.g),
                (prev.b, c.b, a.b, b.b),
            ] {
                if hi >= lo {
                    assert!(n >= p && n <= hi);
                } else {
                    assert!(n <= p && n >= hi);
                }
            }
            prev = c;
        }
    }

    #[test]
    fn test_hex_roundtrip_forms() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::from_hex("#0f0").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!("#00FFFF".parse::<Color>().unwrap(), Color::CYAN);
        assert_eq!(Color::rgb(1, 2, 3).to_hex(), "#010203");
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Color::from_hex("red").is_err());
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_signed_digits_rejected() {
        assert!(matches!(
            Color::from_hex("#+f+f+f"),
            Err(PosefxError::InvalidColor(_))
        ));
        assert!(Color::from_hex("#+f0").is_err());
        assert!(Color::from_hex("#-1").is_err());
    }
}
