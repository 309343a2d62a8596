use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PropertyError;

/// An RGB color, stored by the host as `"R;G;B"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the color as `0xRRGGBB`, the form renderers take.
    pub fn to_hex(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl FromStr for Color {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PropertyError::InvalidColor(s.to_string());
        let mut parts = s.split(';').map(|p| p.trim().parse::<u8>());
        let (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        Ok(Self { r, g, b })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = PropertyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_and_prints_host_format() {
        let color: Color = " 0; 255 ;16".parse().unwrap();
        assert_eq!(color, Color::new(0, 255, 16));
        assert_eq!(color.to_string(), "0;255;16");
        assert_eq!(color.to_hex(), 0x00ff10);
    }

    #[rstest]
    #[case("")]
    #[case("255;255")]
    #[case("255;255;255;255")]
    #[case("256;0;0")]
    #[case("red;green;blue")]
    #[case("#ffffff")]
    fn rejects_malformed_colors(#[case] input: &str) {
        assert_eq!(
            input.parse::<Color>(),
            Err(PropertyError::InvalidColor(input.to_string()))
        );
    }
}
