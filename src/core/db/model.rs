use std::{fmt, str::FromStr};

use rand::Rng;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Packs the channels as `0xRRGGBB`.
    pub fn to_rgb24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub fn from_rgb24(value: u32) -> Self {
        let r = ((value >> 16) & 0xFF) as u8;
        let g = ((value >> 8) & 0xFF) as u8;
        let b = (value & 0xFF) as u8;
        Color { r, g, b }
    }

    /// Uniformly samples one of the 2^24 colors.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_rgb24(rng.gen_range(0..=0xFF_FFFF))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_rgb24())
    }
}

impl FromStr for Color {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidColor(value.to_string());
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let packed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(Self::from_rgb24(packed))
    }
}
