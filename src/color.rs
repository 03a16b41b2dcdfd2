//! Segment colors.

use crate::consts::DEFAULT_PALETTE;
use serde::{Deserialize, Serialize};
use std::ops;

/// RGBA color, 8 bits per channel.
#[derive(Eq, PartialEq, Copy, Clone, Default, Debug, Hash, Serialize, Deserialize)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

#[allow(missing_docs)]
impl Rgba {
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);
    pub const CLEAR: Rgba = Rgba(0, 0, 0, 0);
    pub const RED: Rgba = Rgba(255, 0, 0, 255);
    pub const GREEN: Rgba = Rgba(0, 255, 0, 255);
    pub const BLUE: Rgba = Rgba(0, 0, 255, 255);
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);
}

impl Rgba {
    /// Builds an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    /// Returns the same color with the alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self(self.0, self.1, self.2, alpha)
    }

    /// Returns `true` if the color is fully transparent.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.3 == 0
    }

    /// Returns the default palette.
    #[must_use]
    pub fn default_palette() -> Vec<Rgba> {
        DEFAULT_PALETTE.iter().copied().map(Rgba::from_rgb).collect()
    }
}

impl ops::Mul<f64> for Rgba {
    type Output = Self;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn mul(self, rhs: f64) -> Self::Output {
        Rgba(self.0, self.1, self.2, (f64::from(self.3) * rhs.clamp(0.0, 1.0)) as u8)
    }
}
