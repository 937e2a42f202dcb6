use serde::{Deserialize, Serialize};

use crate::error::{TrendError, TrendResult};

/// Packed `0xAARRGGBB` color, the native pixel format of every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const LIGHT_GRAY: Self = Self::rgb(211, 211, 211);

    #[must_use]
    pub const fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self(((alpha as u32) << 24) | ((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::argb(255, red, green, blue)
    }

    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self(packed)
    }

    /// Builds a color from normalized `0..=1` channels.
    pub fn from_normalized(red: f64, green: f64, blue: f64, alpha: f64) -> TrendResult<Self> {
        let mut channels = [0_u8; 4];
        for (slot, (name, value)) in channels.iter_mut().zip([
            ("alpha", alpha),
            ("red", red),
            ("green", green),
            ("blue", blue),
        ]) {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(TrendError::InvalidData(format!(
                    "color channel `{name}` must be finite and in [0, 1]"
                )));
            }
            *slot = (value * 255.0).round() as u8;
        }
        Ok(Self::argb(channels[0], channels[1], channels[2], channels[3]))
    }

    #[must_use]
    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Same color with the alpha channel forced to fully opaque.
    #[must_use]
    pub const fn opaque(self) -> Self {
        Self(self.0 | 0xFF00_0000)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }

    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

const RED_BLUE_MASK: u32 = 0x00FF_00FF;
const GREEN_MASK: u32 = 0x0000_FF00;

/// Blends `color` over `existing` with `alpha` out of 256.
///
/// Red/blue and green are processed as two packed groups in wrapping 32-bit
/// arithmetic. The `>> 8` makes this an approximation of a linear blend that
/// never quite reaches the new color; callers write the color directly for
/// full coverage. The result is always opaque.
#[inline]
#[must_use]
pub fn blend_packed(existing: u32, color: u32, alpha: u8) -> u32 {
    let alpha = u32::from(alpha);
    let color_rb = color & RED_BLUE_MASK;
    let color_g = color & GREEN_MASK;

    let mut rb = existing & RED_BLUE_MASK;
    let mut g = existing & GREEN_MASK;
    rb = rb.wrapping_add(color_rb.wrapping_sub(rb).wrapping_mul(alpha) >> 8);
    g = g.wrapping_add(color_g.wrapping_sub(g).wrapping_mul(alpha) >> 8);

    0xFF00_0000 | (rb & RED_BLUE_MASK) | (g & GREEN_MASK)
}

#[cfg(test)]
mod tests {
    use super::{Color, blend_packed};

    #[test]
    fn packing_and_channel_accessors_agree() {
        let color = Color::argb(0x80, 0x12, 0x34, 0x56);
        assert_eq!(color.packed(), 0x8012_3456);
        assert_eq!(
            (color.alpha(), color.red(), color.green(), color.blue()),
            (0x80, 0x12, 0x34, 0x56)
        );
        assert_eq!(color.opaque().alpha(), 255);
    }

    #[test]
    fn half_blend_of_white_over_black() {
        let blended = blend_packed(Color::BLACK.packed(), Color::WHITE.packed(), 128);
        assert_eq!(blended, 0xFF7F_7F7F);
    }

    #[test]
    fn zero_alpha_keeps_existing_color() {
        let existing = Color::rgb(10, 200, 30).packed();
        assert_eq!(blend_packed(existing, Color::RED.packed(), 0), existing);
    }

    #[test]
    fn blending_darker_color_decreases_channels() {
        let blended = Color::from_packed(blend_packed(
            Color::WHITE.packed(),
            Color::BLACK.packed(),
            128,
        ));
        assert!(blended.red() < 255 && blended.red() >= 126);
        assert_eq!(blended.red(), blended.blue());
        assert_eq!(blended.alpha(), 255);
    }

    #[test]
    fn normalized_channels_are_validated() {
        assert_eq!(
            Color::from_normalized(1.0, 0.0, 0.0, 1.0).expect("valid"),
            Color::RED
        );
        assert!(Color::from_normalized(1.5, 0.0, 0.0, 1.0).is_err());
    }
}
