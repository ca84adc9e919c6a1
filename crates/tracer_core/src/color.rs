//! Color types for render targets.

use bytemuck::{Pod, Zeroable};
use tracer_math::{Interval, Vec3};

/// Color type alias (linear RGB values typically 0-1)
pub type Color = Vec3;

/// 8-bit RGB color, laid out for direct encoding as an RGB8 image.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct UnsignedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl UnsignedColor {
    pub const BLACK: UnsignedColor = UnsignedColor { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for UnsignedColor {
    /// Scales each channel by 255 and clamps, no gamma is applied.
    fn from(color: Color) -> Self {
        let range = Interval::new(0.0, 255.0);
        Self {
            r: range.clamp(color.x * 255.0) as u8,
            g: range.clamp(color.y * 255.0) as u8,
            b: range.clamp(color.z * 255.0) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_color_clamps() {
        let c = UnsignedColor::from(Color::new(-0.5, 0.5, 2.0));
        assert_eq!(c, UnsignedColor::new(0, 127, 255));
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(UnsignedColor::from(Color::ONE), UnsignedColor::new(255, 255, 255));
        assert_eq!(UnsignedColor::from(Color::ZERO), UnsignedColor::BLACK);
    }

    #[test]
    fn test_layout_is_rgb8() {
        let pixels = [UnsignedColor::new(1, 2, 3), UnsignedColor::new(4, 5, 6)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6]);
    }
}
