//! embedded-graphics integration
//!
//! [`PixelStore`] is a `DrawTarget<Color = Gray4>`, so primitives, text
//! and images can be drawn straight into a candidate frame before it is
//! committed. Colour images are reduced with [`rgb_to_gray4`].

use core::convert::Infallible;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{Gray4, GrayColor, Rgb888, RgbColor},
    Pixel,
};

use crate::framebuffer::{PixelStore, NIBBLE_MASK};

/// Convert an 8-bit-per-channel colour to a 4-bit gray level
///
/// Uses luma weights 0.299 R + 0.587 G + 0.114 B on 16-bit channels with
/// rounding, then keeps the top four bits.
pub fn rgb_to_gray4(color: Rgb888) -> Gray4 {
    // Widen 8-bit channels to 16 bits (0xAB -> 0xABAB)
    let r = u32::from(color.r()) * 0x101;
    let g = u32::from(color.g()) * 0x101;
    let b = u32::from(color.b()) * 0x101;
    let luma = (299 * r + 587 * g + 114 * b + 500) / 1000;
    Gray4::new((luma >> 12) as u8)
}

/// Scale a 4-bit gray level to 8 bits (0xF -> 0xFF)
pub fn gray4_to_luma8(color: Gray4) -> u8 {
    (color.luma() & NIBBLE_MASK) * 0x11
}

impl OriginDimensions for PixelStore {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}

impl DrawTarget for PixelStore {
    type Color = Gray4;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // Off-screen pixels are dropped by `set`
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.luma());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.luma());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    #[test]
    fn test_luma_extremes() {
        assert_eq!(rgb_to_gray4(Rgb888::WHITE).luma(), 15);
        assert_eq!(rgb_to_gray4(Rgb888::BLACK).luma(), 0);
    }

    #[test]
    fn test_luma_weights() {
        // Green dominates the weighting
        let red = rgb_to_gray4(Rgb888::RED).luma();
        let green = rgb_to_gray4(Rgb888::GREEN).luma();
        let blue = rgb_to_gray4(Rgb888::BLUE).luma();
        assert_eq!(red, 4);
        assert_eq!(green, 9);
        assert_eq!(blue, 1);
        assert!(green > red && red > blue);
    }

    #[test]
    fn test_gray4_to_luma8() {
        assert_eq!(gray4_to_luma8(Gray4::new(0xF)), 0xFF);
        assert_eq!(gray4_to_luma8(Gray4::new(0x5)), 0x55);
        assert_eq!(gray4_to_luma8(Gray4::BLACK), 0x00);
    }

    #[test]
    fn test_size() {
        let store = PixelStore::new(256, 64).unwrap();
        assert_eq!(store.size(), Size::new(256, 64));
    }

    #[test]
    fn test_draw_rectangle() {
        let mut store = PixelStore::new(8, 4).unwrap();
        Rectangle::new(Point::new(2, 1), Size::new(4, 2))
            .into_styled(PrimitiveStyle::with_fill(Gray4::new(0x9)))
            .draw(&mut store)
            .unwrap();

        assert_eq!(store.row(0), Some(&[0x00u8, 0x00, 0x00, 0x00][..]));
        assert_eq!(store.row(1), Some(&[0x00u8, 0x99, 0x99, 0x00][..]));
        assert_eq!(store.row(2), Some(&[0x00u8, 0x99, 0x99, 0x00][..]));
        assert_eq!(store.row(3), Some(&[0x00u8, 0x00, 0x00, 0x00][..]));
    }

    #[test]
    fn test_draw_clips_offscreen() {
        let mut store = PixelStore::new(4, 2).unwrap();
        Rectangle::new(Point::new(-2, -2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Gray4::WHITE))
            .draw(&mut store)
            .unwrap();

        assert_eq!(store.as_bytes(), &[0xF0, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_clear() {
        let mut store = PixelStore::new(4, 1).unwrap();
        DrawTarget::clear(&mut store, Gray4::new(0x3)).unwrap();
        assert_eq!(store.as_bytes(), &[0x33, 0x33]);
    }
}
