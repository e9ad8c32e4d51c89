//! 128×64 one-bit frame, composed in RAM and handed to a [`Display`] to
//! present.
//!
//! [`Display`]: super::Display

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use core::convert::Infallible;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

const FRAME_BYTES: usize = (SCREEN_WIDTH * SCREEN_HEIGHT / 8) as usize;

/// Row-major bitmap, bit `y * WIDTH + x`. Drawing outside the panel is
/// silently clipped, so text can start at a negative x.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    bits: [u8; FRAME_BYTES],
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            bits: [0; FRAME_BYTES],
        }
    }

    /// Turn every pixel off.
    pub fn blank(&mut self) {
        self.bits = [0; FRAME_BYTES];
    }

    pub fn is_blank(&self) -> bool {
        self.bits.iter().all(|b| *b == 0)
    }

    /// Whether the pixel at (`x`, `y`) is on. Off-panel reads are off.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let bit = (y * SCREEN_WIDTH + x) as usize;
        self.bits[bit / 8] & (1 << (bit % 8)) != 0
    }

    /// Number of lit pixels.
    pub fn lit(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Lit pixels inside the `w`×`h` box at (`x`, `y`).
    pub fn lit_in(&self, x: u32, y: u32, w: u32, h: u32) -> usize {
        (y..y + h)
            .flat_map(|py| (x..x + w).map(move |px| (px, py)))
            .filter(|&(px, py)| self.pixel(px, py))
            .count()
    }

    /// Every pixel of the panel, on or off, for blitting into a driver.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + '_ {
        (0..SCREEN_HEIGHT).flat_map(move |y| {
            (0..SCREEN_WIDTH).map(move |x| {
                Pixel(
                    Point::new(x as i32, y as i32),
                    BinaryColor::from(self.pixel(x, y)),
                )
            })
        })
    }

    fn set(&mut self, x: u32, y: u32, on: bool) {
        let bit = (y * SCREEN_WIDTH + x) as usize;
        if on {
            self.bits[bit / 8] |= 1 << (bit % 8);
        } else {
            self.bits[bit / 8] &= !(1 << (bit % 8));
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
                    self.set(x, y, color.is_on());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn new_frame_is_blank() {
        let frame = FrameBuffer::new();
        assert!(frame.is_blank());
        assert_eq!(frame.lit(), 0);
    }

    #[test]
    fn drawing_sets_exact_pixels() {
        let mut frame = FrameBuffer::new();
        let _ = Rectangle::new(Point::new(126, 62), Size::new(2, 2))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame);
        assert_eq!(frame.lit(), 4);
        assert!(frame.pixel(127, 63));
        assert!(!frame.pixel(125, 63));
    }

    #[test]
    fn off_panel_drawing_is_clipped() {
        let mut frame = FrameBuffer::new();
        let _ = Rectangle::new(Point::new(-4, -4), Size::new(6, 6))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame);
        assert_eq!(frame.lit(), 4);
        assert_eq!(frame.lit_in(0, 0, 2, 2), 4);
    }

    #[test]
    fn blank_clears_everything() {
        let mut frame = FrameBuffer::new();
        let _ = frame.clear(BinaryColor::On);
        assert_eq!(frame.lit(), (SCREEN_WIDTH * SCREEN_HEIGHT) as usize);
        frame.blank();
        assert!(frame.is_blank());
    }

    #[test]
    fn pixels_cover_the_whole_panel() {
        let mut frame = FrameBuffer::new();
        let _ = Pixel(Point::new(3, 5), BinaryColor::On).draw(&mut frame);
        let all: Vec<_> = frame.pixels().collect();
        assert_eq!(all.len(), (SCREEN_WIDTH * SCREEN_HEIGHT) as usize);
        assert_eq!(all.iter().filter(|p| p.1.is_on()).count(), 1);
        assert!(all.contains(&Pixel(Point::new(3, 5), BinaryColor::On)));
    }
}
