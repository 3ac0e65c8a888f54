/// Double-buffered pixel surface the wireframe is drawn into
use image::{Rgb, RgbImage};
use std::path::Path;

use crate::error::Result;
use crate::raster::PixelPoint;

/// Fixed-size RGB surface with a front image for readers and a back image
/// for the rasterizer
///
/// [`Canvas::present`] clears and fills the back image, then swaps, so a
/// reader never observes a half-drawn frame.
#[derive(Debug, Clone)]
pub struct Canvas {
    front: RgbImage,
    back: RgbImage,
    foreground: Rgb<u8>,
    background: Rgb<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, foreground: [u8; 3], background: [u8; 3]) -> Self {
        let background = Rgb(background);
        Self {
            front: RgbImage::from_pixel(width, height, background),
            back: RgbImage::from_pixel(width, height, background),
            foreground: Rgb(foreground),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.front.width()
    }

    pub fn height(&self) -> u32 {
        self.front.height()
    }

    /// Pixel offset of the viewport center, ties rounded to even
    pub fn center(&self) -> (i32, i32) {
        (
            (self.width() as f64 / 2.0).round_ties_even() as i32,
            (self.height() as f64 / 2.0).round_ties_even() as i32,
        )
    }

    /// Replace the visible frame with `points`, given in center-origin coordinates
    pub fn present(&mut self, points: &[PixelPoint]) {
        let (cx, cy) = self.center();
        let (width, height) = (self.width() as i32, self.height() as i32);

        for pixel in self.back.pixels_mut() {
            *pixel = self.background;
        }
        for p in points {
            let (x, y) = (p.x + cx, p.y + cy);
            if (0..width).contains(&x) && (0..height).contains(&y) {
                self.back.put_pixel(x as u32, y as u32, self.foreground);
            }
        }

        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Whether the buffer pixel at `(x, y)` holds the foreground color
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.front
            .get_pixel_checked(x, y)
            .is_some_and(|p| *p == self.foreground)
    }

    /// Number of foreground pixels in the visible frame
    pub fn lit_count(&self) -> usize {
        self.front.pixels().filter(|p| **p == self.foreground).count()
    }

    /// Write the visible frame as a PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.front
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }
}
