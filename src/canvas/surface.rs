//! Offscreen ink raster
//!
//! The live drawing surface is an in-memory RGBA buffer. Strokes are
//! painted into it incrementally for immediate feedback; the UI uploads
//! it as a texture whenever it changes.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use super::stroke::Point;

/// Fixed paint settings applied to every stroke segment
#[derive(Debug, Clone)]
pub struct PaintSettings {
    /// Stroke width in pixels
    pub stroke_width: f32,
    /// Ink color
    pub ink: Rgba<u8>,
    /// Background color the surface is filled with
    pub background: Rgba<u8>,
}

impl Default for PaintSettings {
    fn default() -> Self {
        Self {
            stroke_width: 3.0,
            ink: Rgba([0, 0, 0, 255]),
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

/// The live drawing surface
#[derive(Debug)]
pub struct InkSurface {
    pixels: RgbaImage,
    paint: PaintSettings,
}

impl InkSurface {
    /// Create a blank surface of the given size
    pub fn new(width: u32, height: u32, paint: PaintSettings) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            pixels: RgbaImage::from_pixel(width, height, paint.background),
            paint,
        }
    }

    /// Surface dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// The raw pixel buffer
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn background(&self) -> Rgba<u8> {
        self.paint.background
    }

    /// Replace the surface with a blank raster of the new size.
    ///
    /// Existing ink is discarded; the paint settings carry over unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        self.pixels = RgbaImage::from_pixel(width, height, self.paint.background);
    }

    /// Erase all ink, keeping the current size
    pub fn clear(&mut self) {
        let (width, height) = self.pixels.dimensions();
        self.pixels = RgbaImage::from_pixel(width, height, self.paint.background);
    }

    /// Paint one stroke segment with round caps.
    ///
    /// Stamps filled circles along the segment at roughly one-pixel steps,
    /// which gives round caps and joins for free. Out-of-bounds stamps are
    /// clipped by the drawing routine.
    pub fn paint_segment(&mut self, from: Point, to: Point) {
        let radius = (self.paint.stroke_width / 2.0).max(1.0).round() as i32;
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let steps = (dx * dx + dy * dy).sqrt().ceil().max(1.0) as u32;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (from.x + dx * t).round() as i32;
            let y = (from.y + dy * t).round() as i32;
            draw_filled_circle_mut(&mut self.pixels, (x, y), radius, self.paint.ink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_surface(width: u32, height: u32) -> InkSurface {
        InkSurface::new(width, height, PaintSettings::default())
    }

    #[test]
    fn test_new_surface_is_background_filled() {
        let surface = test_surface(32, 16);
        assert_eq!(surface.dimensions(), (32, 16));
        assert_eq!(*surface.image().get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*surface.image().get_pixel(31, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_paint_segment_marks_ink_pixels() {
        let mut surface = test_surface(64, 64);
        surface.paint_segment(Point::new(10.0, 32.0), Point::new(50.0, 32.0));

        // Pixels along the segment are ink-colored
        assert_eq!(*surface.image().get_pixel(30, 32), Rgba([0, 0, 0, 255]));
        // Pixels far from the segment stay background
        assert_eq!(*surface.image().get_pixel(30, 10), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_paint_segment_clips_out_of_bounds() {
        let mut surface = test_surface(20, 20);
        // Runs well past the right edge; must not panic
        surface.paint_segment(Point::new(10.0, 10.0), Point::new(200.0, 10.0));
        assert_eq!(*surface.image().get_pixel(15, 10), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_clear_restores_background() {
        let mut surface = test_surface(32, 32);
        surface.paint_segment(Point::new(5.0, 5.0), Point::new(25.0, 25.0));
        surface.clear();

        assert_eq!(surface.dimensions(), (32, 32));
        assert_eq!(*surface.image().get_pixel(15, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_resize_blanks_at_new_size() {
        let mut surface = test_surface(32, 32);
        surface.paint_segment(Point::new(5.0, 5.0), Point::new(25.0, 25.0));
        surface.resize(48, 24);

        assert_eq!(surface.dimensions(), (48, 24));
        assert_eq!(*surface.image().get_pixel(15, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_zero_size_clamped() {
        let surface = test_surface(0, 0);
        assert_eq!(surface.dimensions(), (1, 1));
    }
}
