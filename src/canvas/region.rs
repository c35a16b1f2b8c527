//! Bounding-region extraction for completed strokes
//!
//! Computes the padded axis-aligned bounding box of a stroke and produces
//! an isolated PNG crop of that region from the live surface, composited
//! over a solid background.

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use super::stroke::Point;
use super::surface::InkSurface;

/// Fixed padding applied on every side of a stroke's bounding box
pub const REGION_PADDING: f32 = 10.0;

/// Padded bounding box of a completed stroke, in surface coordinates.
///
/// `min_x`/`min_y` may extend past the surface edges when a stroke is drawn
/// close to them; extraction clamps the pixel copy, placement does not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl StrokeBounds {
    /// Compute the padded bounding box around a recorded path.
    ///
    /// Returns `None` for an empty path; a single-point stroke yields a
    /// region of twice the padding on each axis.
    pub fn around(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut min_x = first.x;
        let mut max_x = first.x;
        let mut min_y = first.y;
        let mut max_y = first.y;

        for point in points {
            min_x = min_x.min(point.x);
            max_x = max_x.max(point.x);
            min_y = min_y.min(point.y);
            max_y = max_y.max(point.y);
        }

        min_x -= REGION_PADDING;
        max_x += REGION_PADDING;
        min_y -= REGION_PADDING;
        max_y += REGION_PADDING;

        Some(Self {
            min_x,
            min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    /// Scale the bounds from one surface size to another, per axis.
    pub fn rescaled(&self, old: (f32, f32), new: (f32, f32)) -> Self {
        if old.0 <= 0.0 || old.1 <= 0.0 || old == new {
            return *self;
        }
        let sx = new.0 / old.0;
        let sy = new.1 / old.1;
        Self {
            min_x: self.min_x * sx,
            min_y: self.min_y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }
}

/// Produce a PNG crop of the bounded region of the live surface.
///
/// The crop is exactly `bounds.width x bounds.height` pixels (rounded),
/// filled with the surface background, with the overlapping surface
/// pixels copied verbatim on top.
pub fn extract_region(surface: &InkSurface, bounds: &StrokeBounds) -> Result<Vec<u8>> {
    let width = bounds.width.round().max(1.0) as u32;
    let height = bounds.height.round().max(1.0) as u32;
    let origin_x = bounds.min_x.round() as i64;
    let origin_y = bounds.min_y.round() as i64;

    let mut crop = RgbaImage::from_pixel(width, height, surface.background());
    let source = surface.image();
    let (source_width, source_height) = surface.dimensions();

    for dy in 0..height {
        let sy = origin_y + dy as i64;
        if sy < 0 || sy >= source_height as i64 {
            continue;
        }
        for dx in 0..width {
            let sx = origin_x + dx as i64;
            if sx < 0 || sx >= source_width as i64 {
                continue;
            }
            crop.put_pixel(dx, dy, *source.get_pixel(sx as u32, sy as u32));
        }
    }

    let mut png = Vec::new();
    crop.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("Failed to encode stroke region as PNG")?;

    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::surface::PaintSettings;

    #[test]
    fn test_empty_path_has_no_bounds() {
        assert_eq!(StrokeBounds::around(&[]), None);
    }

    #[test]
    fn test_single_point_yields_minimum_region() {
        let bounds = StrokeBounds::around(&[Point::new(50.0, 40.0)]).unwrap();
        assert_eq!(bounds.min_x, 40.0);
        assert_eq!(bounds.min_y, 30.0);
        assert_eq!(bounds.width, 20.0);
        assert_eq!(bounds.height, 20.0);
    }

    #[test]
    fn test_bounds_never_smaller_than_padding() {
        let paths = [
            vec![Point::new(3.0, 3.0)],
            vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)],
            vec![Point::new(10.0, 10.0), Point::new(10.0, 90.0)],
        ];
        for path in &paths {
            let bounds = StrokeBounds::around(path).unwrap();
            assert!(bounds.width >= 2.0 * REGION_PADDING);
            assert!(bounds.height >= 2.0 * REGION_PADDING);
        }
    }

    #[test]
    fn test_horizontal_stroke_scenario() {
        // Stroke from (100,100) to (150,100)
        let bounds =
            StrokeBounds::around(&[Point::new(100.0, 100.0), Point::new(150.0, 100.0)]).unwrap();
        assert_eq!(bounds.min_x, 90.0);
        assert_eq!(bounds.min_y, 90.0);
        assert_eq!(bounds.width, 70.0);
        assert_eq!(bounds.height, 20.0);
    }

    #[test]
    fn test_rescaled_round_trip() {
        let bounds = StrokeBounds::around(&[Point::new(100.0, 100.0), Point::new(150.0, 120.0)])
            .unwrap();
        let scaled = bounds
            .rescaled((800.0, 600.0), (1200.0, 300.0))
            .rescaled((1200.0, 300.0), (800.0, 600.0));

        assert!((scaled.min_x - bounds.min_x).abs() < 1e-3);
        assert!((scaled.min_y - bounds.min_y).abs() < 1e-3);
        assert!((scaled.width - bounds.width).abs() < 1e-3);
        assert!((scaled.height - bounds.height).abs() < 1e-3);
    }

    #[test]
    fn test_rescaled_ignores_degenerate_old_size() {
        let bounds = StrokeBounds::around(&[Point::new(10.0, 10.0)]).unwrap();
        assert_eq!(bounds.rescaled((0.0, 0.0), (100.0, 100.0)), bounds);
    }

    #[test]
    fn test_extract_region_dimensions_and_content() {
        let mut surface = InkSurface::new(200, 200, PaintSettings::default());
        surface.paint_segment(Point::new(100.0, 100.0), Point::new(150.0, 100.0));

        let bounds =
            StrokeBounds::around(&[Point::new(100.0, 100.0), Point::new(150.0, 100.0)]).unwrap();
        let png = extract_region(&surface, &bounds).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (70, 20));

        // Center of the crop sits on the stroke
        let center = decoded.get_pixel(35, 10);
        assert_eq!(center[0], 0);
        // Top-left corner is padding, so background
        let corner = decoded.get_pixel(0, 0);
        assert_eq!(corner[0], 255);
    }

    #[test]
    fn test_extract_region_clamps_to_surface_edges() {
        let surface = InkSurface::new(100, 100, PaintSettings::default());

        // Stroke at the surface origin pushes the padded box past the edge
        let bounds = StrokeBounds::around(&[Point::new(0.0, 0.0)]).unwrap();
        assert_eq!(bounds.min_x, -10.0);

        let png = extract_region(&surface, &bounds).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        // Off-surface pixels come back as background
        assert_eq!(decoded.dimensions(), (20, 20));
        assert_eq!(decoded.get_pixel(0, 0)[0], 255);
    }
}
