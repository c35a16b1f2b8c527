//! Text Overlay Layer
//!
//! Holds the recognized text placements and paints them over the canvas.
//! Overlays are never removed; resizing the surface rescales the whole
//! collection proportionally.

use egui::{Align2, Color32, FontId, Painter, Pos2};

use crate::canvas::{Point, StrokeBounds};

/// A placed, recognized text result.
///
/// `position` is the top-left of the bounding box the recognition ran on;
/// `height` doubles as the rendered font size basis.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    pub position: Point,
    pub width: f32,
    pub height: f32,
}

impl TextOverlay {
    /// Place a recognition result at its stroke's bounding region
    pub fn from_recognition(text: String, bounds: StrokeBounds) -> Self {
        Self {
            text,
            position: Point::new(bounds.min_x, bounds.min_y),
            width: bounds.width,
            height: bounds.height,
        }
    }
}

/// Ordered collection of text overlays, insertion order = recognition
/// completion order.
#[derive(Debug, Default)]
pub struct OverlayStore {
    entries: Vec<TextOverlay>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an overlay at the end of the collection
    pub fn append(&mut self, overlay: TextOverlay) {
        self.entries.push(overlay);
    }

    pub fn entries(&self) -> &[TextOverlay] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rescale every overlay from the old surface size to the new one.
    ///
    /// Applied to the whole collection at once so relative proportions are
    /// preserved exactly; degenerate old dimensions are ignored.
    pub fn rescale(&mut self, old: (f32, f32), new: (f32, f32)) {
        if old.0 <= 0.0 || old.1 <= 0.0 || old == new {
            return;
        }
        let sx = new.0 / old.0;
        let sy = new.1 / old.1;
        for overlay in &mut self.entries {
            overlay.position.x *= sx;
            overlay.position.y *= sy;
            overlay.width *= sx;
            overlay.height *= sy;
        }
    }

    /// Paint all overlays in insertion order; later entries draw over
    /// earlier ones.
    pub fn paint(&self, painter: &Painter, origin: Pos2, color: Color32) {
        for overlay in self.entries() {
            let pos = Pos2::new(
                origin.x + overlay.position.x,
                origin.y + overlay.position.y,
            );
            painter.text(
                pos,
                Align2::LEFT_TOP,
                &overlay.text,
                FontId::proportional(overlay.height.max(1.0)),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(text: &str, x: f32, y: f32, width: f32, height: f32) -> TextOverlay {
        TextOverlay {
            text: text.to_string(),
            position: Point::new(x, y),
            width,
            height,
        }
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut store = OverlayStore::new();
        store.append(overlay("first", 0.0, 0.0, 20.0, 20.0));
        store.append(overlay("second", 50.0, 50.0, 20.0, 20.0));
        store.append(overlay("third", 100.0, 10.0, 20.0, 20.0));

        assert_eq!(store.len(), 3);
        let texts: Vec<&str> = store.entries().iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn test_from_recognition_uses_bounds_placement() {
        let bounds = StrokeBounds {
            min_x: 90.0,
            min_y: 90.0,
            width: 70.0,
            height: 20.0,
        };
        let overlay = TextOverlay::from_recognition("C".to_string(), bounds);

        assert_eq!(overlay.text, "C");
        assert_eq!(overlay.position, Point::new(90.0, 90.0));
        assert_eq!(overlay.width, 70.0);
        assert_eq!(overlay.height, 20.0);
    }

    #[test]
    fn test_rescale_is_proportional_per_axis() {
        let mut store = OverlayStore::new();
        store.append(overlay("A", 100.0, 50.0, 40.0, 20.0));

        store.rescale((800.0, 600.0), (400.0, 1200.0));

        let entry = &store.entries()[0];
        assert_eq!(entry.position, Point::new(50.0, 100.0));
        assert_eq!(entry.width, 20.0);
        assert_eq!(entry.height, 40.0);
    }

    #[test]
    fn test_rescale_round_trip_restores_placement() {
        let mut store = OverlayStore::new();
        store.append(overlay("A", 123.0, 45.0, 67.0, 21.0));
        store.append(overlay("B", 9.0, 512.0, 30.0, 30.0));

        store.rescale((1024.0, 768.0), (777.0, 333.0));
        store.rescale((777.0, 333.0), (1024.0, 768.0));

        let a = &store.entries()[0];
        assert!((a.position.x - 123.0).abs() < 1e-2);
        assert!((a.position.y - 45.0).abs() < 1e-2);
        assert!((a.width - 67.0).abs() < 1e-2);
        assert!((a.height - 21.0).abs() < 1e-2);

        let b = &store.entries()[1];
        assert!((b.position.x - 9.0).abs() < 1e-2);
        assert!((b.position.y - 512.0).abs() < 1e-2);
    }

    #[test]
    fn test_rescale_skips_degenerate_old_size() {
        let mut store = OverlayStore::new();
        store.append(overlay("A", 10.0, 10.0, 5.0, 5.0));

        store.rescale((0.0, 600.0), (800.0, 300.0));

        assert_eq!(store.entries()[0].position, Point::new(10.0, 10.0));
    }
}
