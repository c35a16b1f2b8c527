//! Drawing-Surface Domain
//!
//! Stroke capture, the offscreen ink raster, and bounding-region
//! extraction for completed strokes.

pub mod region;
pub mod stroke;
pub mod surface;

pub use region::{extract_region, StrokeBounds, REGION_PADDING};
pub use stroke::{Point, StrokePath};
pub use surface::{InkSurface, PaintSettings};
