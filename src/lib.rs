//! Pixel paint engine
//!
//! Freehand strokes on a fixed 600×480 canvas: pointer events go through the
//! stroke tracker, get rasterized with Bresenham and stamped as small blocks.
//! Pixels only leave or enter the canvas through the image bridge (PNG).

pub mod bridge;
pub mod channels;
pub mod config;
pub mod counter;
pub mod draw;
pub mod error;
pub mod raster;
pub mod session;
pub mod stroke;
pub mod surface;
pub mod types;

pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 480;

pub use bridge::{ImageBlob, ImageSource};
pub use counter::{Badge, BadgeUpdate, ChangeCounter};
pub use error::{PaintError, Result};
pub use raster::rasterize;
pub use session::PaintSession;
pub use stroke::{PointerEvent, StrokeState, StrokeTracker};
pub use surface::{Canvas, Surface, SurfaceHandle};
pub use types::{Color, Point};
