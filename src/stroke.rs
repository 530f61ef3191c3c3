// Stroke tracker: turns pointer events into pixel blocks on the surface.
//
// Idle --down--> Active(previous) --move--> Active(current) --up/left--> Idle
//
// Only one stroke can be active. Ending a stroke bumps the change counter.

use crate::counter::ChangeCounter;
use crate::error::Result;
use crate::raster::rasterize;
use crate::surface::Surface;
use crate::types::Point;
use log::{debug, info, warn};

/// Side length of the square stamped at every rasterized point.
pub const DEFAULT_BRUSH_SIZE: u32 = 2;

/// Pointer input, in raw (fractional) canvas-local offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    /// Button released, wherever the pointer is.
    Up,
    /// The pointer is no longer over the canvas.
    Left,
}

/// Pointer capture held for the lifetime of one stroke.
///
/// While it exists the input driver must report `Up`/`Left` from anywhere,
/// not only from over the canvas. Dropping it is the release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    start: Point,
    previous: Point,
    segments: u32,
}

impl Capture {
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn previous(&self) -> Point {
        self.previous
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Active(Capture),
}

pub struct StrokeTracker {
    state: StrokeState,
    brush: u32,
}

impl StrokeTracker {
    pub fn new(brush: u32) -> Self {
        Self {
            state: StrokeState::Idle,
            brush: brush.max(1),
        }
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    pub fn brush(&self) -> u32 {
        self.brush
    }

    /// True while a stroke holds the pointer capture.
    pub fn is_capturing(&self) -> bool {
        matches!(self.state, StrokeState::Active(_))
    }

    pub fn previous(&self) -> Option<Point> {
        match &self.state {
            StrokeState::Active(capture) => Some(capture.previous),
            StrokeState::Idle => None,
        }
    }

    /// Feed one pointer event. Draw failures come back as `Err` and leave the
    /// stroke active, so the next move retries from the same previous point.
    pub fn handle<S: Surface + ?Sized>(
        &mut self,
        event: PointerEvent,
        surface: &mut S,
        counter: &mut ChangeCounter,
    ) -> Result<()> {
        match event {
            PointerEvent::Down { x, y } => self.begin(Point::from_offset(x, y)),
            PointerEvent::Move { x, y } => {
                self.extend(Point::from_offset(x, y), surface)?;
            }
            PointerEvent::Up | PointerEvent::Left => {
                if let Some(capture) = self.end() {
                    counter.increment();
                    info!(
                        "stroke from ({}, {}) finished after {} segments ({:?}); {} changes",
                        capture.start.x,
                        capture.start.y,
                        capture.segments,
                        event,
                        counter.value()
                    );
                }
            }
        }
        Ok(())
    }

    fn begin(&mut self, at: Point) {
        if let StrokeState::Active(old) = &self.state {
            debug!("pointer down during active stroke; re-anchoring from {:?}", old.previous);
        }
        self.state = StrokeState::Active(Capture {
            start: at,
            previous: at,
            segments: 0,
        });
        debug!("stroke started at ({}, {})", at.x, at.y);
    }

    /// Draw previous → `to`. Returns how many blocks were stamped (0 when idle).
    fn extend<S: Surface + ?Sized>(&mut self, to: Point, surface: &mut S) -> Result<usize> {
        let StrokeState::Active(capture) = &mut self.state else {
            return Ok(0);
        };

        let mut drawn = 0;
        for p in rasterize(capture.previous, to) {
            if let Err(e) = surface.fill_rect(p.x, p.y, self.brush, self.brush) {
                warn!(
                    "draw at ({}, {}) failed; stroke stays active: {e}",
                    p.x, p.y
                );
                return Err(e);
            }
            drawn += 1;
        }

        debug!(
            "segment ({}, {}) -> ({}, {}): {drawn} blocks",
            capture.previous.x, capture.previous.y, to.x, to.y
        );
        capture.previous = to;
        capture.segments += 1;
        Ok(drawn)
    }

    fn end(&mut self) -> Option<Capture> {
        match std::mem::take(&mut self.state) {
            StrokeState::Active(capture) => Some(capture),
            StrokeState::Idle => None,
        }
    }
}

impl Default for StrokeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaintError;
    use crate::surface::Canvas;
    use crate::types::Color;
    use image::RgbaImage;

    /// Records every fill instead of painting; can be told to fail.
    #[derive(Default)]
    struct FakeSurface {
        fills: Vec<(i32, i32, u32, u32)>,
        unavailable: bool,
    }

    impl Surface for FakeSurface {
        fn width(&self) -> u32 {
            600
        }
        fn height(&self) -> u32 {
            480
        }
        fn set_color(&mut self, _color: Color) -> Result<()> {
            Ok(())
        }
        fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
            if self.unavailable {
                return Err(PaintError::SurfaceUnavailable("fake".into()));
            }
            self.fills.push((x, y, w, h));
            Ok(())
        }
        fn draw_image_at(&mut self, _image: &RgbaImage, _x: i32, _y: i32) -> Result<()> {
            Ok(())
        }
        fn snapshot(&self) -> Result<RgbaImage> {
            Ok(RgbaImage::new(600, 480))
        }
    }

    fn run(events: &[PointerEvent]) -> (StrokeTracker, FakeSurface, ChangeCounter) {
        let mut tracker = StrokeTracker::default();
        let mut surface = FakeSurface::default();
        let mut counter = ChangeCounter::new();
        for &e in events {
            tracker.handle(e, &mut surface, &mut counter).unwrap();
        }
        (tracker, surface, counter)
    }

    #[test]
    fn down_move_up_draws_the_rasterized_segment() {
        let (tracker, surface, counter) = run(&[
            PointerEvent::Down { x: 0.0, y: 0.0 },
            PointerEvent::Move { x: 3.0, y: 0.0 },
            PointerEvent::Up,
        ]);

        let expected: Vec<_> = rasterize(Point::new(0, 0), Point::new(3, 0))
            .map(|p| (p.x, p.y, 2, 2))
            .collect();
        assert_eq!(surface.fills, expected);
        assert_eq!(counter.value(), 1);
        assert_eq!(tracker.state(), &StrokeState::Idle);
    }

    #[test]
    fn moves_while_idle_draw_nothing() {
        let (tracker, surface, counter) = run(&[
            PointerEvent::Move { x: 10.0, y: 10.0 },
            PointerEvent::Move { x: 20.0, y: 5.0 },
        ]);
        assert!(surface.fills.is_empty());
        assert_eq!(counter.value(), 0);
        assert!(!tracker.is_capturing());
    }

    #[test]
    fn down_alone_draws_nothing_and_floors_offsets() {
        let (tracker, surface, _) = run(&[PointerEvent::Down { x: 4.7, y: 9.2 }]);
        assert!(surface.fills.is_empty());
        assert_eq!(tracker.previous(), Some(Point::new(4, 9)));
    }

    #[test]
    fn segments_chain_from_the_last_point() {
        let (_, surface, _) = run(&[
            PointerEvent::Down { x: 0.0, y: 0.0 },
            PointerEvent::Move { x: 2.0, y: 0.0 },
            PointerEvent::Move { x: 2.0, y: 2.0 },
        ]);
        let origins: Vec<_> = surface.fills.iter().map(|f| (f.0, f.1)).collect();
        // The shared joint (2, 0) is stamped once per segment.
        assert_eq!(origins, vec![(0, 0), (1, 0), (2, 0), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn leaving_the_canvas_ends_the_stroke() {
        let (tracker, surface, counter) = run(&[
            PointerEvent::Down { x: 1.0, y: 1.0 },
            PointerEvent::Move { x: 2.0, y: 1.0 },
            PointerEvent::Left,
            PointerEvent::Move { x: 50.0, y: 50.0 },
            PointerEvent::Up,
        ]);
        assert_eq!(counter.value(), 1);
        assert_eq!(surface.fills.len(), 2);
        assert!(!tracker.is_capturing());
    }

    #[test]
    fn up_while_idle_is_not_a_stroke() {
        let (_, _, counter) = run(&[PointerEvent::Up, PointerEvent::Left]);
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.pending(), None);
    }

    #[test]
    fn failed_draw_keeps_the_stroke_active() {
        let mut tracker = StrokeTracker::default();
        let mut surface = FakeSurface { unavailable: true, ..Default::default() };
        let mut counter = ChangeCounter::new();

        tracker
            .handle(PointerEvent::Down { x: 0.0, y: 0.0 }, &mut surface, &mut counter)
            .unwrap();
        let err = tracker
            .handle(PointerEvent::Move { x: 2.0, y: 0.0 }, &mut surface, &mut counter)
            .unwrap_err();
        assert!(matches!(err, PaintError::SurfaceUnavailable(_)));
        assert_eq!(tracker.previous(), Some(Point::new(0, 0)));

        // Context is back: the next move redraws the whole span.
        surface.unavailable = false;
        tracker
            .handle(PointerEvent::Move { x: 2.0, y: 0.0 }, &mut surface, &mut counter)
            .unwrap();
        assert_eq!(surface.fills.len(), 3);
        assert_eq!(tracker.previous(), Some(Point::new(2, 0)));
    }

    #[test]
    fn far_off_canvas_segment_draws_across_instead_of_panicking() {
        let mut tracker = StrokeTracker::default();
        let mut canvas = Canvas::new();
        let mut counter = ChangeCounter::new();

        tracker
            .handle(PointerEvent::Down { x: -3.0e9, y: 0.0 }, &mut canvas, &mut counter)
            .unwrap();
        tracker
            .handle(PointerEvent::Move { x: 3.0e9, y: 0.0 }, &mut canvas, &mut counter)
            .unwrap();
        tracker.handle(PointerEvent::Up, &mut canvas, &mut counter).unwrap();

        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(599, 1), Some(Color::BLACK));
        assert_eq!(canvas.pixel(300, 2), Some(Color::WHITE));
        assert_eq!(counter.value(), 1);
    }

    #[test]
    fn brush_size_is_at_least_one() {
        assert_eq!(StrokeTracker::new(0).brush(), 1);
        let mut tracker = StrokeTracker::new(5);
        let mut surface = FakeSurface::default();
        let mut counter = ChangeCounter::new();
        tracker
            .handle(PointerEvent::Down { x: 0.0, y: 0.0 }, &mut surface, &mut counter)
            .unwrap();
        tracker
            .handle(PointerEvent::Move { x: 0.0, y: 0.0 }, &mut surface, &mut counter)
            .unwrap();
        assert_eq!(surface.fills, vec![(0, 0, 5, 5)]);
    }
}
