// Line rasterization: turns two pixel positions into the run of pixels between them.

use crate::types::Point;

/// Lazily walk the 1-pixel-wide line from `begin` to `end`, both inclusive.
///
/// Integer-only Bresenham with a symmetric error term. The iterator yields
/// exactly `max(|dx|, |dy|) + 1` points and every consecutive pair touches
/// (8-connected). `Line` is `Clone`, so a copy taken before iterating replays
/// the same sequence.
pub fn rasterize(begin: Point, end: Point) -> Line {
    // i64 so that any two i32 points (and the error term) fit.
    let dx = (end.x as i64 - begin.x as i64).abs();
    let dy = (end.y as i64 - begin.y as i64).abs();
    // A zero delta steps by -1; the guard on that axis never fires, so it stays inert.
    let sx = if begin.x < end.x { 1 } else { -1 };
    let sy = if begin.y < end.y { 1 } else { -1 };
    let err = (if dx > dy { dx } else { -dy }) / 2;

    Line {
        cursor: begin,
        end,
        dx,
        dy,
        sx,
        sy,
        err,
        done: false,
    }
}

/// Iterator returned by [`rasterize`].
#[derive(Debug, Clone)]
pub struct Line {
    cursor: Point,
    end: Point,
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

impl Iterator for Line {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }

        let current = self.cursor;
        if current == self.end {
            self.done = true;
            return Some(current);
        }

        let e2 = self.err;
        if e2 > -self.dx {
            self.err -= self.dy;
            self.cursor.x += self.sx;
        }
        if e2 < self.dy {
            self.err += self.dx;
            self.cursor.y += self.sy;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // Chebyshev distance shrinks by exactly one per step.
        let rest = (self.end.x as i64 - self.cursor.x as i64)
            .abs()
            .max((self.end.y as i64 - self.cursor.y as i64).abs())
            + 1;
        let rest = usize::try_from(rest).unwrap_or(usize::MAX);
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Line {}

impl std::iter::FusedIterator for Line {}
