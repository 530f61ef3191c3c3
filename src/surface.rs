// The canvas surface: a fixed-size pixel grid with a current fill color.
// Visual: whatever lives in `Canvas::frame()` is exactly what the window shows.

use crate::bridge::{self, ImageBlob};
use crate::error::{PaintError, Result};
use crate::types::{Color, FrameBuffer};
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH};
use image::RgbaImage;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

/// Drawing capability the stroke tracker and the image bridge talk to.
///
/// Every operation applies immediately; there is no batching or damage tracking.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn set_color(&mut self, color: Color) -> Result<()>;

    /// Fill `w × h` pixels at (x, y) with the current color, clipped to the surface.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Overlay `image` with its top-left corner at (x, y). Pixels outside the
    /// image are left alone; transparent image pixels let the canvas show through.
    fn draw_image_at(&mut self, image: &RgbaImage, x: i32, y: i32) -> Result<()>;

    /// Copy of the current pixels as RGBA.
    fn snapshot(&self) -> Result<RgbaImage>;

    /// White background, black pen.
    fn clear(&mut self) -> Result<()> {
        self.set_color(Color::WHITE)?;
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0, 0, w, h)?;
        self.set_color(Color::BLACK)
    }

    /// Encode the current pixels as PNG.
    fn read_back(&self) -> Result<ImageBlob> {
        bridge::encode_png(&self.snapshot()?)
    }
}

/// Source-over blend of one channel; `alpha` in 0..=255.
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let v = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((v + 1 + (v >> 8)) >> 8) as u8
}

#[inline]
fn blend(src: Color, dst: u32) -> u32 {
    match src.a {
        255 => src.to_u32(),
        0 => dst,
        a => {
            let d = Color::from_u32(dst);
            let a = a as u16;
            Color::rgb(
                blend_channel(src.r, d.r, a),
                blend_channel(src.g, d.g, a),
                blend_channel(src.b, d.b, a),
            )
            .to_u32()
        }
    }
}

/// In-memory canvas: the pixel buffer the window presents every frame.
pub struct Canvas {
    frame: FrameBuffer,
    color: Color,
}

impl Canvas {
    /// The startup canvas: 600×480, filled white, pen black.
    pub fn new() -> Self {
        Self::with_size(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    pub(crate) fn with_size(width: u32, height: u32) -> Self {
        Self {
            frame: FrameBuffer::filled(width as usize, height as usize, Color::WHITE),
            color: Color::BLACK,
        }
    }

    /// Current fill color.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.frame.get(x, y)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.frame.width as u32
    }

    fn height(&self) -> u32 {
        self.frame.height as u32
    }

    fn set_color(&mut self, color: Color) -> Result<()> {
        self.color = color;
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        // Clip in i64 so huge rectangles can't overflow.
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + w as i64).min(self.frame.width as i64);
        let y1 = (y as i64 + h as i64).min(self.frame.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let stride = self.frame.width;
        for row in y0 as usize..y1 as usize {
            let line = &mut self.frame.pixels[row * stride + x0 as usize..row * stride + x1 as usize];
            for px in line {
                *px = blend(self.color, *px);
            }
        }
        Ok(())
    }

    fn draw_image_at(&mut self, image: &RgbaImage, x: i32, y: i32) -> Result<()> {
        for (ix, iy, px) in image.enumerate_pixels() {
            let (cx, cy) = (x as i64 + ix as i64, y as i64 + iy as i64);
            if cx < 0 || cy < 0 || cx > i32::MAX as i64 || cy > i32::MAX as i64 {
                continue;
            }
            if let Some(idx) = self.frame.index(cx as i32, cy as i32) {
                let [r, g, b, a] = px.0;
                self.frame.pixels[idx] = blend(Color::rgba(r, g, b, a), self.frame.pixels[idx]);
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<RgbaImage> {
        let (w, h) = (self.width(), self.height());
        let mut out = Vec::with_capacity(self.frame.pixels.len() * 4);
        for &px in &self.frame.pixels {
            let c = Color::from_u32(px);
            out.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
        RgbaImage::from_raw(w, h, out)
            .ok_or_else(|| PaintError::ExportEncode("pixel buffer size mismatch".into()))
    }
}

/// Shared handle that serializes access to one surface.
///
/// Only one caller can hold the drawing context at a time; a second request
/// while it is held fails with `SurfaceUnavailable` instead of tearing pixels.
pub struct SurfaceHandle<S> {
    inner: Rc<RefCell<S>>,
    width: u32,
    height: u32,
}

impl<S> Clone for SurfaceHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            width: self.width,
            height: self.height,
        }
    }
}

impl<S: Surface> SurfaceHandle<S> {
    pub fn new(surface: S) -> Self {
        let (width, height) = (surface.width(), surface.height());
        Self {
            inner: Rc::new(RefCell::new(surface)),
            width,
            height,
        }
    }

    /// Acquire the drawing context.
    pub fn context(&self) -> Result<RefMut<'_, S>> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| PaintError::SurfaceUnavailable("drawing context is busy".into()))
    }

    fn with<T>(&self, f: impl FnOnce(&S) -> Result<T>) -> Result<T> {
        let surface = self
            .inner
            .try_borrow()
            .map_err(|_| PaintError::SurfaceUnavailable("drawing context is busy".into()))?;
        f(&*surface)
    }
}

impl<S: Surface> Surface for SurfaceHandle<S> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_color(&mut self, color: Color) -> Result<()> {
        self.context()?.set_color(color)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.context()?.fill_rect(x, y, w, h)
    }

    fn draw_image_at(&mut self, image: &RgbaImage, x: i32, y: i32) -> Result<()> {
        self.context()?.draw_image_at(image, x, y)
    }

    fn snapshot(&self) -> Result<RgbaImage> {
        self.with(|s| s.snapshot())
    }

    fn clear(&mut self) -> Result<()> {
        self.context()?.clear()
    }
}
