// Image bridge: the only place pixels cross into or out of the canvas.
// Export encodes the surface as PNG; import decodes a source and overlays it at (0,0).

use crate::error::{PaintError, Result};
use crate::surface::Surface;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use std::fmt;
use std::fs;
use std::io::{Cursor, Read};
use std::path::PathBuf;

pub const PNG_MIME: &str = "image/png";

/// Largest stream we are willing to read for an import (~15 MB).
pub const MAX_IMPORT_BYTES: u64 = 1024 * 15 * 1000;

/// Encoded PNG payload handed to download, clipboard, share and save channels.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime(&self) -> &'static str {
        PNG_MIME
    }

    /// `data:image/png;base64,...`
    pub fn to_data_url(&self) -> String {
        format!("data:{PNG_MIME};base64,{}", STANDARD.encode(&self.bytes))
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob").field("len", &self.bytes.len()).finish()
    }
}

/// Where an import comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Already-loaded encoded bytes (paste, drag payloads).
    Bytes(Vec<u8>),
    /// A file on disk (open dialog, launch argument).
    File(PathBuf),
    /// `data:<mime>;base64,<payload>`
    DataUrl(String),
    /// Pixels that arrived already decoded (clipboard images).
    Pixels(RgbaImage),
}

impl ImageSource {
    /// Drain a byte stream into a source, refusing anything over [`MAX_IMPORT_BYTES`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .take(MAX_IMPORT_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| PaintError::ImageDecode(format!("read stream: {e}")))?;
        if bytes.len() as u64 > MAX_IMPORT_BYTES {
            return Err(PaintError::ImageDecode(format!(
                "stream exceeds {MAX_IMPORT_BYTES} bytes"
            )));
        }
        Ok(Self::Bytes(bytes))
    }
}

fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| PaintError::ImageDecode("not a data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| PaintError::ImageDecode("data URL has no payload".into()))?;
    if !header.ends_with(";base64") {
        return Err(PaintError::ImageDecode("only base64 data URLs are supported".into()));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| PaintError::ImageDecode(format!("base64: {e}")))
}

/// PNG-encode raw RGBA pixels.
pub fn encode_png(pixels: &RgbaImage) -> Result<ImageBlob> {
    let mut out = Cursor::new(Vec::new());
    pixels
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| PaintError::ExportEncode(e.to_string()))?;
    let blob = ImageBlob { bytes: out.into_inner() };
    debug!(
        "encoded {}x{} canvas into {} bytes",
        pixels.width(),
        pixels.height(),
        blob.len()
    );
    Ok(blob)
}

/// Export: read the whole surface back as a PNG blob.
pub fn to_blob<S: Surface + ?Sized>(surface: &S) -> Result<ImageBlob> {
    surface.read_back()
}

/// Decode any supported image source into RGBA pixels.
pub fn decode(source: ImageSource) -> Result<RgbaImage> {
    let bytes = match source {
        ImageSource::Pixels(pixels) => return Ok(pixels),
        ImageSource::Bytes(bytes) => bytes,
        ImageSource::File(path) => fs::read(&path)
            .map_err(|e| PaintError::ImageDecode(format!("{}: {e}", path.display())))?,
        ImageSource::DataUrl(url) => decode_data_url(&url)?,
    };
    let img = image::load_from_memory(&bytes)
        .map_err(|e| PaintError::ImageDecode(e.to_string()))?;
    Ok(img.to_rgba8())
}

/// Import: decode `source` and overlay it at the origin.
///
/// The canvas is not cleared or resized first; a smaller or transparent image
/// leaves the existing pixels around and beneath it. On a decode failure the
/// surface is never touched.
pub fn import<S: Surface + ?Sized>(surface: &mut S, source: ImageSource) -> Result<(u32, u32)> {
    let pixels = decode(source)?;
    surface.draw_image_at(&pixels, 0, 0)?;
    info!("imported {}x{} image at (0,0)", pixels.width(), pixels.height());
    Ok(pixels.dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Canvas;
    use crate::types::Color;
    use image::Rgba;

    fn png_of(img: &RgbaImage) -> Vec<u8> {
        encode_png(img).unwrap().into_bytes()
    }

    #[test]
    fn blob_is_png() {
        let blob = to_blob(&Canvas::new()).unwrap();
        assert!(blob.as_bytes().starts_with(&[0x89, b'P', b'N', b'G']));
        assert_eq!(blob.mime(), "image/png");
        assert!(!blob.is_empty());
    }

    #[test]
    fn data_url_round_trips() {
        let blob = to_blob(&Canvas::with_size(3, 3)).unwrap();
        let url = blob.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let img = decode(ImageSource::DataUrl(url)).unwrap();
        assert_eq!(img.dimensions(), (3, 3));
    }

    #[test]
    fn import_overlays_at_origin_without_clearing() {
        let mut canvas = Canvas::with_size(8, 8);
        canvas.set_color(Color::rgb(0, 255, 0)).unwrap();
        canvas.fill_rect(6, 6, 2, 2).unwrap();

        let red = RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255]));
        let dims = import(&mut canvas, ImageSource::Bytes(png_of(&red))).unwrap();

        assert_eq!(dims, (3, 2));
        assert_eq!(canvas.pixel(0, 0), Some(Color::rgb(255, 0, 0)));
        assert_eq!(canvas.pixel(2, 1), Some(Color::rgb(255, 0, 0)));
        assert_eq!(canvas.pixel(3, 0), Some(Color::WHITE));
        assert_eq!(canvas.pixel(7, 7), Some(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn malformed_sources_fail_without_touching_pixels() {
        let mut canvas = Canvas::with_size(4, 4);
        canvas.fill_rect(1, 1, 1, 1).unwrap();
        let before = canvas.read_back().unwrap();

        for source in [
            ImageSource::Bytes(b"definitely not a png".to_vec()),
            ImageSource::DataUrl("data:image/png;base64,@@@".into()),
            ImageSource::DataUrl("data:text/plain,hello".into()),
            ImageSource::DataUrl("http://example.com/a.png".into()),
            ImageSource::File(PathBuf::from("/nonexistent/paint/input.png")),
        ] {
            let err = import(&mut canvas, source).unwrap_err();
            assert!(matches!(err, PaintError::ImageDecode(_)), "{err}");
        }
        assert_eq!(canvas.read_back().unwrap(), before);
    }

    #[test]
    fn pixel_sources_pass_through_untouched() {
        let img = RgbaImage::from_pixel(2, 3, Rgba([1, 2, 3, 4]));
        assert_eq!(decode(ImageSource::Pixels(img.clone())).unwrap(), img);
    }

    #[test]
    fn unencodable_surface_yields_no_blob() {
        // PNG has no zero-sized images.
        let err = to_blob(&Canvas::with_size(0, 0)).unwrap_err();
        assert!(matches!(err, PaintError::ExportEncode(_)), "{err}");
        assert!(matches!(
            encode_png(&RgbaImage::new(0, 4)),
            Err(PaintError::ExportEncode(_))
        ));
    }

    #[test]
    fn oversized_streams_are_rejected() {
        let stream = std::io::repeat(0).take(MAX_IMPORT_BYTES + 10);
        assert!(matches!(
            ImageSource::from_reader(stream),
            Err(PaintError::ImageDecode(_))
        ));

        let small = ImageSource::from_reader(&b"abc"[..]).unwrap();
        assert!(matches!(small, ImageSource::Bytes(ref b) if b == b"abc"));
    }
}
