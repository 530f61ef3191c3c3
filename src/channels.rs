// I/O channels around the image bridge: download, save/open, clipboard, share.
// Each one only ever sees an `ImageBlob` going out or an `ImageSource` coming in.

use crate::bridge::{self, ImageBlob, ImageSource};
use crate::error::{PaintError, Result};
use arboard::{Clipboard, ImageData};
use image::RgbaImage;
use log::info;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

pub const DOWNLOAD_NAME: &str = "image.png";
pub const SHARE_NAME: &str = "paint.png";

/// First free `image.png`, `image (1).png`, `image (2).png`, ... in `dir`.
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (file_name, String::new()),
    };
    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Drop the blob into `dir` under a fresh download name.
pub fn download(blob: &ImageBlob, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = unique_path(dir, DOWNLOAD_NAME);
    fs::write(&path, blob.as_bytes())?;
    info!("downloaded {} bytes to {}", blob.len(), path.display());
    Ok(path)
}

/// Write (or overwrite) `path` with the blob.
pub fn save_file(blob: &ImageBlob, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, blob.as_bytes())?;
    info!("saved {} bytes to {}", blob.len(), path.display());
    Ok(())
}

pub fn open_file(path: impl Into<PathBuf>) -> ImageSource {
    ImageSource::File(path.into())
}

/// A file handed to the platform's share target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFile {
    pub name: &'static str,
    pub mime: &'static str,
    pub path: PathBuf,
}

/// Materialize the blob as `paint.png` under `dir` for sharing.
pub fn share(blob: &ImageBlob, dir: &Path) -> Result<SharedFile> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SHARE_NAME);
    fs::write(&path, blob.as_bytes())?;
    info!("shared {} as {}", SHARE_NAME, path.display());
    Ok(SharedFile {
        name: SHARE_NAME,
        mime: blob.mime(),
        path,
    })
}

/// Put the canvas image on the system clipboard.
pub fn copy_to_clipboard(blob: &ImageBlob) -> Result<()> {
    // The clipboard wants raw RGBA, not PNG.
    let pixels = bridge::decode(ImageSource::Bytes(blob.as_bytes().to_vec()))
        .map_err(|e| PaintError::Clipboard(e.to_string()))?;
    let (w, h) = pixels.dimensions();
    let data = ImageData {
        width: w as usize,
        height: h as usize,
        bytes: Cow::Owned(pixels.into_raw()),
    };

    let mut clipboard = Clipboard::new().map_err(|e| PaintError::Clipboard(e.to_string()))?;
    clipboard
        .set_image(data)
        .map_err(|e| PaintError::Clipboard(e.to_string()))?;
    info!("copied {w}x{h} image to clipboard");
    Ok(())
}

/// Fetch an image from the system clipboard.
pub fn paste_from_clipboard() -> Result<ImageSource> {
    let mut clipboard = Clipboard::new().map_err(|e| PaintError::Clipboard(e.to_string()))?;
    let data = clipboard
        .get_image()
        .map_err(|e| PaintError::Clipboard(e.to_string()))?;
    let pixels = RgbaImage::from_raw(data.width as u32, data.height as u32, data.bytes.into_owned())
        .ok_or_else(|| PaintError::ImageDecode("clipboard image has a bad size".into()))?;
    Ok(ImageSource::Pixels(pixels))
}
