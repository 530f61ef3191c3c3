// One painting session: a surface, the stroke tracker driving it, and the
// change counter. Every user action lands here as a single method call.

use crate::bridge::{self, ImageBlob, ImageSource};
use crate::channels::{self, SharedFile};
use crate::counter::ChangeCounter;
use crate::error::Result;
use crate::stroke::{PointerEvent, StrokeTracker};
use crate::surface::Surface;
use crate::types::Color;
use log::{info, warn};
use std::path::{Path, PathBuf};

pub struct PaintSession<S: Surface> {
    surface: S,
    tracker: StrokeTracker,
    counter: ChangeCounter,
}

impl<S: Surface> PaintSession<S> {
    /// Start on a blank canvas (white, black pen).
    pub fn new(mut surface: S, brush: u32) -> Result<Self> {
        surface.clear()?;
        Ok(Self {
            surface,
            tracker: StrokeTracker::new(brush),
            counter: ChangeCounter::new(),
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn tracker(&self) -> &StrokeTracker {
        &self.tracker
    }

    pub fn counter(&self) -> &ChangeCounter {
        &self.counter
    }

    pub fn counter_mut(&mut self) -> &mut ChangeCounter {
        &mut self.counter
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Result<()> {
        self.tracker.handle(event, &mut self.surface, &mut self.counter)
    }

    /// Color picker input, passed through as a CSS color string.
    pub fn set_color(&mut self, css: &str) -> Result<()> {
        let color = Color::parse(css)?;
        self.surface.set_color(color)?;
        info!("pen color set to {color}");
        Ok(())
    }

    /// "New canvas": blank it and forget pending changes.
    pub fn new_canvas(&mut self) -> Result<()> {
        self.surface.clear()?;
        self.counter.reset();
        info!("canvas cleared");
        Ok(())
    }

    /// Overlay an image at (0,0). Returns the imported image's size.
    pub fn import(&mut self, source: ImageSource) -> Result<(u32, u32)> {
        bridge::import(&mut self.surface, source).inspect_err(|e| warn!("import failed: {e}"))
    }

    pub fn export(&self) -> Result<ImageBlob> {
        bridge::to_blob(&self.surface)
    }

    /// Save to `path`; a successful save resets the change count.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let blob = self.export()?;
        channels::save_file(&blob, path)?;
        self.counter.reset();
        Ok(())
    }

    pub fn open(&mut self, path: &Path) -> Result<(u32, u32)> {
        self.import(channels::open_file(path))
    }

    pub fn download(&self, dir: &Path) -> Result<PathBuf> {
        channels::download(&self.export()?, dir)
    }

    pub fn share(&self, dir: &Path) -> Result<SharedFile> {
        channels::share(&self.export()?, dir)
    }

    pub fn copy(&self) -> Result<()> {
        channels::copy_to_clipboard(&self.export()?)
    }

    pub fn paste(&mut self) -> Result<(u32, u32)> {
        let source = channels::paste_from_clipboard()?;
        self.import(source)
    }
}
