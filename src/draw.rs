// Window + input plumbing.
// Visual effects provided here:
// 1) A window that shows the canvas pixels 1:1.
// 2) Mouse state turned into pointer down/move/up/left events for the stroke tracker.
// 3) The unsaved-changes badge, shown in the title bar.

use crate::counter::Badge;
use crate::error::{PaintError, Result};
use crate::stroke::PointerEvent;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// Keyboard commands understood by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewCanvas,
    Copy,
    Paste,
    Save,
    Open,
    Download,
    Share,
    /// Palette slot 1..=9.
    Palette(usize),
}

const PALETTE_KEYS: [Key; 9] = [
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7,
    Key::Key8,
    Key::Key9,
];

/// Mouse state as seen in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// Position over the canvas, `None` when the pointer is outside the window.
    pub pos: Option<(f32, f32)>,
    pub down: bool,
}

/// Diffs successive mouse samples into pointer events.
#[derive(Debug, Default)]
pub struct PointerInput {
    last: PointerSample,
}

impl PointerInput {
    /// `capturing` is whether a stroke currently holds the pointer. Only then
    /// are releases and exits reported, wherever the pointer happens to be.
    pub fn poll(&mut self, next: PointerSample, capturing: bool) -> Vec<PointerEvent> {
        let prev = std::mem::replace(&mut self.last, next);
        let mut events = Vec::new();

        if next.down && !prev.down {
            // A press that starts outside the canvas never opens a stroke.
            if let Some((x, y)) = next.pos {
                events.push(PointerEvent::Down { x, y });
            }
        } else if capturing {
            if !next.down {
                events.push(PointerEvent::Up);
            } else {
                match next.pos {
                    None => events.push(PointerEvent::Left),
                    Some((x, y)) if prev.pos != next.pos => {
                        events.push(PointerEvent::Move { x, y })
                    }
                    Some(_) => {}
                }
            }
        }
        events
    }
}

pub struct Drawer {
    window: Window, // the on-screen window you see
    title: String,
}

impl Drawer {
    /// Create a window sized to the canvas.
    /// Visual: a new window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| PaintError::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self {
            window,
            title: title.to_string(),
        })
    }

    /// Push the canvas pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| PaintError::WindowUpdate(e.to_string()))
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current mouse state. Positions outside the window are discarded.
    pub fn sample(&self) -> PointerSample {
        PointerSample {
            pos: self.window.get_mouse_pos(MouseMode::Discard),
            down: self.window.get_mouse_down(MouseButton::Left),
        }
    }

    fn pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Commands triggered this frame.
    pub fn commands(&self) -> Vec<Command> {
        let ctrl = self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl);
        let mut out = Vec::new();

        if ctrl {
            for (key, cmd) in [
                (Key::C, Command::Copy),
                (Key::V, Command::Paste),
                (Key::S, Command::Save),
                (Key::O, Command::Open),
            ] {
                if self.pressed(key) {
                    out.push(cmd);
                }
            }
            return out;
        }

        for (key, cmd) in [
            (Key::N, Command::NewCanvas),
            (Key::D, Command::Download),
            (Key::H, Command::Share),
        ] {
            if self.pressed(key) {
                out.push(cmd);
            }
        }
        for (i, key) in PALETTE_KEYS.iter().enumerate() {
            if self.pressed(*key) {
                out.push(Command::Palette(i + 1));
            }
        }
        out
    }
}

impl Badge for Drawer {
    fn set(&mut self, count: u32) -> Result<()> {
        self.window.set_title(&format!("{} ({count})", self.title));
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.window.set_title(&self.title);
        Ok(())
    }
}
