// Change counter: how many strokes happened since the last clear/save.
// The number is mirrored to a badge (window title) on a best-effort basis.

use crate::error::Result;
use log::{debug, warn};

/// What the badge should show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeUpdate {
    Count(u32),
    Reset,
}

/// Anything that can display the unsaved-changes count.
pub trait Badge {
    fn set(&mut self, count: u32) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// No badge capability at all: every report is a silent no-op.
pub struct NoBadge;

impl Badge for NoBadge {
    fn set(&mut self, _count: u32) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ChangeCounter {
    count: u32,
    pending: Option<BadgeUpdate>,
}

impl ChangeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u32 {
        self.count
    }

    /// One more completed stroke.
    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
        self.pending = Some(BadgeUpdate::Count(self.count));
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.pending = Some(BadgeUpdate::Reset);
    }

    /// Latest update not yet shown on a badge.
    pub fn pending(&self) -> Option<BadgeUpdate> {
        self.pending
    }

    /// Push the latest update to `badge`. Failures are logged and dropped;
    /// the counter itself is never affected by the badge.
    pub fn report(&mut self, badge: &mut dyn Badge) {
        let Some(update) = self.pending.take() else {
            return;
        };
        let result = match update {
            BadgeUpdate::Count(n) => badge.set(n),
            BadgeUpdate::Reset => badge.clear(),
        };
        match result {
            Ok(()) => debug!("badge updated: {update:?}"),
            Err(e) => warn!("badge update {update:?} failed: {e}"),
        }
    }
}
