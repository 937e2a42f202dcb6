use serde::{Deserialize, Serialize};

use crate::core::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RulerId(u32);

impl RulerId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Draggable vertical marker at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruler {
    pub location: Tick,
}

impl Ruler {
    #[must_use]
    pub const fn new(location: Tick) -> Self {
        Self { location }
    }

    /// Moves the ruler inside `start..=end`; returns `true` when it moved.
    pub fn clamp_into(&mut self, start: Tick, end: Tick) -> bool {
        let clamped = self.location.clamp(start, end);
        let moved = clamped != self.location;
        self.location = clamped;
        moved
    }
}
