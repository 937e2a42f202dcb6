use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{PinchContact, RulerId, Tick};

/// Maximum number of simultaneous touch contacts tracked; further contacts are ignored.
pub const MAX_TOUCH_CONTACTS: usize = 2;

/// Which pointer kind a ruler hit test is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTolerance {
    Mouse,
    Touch,
}

/// Host-assigned identifier of one touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(u64);

impl ContactId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One finger on the surface, with the time that was under it at touch-down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchContact {
    pub id: ContactId,
    pub down_time: Tick,
    pub down_position: f64,
    pub position: f64,
}

impl TouchContact {
    #[must_use]
    pub fn new(id: ContactId, down_time: Tick, down_position: f64) -> Self {
        Self {
            id,
            down_time,
            down_position,
            position: down_position,
        }
    }

    #[must_use]
    pub fn pinch_contact(self) -> PinchContact {
        PinchContact {
            down_time: self.down_time,
            down_position: self.down_position,
            position: self.position,
        }
    }
}

/// Snapshot taken when a mouse drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub down_x: f64,
    pub start_on_down: Tick,
    pub end_on_down: Tick,
}

/// Ruler grabbed by the current gesture and where it was when grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulerGrab {
    pub ruler: RulerId,
    pub location_on_down: Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureMode {
    Idle,
    Panning,
    DraggingRuler,
    Pinching,
}

/// Pointer and touch gesture state between host input callbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    drag: Option<DragState>,
    grab: Option<RulerGrab>,
    contacts: SmallVec<[TouchContact; MAX_TOUCH_CONTACTS]>,
}

impl GestureState {
    #[must_use]
    pub fn mode(&self) -> GestureMode {
        if self.grab.is_some() && (self.drag.is_some() || !self.contacts.is_empty()) {
            return GestureMode::DraggingRuler;
        }
        match (self.drag.is_some(), self.contacts.len()) {
            (_, 2..) => GestureMode::Pinching,
            (true, _) | (false, 1) => GestureMode::Panning,
            (false, _) => GestureMode::Idle,
        }
    }

    #[must_use]
    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    #[must_use]
    pub fn grab(&self) -> Option<RulerGrab> {
        self.grab
    }

    #[must_use]
    pub fn selected_ruler(&self) -> Option<RulerId> {
        self.grab.map(|grab| grab.ruler)
    }

    pub fn grab_ruler(&mut self, ruler: RulerId, location_on_down: Tick) {
        self.grab = Some(RulerGrab {
            ruler,
            location_on_down,
        });
    }

    /// Drops the ruler selection; returns the ruler that was selected.
    pub fn release_ruler(&mut self) -> Option<RulerId> {
        self.grab.take().map(|grab| grab.ruler)
    }

    pub fn begin_drag(&mut self, down_x: f64, start_on_down: Tick, end_on_down: Tick) {
        self.drag = Some(DragState {
            down_x,
            start_on_down,
            end_on_down,
        });
    }

    pub fn end_drag(&mut self) -> Option<DragState> {
        self.drag.take()
    }

    #[must_use]
    pub fn contacts(&self) -> &[TouchContact] {
        &self.contacts
    }

    /// Starts tracking `contact`; returns `false` when it is ignored.
    ///
    /// A contact is ignored when its id is already tracked or when
    /// [`MAX_TOUCH_CONTACTS`] contacts are down.
    pub fn add_contact(&mut self, contact: TouchContact) -> bool {
        if self.contacts.len() >= MAX_TOUCH_CONTACTS || self.contact_index(contact.id).is_some() {
            return false;
        }
        self.contacts.push(contact);
        true
    }

    /// Records the current position of a tracked contact.
    pub fn move_contact(&mut self, id: ContactId, position: f64) -> Option<TouchContact> {
        let index = self.contact_index(id)?;
        let contact = &mut self.contacts[index];
        contact.position = position;
        Some(*contact)
    }

    pub fn remove_contact(&mut self, id: ContactId) -> Option<TouchContact> {
        let index = self.contact_index(id)?;
        Some(self.contacts.remove(index))
    }

    /// Forgets every drag, contact and ruler selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn contact_index(&self, id: ContactId) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id == id)
    }
}
