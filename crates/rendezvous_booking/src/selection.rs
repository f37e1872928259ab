// --- File: crates/rendezvous_booking/src/selection.rs ---
//! Slot picking and the booking-flow state carried between the slot screen
//! and the confirmation screen.

use crate::catalog::{total_amount, ServiceCatalog, ServiceDuration, BUFFER_MINUTES};
use crate::error::BookingError;
use crate::slot::TimeSlot;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// The slots, service and price a visitor settled on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSelection {
    slots: Vec<TimeSlot>,
    service: Option<String>,
    duration: Option<ServiceDuration>,
}

impl BookingSelection {
    /// Replaces the whole selection.
    pub fn set_selected_slots(
        &mut self,
        slots: Vec<TimeSlot>,
        service: &str,
        duration: Option<ServiceDuration>,
    ) {
        self.slots = slots;
        self.service = Some(service.to_string());
        self.duration = duration;
    }

    pub fn selected_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn selected_service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn selected_duration(&self) -> Option<ServiceDuration> {
        self.duration
    }

    pub fn has_selected_slots(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn clear_selection(&mut self) {
        self.slots.clear();
        self.service = None;
        self.duration = None;
    }
}

/// Toggles offered slots in and out of a selection for one service.
#[derive(Debug, Clone)]
pub struct SlotPicker {
    service: String,
    quote: ServiceDuration,
    max_slots: Option<usize>,
    selected: Vec<TimeSlot>,
}

impl SlotPicker {
    pub fn new(
        catalog: &ServiceCatalog,
        service: &str,
        duration_minutes: Option<i64>,
    ) -> Result<Self, BookingError> {
        Ok(SlotPicker {
            service: service.to_string(),
            quote: catalog.quote(service, duration_minutes)?,
            max_slots: catalog.max_slots(service)?,
            selected: Vec::new(),
        })
    }

    pub fn quote(&self) -> ServiceDuration {
        self.quote
    }

    pub fn selected(&self) -> &[TimeSlot] {
        &self.selected
    }

    pub fn can_select_more(&self) -> bool {
        self.max_slots
            .map_or(true, |max| self.selected.len() < max)
    }

    pub fn is_selected(&self, offered: &TimeSlot) -> bool {
        self.selected.iter().any(|s| s.date == offered.date)
    }

    /// Adds or removes an offered slot; returns whether it is now selected.
    ///
    /// A newly selected slot ends `duration` minutes after its start.
    pub fn toggle(&mut self, offered: &TimeSlot) -> Result<bool, BookingError> {
        if self.is_selected(offered) {
            self.selected.retain(|s| s.date != offered.date);
            return Ok(false);
        }
        if !self.can_select_more() {
            return Err(BookingError::SelectionFull(self.max_slots.unwrap_or_default()));
        }
        if !self.quote.has_enough_duration(offered) {
            return Err(BookingError::NotEnoughTime(offered.date.to_rfc3339()));
        }

        let chosen = TimeSlot::new(
            offered.date,
            offered.date + self.quote.length(),
            &offered.summary,
        );
        if let Some(clash) = self.selected.iter().find(|s| slots_clash(s, &chosen)) {
            return Err(BookingError::OverlappingSlots(clash.date.to_rfc3339()));
        }
        self.selected.push(chosen);
        self.selected.sort_by_key(|s| s.date);
        Ok(true)
    }

    pub fn total_amount(&self) -> i64 {
        total_amount(&self.quote, self.selected.len())
    }

    /// Hands the picked slots over to the confirmation step.
    pub fn into_selection(self) -> BookingSelection {
        let mut selection = BookingSelection::default();
        selection.set_selected_slots(self.selected, &self.service, Some(self.quote));
        selection
    }
}

/// Two appointments clash when one starts inside the other's time plus buffer.
pub(crate) fn slots_clash(a: &TimeSlot, b: &TimeSlot) -> bool {
    let buffer = Duration::minutes(BUFFER_MINUTES);
    a.date < b.end + buffer && b.date < a.end + buffer
}

/// Where a single booking flow stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookingFlow {
    #[default]
    Browsing,
    SlotsChosen(BookingSelection),
    Confirmed(BookingSelection),
    Abandoned,
}

impl BookingFlow {
    pub fn state_name(&self) -> &'static str {
        match self {
            BookingFlow::Browsing => "browsing",
            BookingFlow::SlotsChosen(_) => "slots chosen",
            BookingFlow::Confirmed(_) => "confirmed",
            BookingFlow::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingFlow::Confirmed(_) | BookingFlow::Abandoned)
    }

    pub fn selection(&self) -> Option<&BookingSelection> {
        match self {
            BookingFlow::SlotsChosen(s) | BookingFlow::Confirmed(s) => Some(s),
            _ => None,
        }
    }

    /// Browsing or SlotsChosen -> SlotsChosen. The new selection replaces any previous one.
    pub fn choose(self, selection: BookingSelection) -> Result<Self, BookingError> {
        match self {
            BookingFlow::Browsing | BookingFlow::SlotsChosen(_) => {
                if !selection.has_selected_slots() {
                    return Err(BookingError::InvalidField {
                        field: "slots",
                        message: "no slot selected".to_string(),
                    });
                }
                Ok(BookingFlow::SlotsChosen(selection))
            }
            other => Err(other.invalid("choose slots")),
        }
    }

    /// SlotsChosen -> Browsing, keeping nothing.
    pub fn reselect(self) -> Result<Self, BookingError> {
        match self {
            BookingFlow::SlotsChosen(_) => Ok(BookingFlow::Browsing),
            other => Err(other.invalid("go back to browsing")),
        }
    }

    /// SlotsChosen -> Confirmed once the reservation is committed.
    pub fn confirm(self) -> Result<Self, BookingError> {
        match self {
            BookingFlow::SlotsChosen(selection) => Ok(BookingFlow::Confirmed(selection)),
            other => Err(other.invalid("confirm")),
        }
    }

    /// Drops the selection; the flow cannot be resumed.
    pub fn abandon(self) -> Result<Self, BookingError> {
        match self {
            BookingFlow::Browsing => Ok(BookingFlow::Abandoned),
            BookingFlow::SlotsChosen(mut selection) => {
                selection.clear_selection();
                Ok(BookingFlow::Abandoned)
            }
            other => Err(other.invalid("abandon")),
        }
    }

    fn invalid(&self, action: &'static str) -> BookingError {
        BookingError::InvalidTransition {
            state: self.state_name(),
            action,
        }
    }
}
