//! Event and slot authoring model plus the schedule validator.
//!
//! Drafts keep the raw form strings so half-filled forms stay representable.
//! [`validate_schedule`] is pure: callers re-run it after every edit and gate
//! submission on [`ScheduleReport::can_submit`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::time_window::{is_before, parse_instant, TimeWindow};

/// Degree cohorts a slot can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Degree {
    /// Bachelor of Technology.
    Btech,
    /// Master of Technology.
    Mtech,
    /// Master of Business Administration.
    Mba,
    /// Bachelor of Computer Applications.
    Bca,
    /// Master of Computer Applications.
    Mca,
    /// Bachelor of Science.
    Bsc,
    /// Master of Science.
    Msc,
    /// Any other programme.
    Other,
}

/// Every selectable degree, in display order.
pub const DEGREE_OPTIONS: [Degree; 8] = [
    Degree::Btech,
    Degree::Mtech,
    Degree::Mba,
    Degree::Bca,
    Degree::Mca,
    Degree::Bsc,
    Degree::Msc,
    Degree::Other,
];

impl Degree {
    /// Upper-case wire label (e.g. `BTECH`).
    pub fn label(self) -> &'static str {
        match self {
            Degree::Btech => "BTECH",
            Degree::Mtech => "MTECH",
            Degree::Mba => "MBA",
            Degree::Bca => "BCA",
            Degree::Mca => "MCA",
            Degree::Bsc => "BSC",
            Degree::Msc => "MSC",
            Degree::Other => "OTHER",
        }
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a degree label is not one of [`DEGREE_OPTIONS`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown degree '{0}'")]
pub struct UnknownDegree(pub String);

impl FromStr for Degree {
    type Err = UnknownDegree;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DEGREE_OPTIONS
            .iter()
            .copied()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownDegree(s.to_string()))
    }
}

// An unselected degree arrives as "" from the form.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Degree>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => label.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Event-level fields of the authoring form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDraft {
    /// Event title; must be non-blank.
    pub title: String,
    /// Raw start time as typed.
    pub start_time: String,
    /// Raw end time as typed.
    pub end_time: String,
}

impl EventDraft {
    /// Parsed event window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_raw(&self.start_time, &self.end_time)
    }
}

/// One degree/semester slot of the authoring form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotDraft {
    /// Selected degree, if any.
    #[serde(deserialize_with = "blank_as_none")]
    pub degree: Option<Degree>,
    /// Optional free-form semester; never validated.
    pub semester: String,
    /// Raw slot start time.
    pub start_time: String,
    /// Raw slot end time.
    pub end_time: String,
}

impl SlotDraft {
    /// Parsed slot window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_raw(&self.start_time, &self.end_time)
    }
}

/// A single validation failure. `Display` yields the exact user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleDiagnostic {
    /// Title is blank.
    #[error("Event title is required.")]
    TitleRequired,
    /// Event start is empty.
    #[error("Event start time is required.")]
    EventStartRequired,
    /// Event start is not a date-time.
    #[error("Event start time is not a valid date-time.")]
    EventStartInvalid,
    /// Event end is empty.
    #[error("Event end time is required.")]
    EventEndRequired,
    /// Event end is not a date-time.
    #[error("Event end time is not a valid date-time.")]
    EventEndInvalid,
    /// Event end is at or before its start.
    #[error("Event end time must be after start time.")]
    EventEndNotAfterStart,
    /// The form has no slots.
    #[error("At least one slot is required.")]
    NoSlots,
    /// Slot has no degree.
    #[error("Slot {slot}: degree is required.")]
    SlotDegreeRequired {
        /// 1-based slot number.
        slot: usize,
    },
    /// Slot start is empty.
    #[error("Slot {slot}: start time is required.")]
    SlotStartRequired {
        /// 1-based slot number.
        slot: usize,
    },
    /// Slot start is not a date-time.
    #[error("Slot {slot}: start time is not a valid date-time.")]
    SlotStartInvalid {
        /// 1-based slot number.
        slot: usize,
    },
    /// Slot end is empty.
    #[error("Slot {slot}: end time is required.")]
    SlotEndRequired {
        /// 1-based slot number.
        slot: usize,
    },
    /// Slot end is not a date-time.
    #[error("Slot {slot}: end time is not a valid date-time.")]
    SlotEndInvalid {
        /// 1-based slot number.
        slot: usize,
    },
    /// Slot end is at or before its start.
    #[error("Slot {slot}: end time must be after start time.")]
    SlotEndNotAfterStart {
        /// 1-based slot number.
        slot: usize,
    },
    /// Slot opens before the event does.
    #[error("Slot {slot}: starts before event starts.")]
    SlotStartsBeforeEvent {
        /// 1-based slot number.
        slot: usize,
    },
    /// Slot closes after the event does.
    #[error("Slot {slot}: ends after event ends.")]
    SlotEndsAfterEvent {
        /// 1-based slot number.
        slot: usize,
    },
}

impl ScheduleDiagnostic {
    /// 1-based slot number for slot-level diagnostics.
    pub fn slot(&self) -> Option<usize> {
        match *self {
            ScheduleDiagnostic::SlotDegreeRequired { slot }
            | ScheduleDiagnostic::SlotStartRequired { slot }
            | ScheduleDiagnostic::SlotStartInvalid { slot }
            | ScheduleDiagnostic::SlotEndRequired { slot }
            | ScheduleDiagnostic::SlotEndInvalid { slot }
            | ScheduleDiagnostic::SlotEndNotAfterStart { slot }
            | ScheduleDiagnostic::SlotStartsBeforeEvent { slot }
            | ScheduleDiagnostic::SlotEndsAfterEvent { slot } => Some(slot),
            _ => None,
        }
    }

    /// True for the two containment rules.
    pub fn is_containment(&self) -> bool {
        matches!(
            self,
            ScheduleDiagnostic::SlotStartsBeforeEvent { .. }
                | ScheduleDiagnostic::SlotEndsAfterEvent { .. }
        )
    }
}

/// Diagnostics from one validator run, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    /// Event-level diagnostics.
    pub event: Vec<ScheduleDiagnostic>,
    /// Slot-level diagnostics, slots in input order.
    pub slots: Vec<ScheduleDiagnostic>,
}

impl ScheduleReport {
    /// Submission is allowed only when both sequences are empty.
    pub fn can_submit(&self) -> bool {
        self.event.is_empty() && self.slots.is_empty()
    }

    /// Rendered event-level messages.
    pub fn event_messages(&self) -> Vec<String> {
        self.event.iter().map(ToString::to_string).collect()
    }

    /// Rendered slot-level messages.
    pub fn slot_messages(&self) -> Vec<String> {
        self.slots.iter().map(ToString::to_string).collect()
    }

    /// Diagnostics attached to one 1-based slot number.
    pub fn for_slot(&self, slot: usize) -> impl Iterator<Item = &ScheduleDiagnostic> {
        self.slots.iter().filter(move |d| d.slot() == Some(slot))
    }
}

enum TimeField {
    Missing,
    Invalid,
    Valid(NaiveDateTime),
}

impl TimeField {
    fn read(raw: &str) -> Self {
        if raw.trim().is_empty() {
            TimeField::Missing
        } else {
            parse_instant(raw).map_or(TimeField::Invalid, TimeField::Valid)
        }
    }

    fn value(&self) -> Option<NaiveDateTime> {
        match self {
            TimeField::Valid(dt) => Some(*dt),
            _ => None,
        }
    }
}

/// At least one slot must exist.
pub fn has_minimum_slots(slots: &[SlotDraft]) -> bool {
    !slots.is_empty()
}

/// Validates an event and its slots.
///
/// Every rule runs; a slot can carry several diagnostics at once. Semester is
/// never checked.
pub fn validate_schedule(event: &EventDraft, slots: &[SlotDraft]) -> ScheduleReport {
    let mut report = ScheduleReport::default();

    if event.title.trim().is_empty() {
        report.event.push(ScheduleDiagnostic::TitleRequired);
    }

    let event_start = TimeField::read(&event.start_time);
    match event_start {
        TimeField::Missing => report.event.push(ScheduleDiagnostic::EventStartRequired),
        TimeField::Invalid => report.event.push(ScheduleDiagnostic::EventStartInvalid),
        TimeField::Valid(_) => {}
    }

    let event_end = TimeField::read(&event.end_time);
    match event_end {
        TimeField::Missing => report.event.push(ScheduleDiagnostic::EventEndRequired),
        TimeField::Invalid => report.event.push(ScheduleDiagnostic::EventEndInvalid),
        TimeField::Valid(_) => {}
    }

    let event_window = TimeWindow::new(event_start.value(), event_end.value());
    if !event_window.is_well_ordered() {
        report.event.push(ScheduleDiagnostic::EventEndNotAfterStart);
    }

    if !has_minimum_slots(slots) {
        report.slots.push(ScheduleDiagnostic::NoSlots);
    }

    for (index, slot_draft) in slots.iter().enumerate() {
        check_slot(index + 1, slot_draft, &event_window, &mut report.slots);
    }

    report
}

fn check_slot(
    slot: usize,
    draft: &SlotDraft,
    event_window: &TimeWindow,
    out: &mut Vec<ScheduleDiagnostic>,
) {
    if draft.degree.is_none() {
        out.push(ScheduleDiagnostic::SlotDegreeRequired { slot });
    }

    let start = TimeField::read(&draft.start_time);
    match start {
        TimeField::Missing => out.push(ScheduleDiagnostic::SlotStartRequired { slot }),
        TimeField::Invalid => out.push(ScheduleDiagnostic::SlotStartInvalid { slot }),
        TimeField::Valid(_) => {}
    }

    let end = TimeField::read(&draft.end_time);
    match end {
        TimeField::Missing => out.push(ScheduleDiagnostic::SlotEndRequired { slot }),
        TimeField::Invalid => out.push(ScheduleDiagnostic::SlotEndInvalid { slot }),
        TimeField::Valid(_) => {}
    }

    let window = TimeWindow::new(start.value(), end.value());
    if !window.is_well_ordered() {
        out.push(ScheduleDiagnostic::SlotEndNotAfterStart { slot });
    }

    if is_before(window.start, event_window.start) {
        out.push(ScheduleDiagnostic::SlotStartsBeforeEvent { slot });
    }
    if is_before(event_window.end, window.end) {
        out.push(ScheduleDiagnostic::SlotEndsAfterEvent { slot });
    }
}

/// Errors from editing or submitting an [`EventForm`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Slot index is past the end of the list.
    #[error("slot {index} does not exist")]
    NoSuchSlot {
        /// 0-based index that was requested.
        index: usize,
    },
    /// Removing the slot would leave the form without any.
    #[error("at least one slot must remain")]
    LastSlot,
    /// The form still has diagnostics.
    #[error("Please fix the form errors before creating the event.")]
    NotSubmittable(ScheduleReport),
}

/// Slot as sent to the create-event call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPayload {
    /// Cohort degree.
    pub degree: Degree,
    /// Trimmed semester, possibly empty.
    pub semester: String,
    /// Raw start time, passed through.
    pub start_time: String,
    /// Raw end time, passed through.
    pub end_time: String,
}

/// Body of the create-event call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    /// Trimmed title.
    pub title: String,
    /// Raw event start time.
    pub start_time: String,
    /// Raw event end time.
    pub end_time: String,
    /// Slots in authoring order.
    pub slots: Vec<SlotPayload>,
}

/// The authoring session: event fields plus an ordered slot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventForm {
    /// Event-level fields.
    #[serde(flatten)]
    pub event: EventDraft,
    /// Slots in authoring order.
    #[serde(default)]
    pub slots: Vec<SlotDraft>,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            event: EventDraft::default(),
            slots: vec![SlotDraft::default()],
        }
    }
}

impl EventForm {
    /// Runs the validator over the current form contents.
    pub fn report(&self) -> ScheduleReport {
        validate_schedule(&self.event, &self.slots)
    }

    /// Appends an empty slot.
    pub fn add_slot(&mut self) {
        self.slots.push(SlotDraft::default());
    }

    /// Appends a copy of the slot at `index`, window included.
    pub fn duplicate_slot(&mut self, index: usize) -> Result<(), DraftError> {
        let copy = self
            .slots
            .get(index)
            .cloned()
            .ok_or(DraftError::NoSuchSlot { index })?;
        self.slots.push(copy);
        Ok(())
    }

    /// Removes the slot at `index`, refusing to drop the last one.
    pub fn remove_slot(&mut self, index: usize) -> Result<SlotDraft, DraftError> {
        if index >= self.slots.len() {
            return Err(DraftError::NoSuchSlot { index });
        }
        if self.slots.len() == 1 {
            return Err(DraftError::LastSlot);
        }
        Ok(self.slots.remove(index))
    }

    /// Mutable access to one slot for field edits.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut SlotDraft> {
        self.slots.get_mut(index)
    }

    /// Clears every field back to a single empty slot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Builds the submission body, or returns the outstanding diagnostics.
    pub fn to_payload(&self) -> Result<EventPayload, DraftError> {
        let report = self.report();
        if !report.can_submit() {
            return Err(DraftError::NotSubmittable(report));
        }

        let mut slots = Vec::with_capacity(self.slots.len());
        for (index, slot) in self.slots.iter().enumerate() {
            // A clean report guarantees a degree on every slot.
            let degree = slot.degree.ok_or(DraftError::NoSuchSlot { index })?;
            slots.push(SlotPayload {
                degree,
                semester: slot.semester.trim().to_string(),
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
            });
        }

        Ok(EventPayload {
            title: self.event.title.trim().to_string(),
            start_time: self.event.start_time.clone(),
            end_time: self.event.end_time.clone(),
            slots,
        })
    }
}
