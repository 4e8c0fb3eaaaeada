//! Core primitives for mess entry control.
//!
//! This crate provides:
//! - [`TimeWindow`] and null-safe instant comparisons
//! - The event/slot schedule validator and authoring form
//! - Token identifier extraction from scanner payloads
//! - Token lifecycle classification
//! - The gate verification session state machine
//!
//! Core invariants:
//! - Nothing here performs I/O; the remote service is an external collaborator
//! - Extraction and classification are total functions
//! - Validation is recomputed from scratch on every call
//!
#![deny(missing_docs)]

/// Gate verification session and its states.
pub mod gate;
/// Token lifecycle classification.
pub mod lifecycle;
/// Remote record types and the gate pass payload.
pub mod records;
/// Event/slot drafts and the schedule validator.
pub mod schedule;
/// Token identifier extraction.
pub mod scan;
/// Start/end windows over naive local instants.
pub mod time_window;

pub use gate::{
    resolve, AttemptResult, Completion, GateSession, GateState, VerifyTicket,
    DEFAULT_FAILURE_MESSAGE,
};
pub use lifecycle::{classify, Severity, StatusBadge, TokenStatus};
pub use records::{
    ActiveEvent, EntryRecord, Envelope, EventRef, EventStats, GatePass, LiveEntries, ScanToken,
    SlotTimes, StudentInfo, TokenCounts, VerificationData, VerificationOutcome,
};
pub use scan::{extract_token_id, TokenId, TokenIdError};
pub use schedule::{
    has_minimum_slots, validate_schedule, Degree, DraftError, EventDraft, EventForm,
    EventPayload, ScheduleDiagnostic, ScheduleReport, SlotDraft, SlotPayload, UnknownDegree,
    DEGREE_OPTIONS,
};
pub use time_window::{is_before, parse_instant, TimeWindow};
