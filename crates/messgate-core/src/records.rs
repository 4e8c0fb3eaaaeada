//! Records exchanged with the remote entry service.
//!
//! Everything is camelCase on the wire. Timestamps stay as the naive strings
//! the service sends; helpers parse them on demand.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lifecycle::{classify, StatusBadge, TokenStatus};
use crate::scan::TokenId;
use crate::time_window::{parse_instant, TimeWindow};

// Register numbers and semesters show up as strings or numbers depending on who typed them.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Success envelope wrapping every response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Business-level success flag, when the call reports one.
    #[serde(default)]
    pub success: Option<bool>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload; absent when the call carries none.
    pub data: Option<T>,
}

/// Start/end strings of a token's slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotTimes {
    /// Slot start.
    pub start_time: String,
    /// Slot end.
    pub end_time: String,
}

impl SlotTimes {
    /// Parsed window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_raw(&self.start_time, &self.end_time)
    }
}

/// A student's admission token as stored by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanToken {
    /// Token identifier.
    #[serde(deserialize_with = "lenient_string")]
    pub token_id: String,
    /// Raw status label (`UNUSED`, `USED`, `EXPIRED`, ...).
    pub status: String,
    /// Slot the token was generated for.
    pub slot: Option<SlotTimes>,
    /// Generation time.
    pub generated_at: Option<String>,
}

impl ScanToken {
    /// Classified lifecycle state.
    pub fn lifecycle(&self) -> TokenStatus {
        classify(&self.status)
    }

    /// Status chip for display.
    pub fn badge(&self) -> StatusBadge {
        StatusBadge::for_raw(&self.status)
    }

    /// Parsed generation time.
    pub fn generated_instant(&self) -> Option<NaiveDateTime> {
        self.generated_at.as_deref().and_then(parse_instant)
    }
}

/// The event currently open for token generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveEvent {
    /// Event title.
    pub title: String,
    /// Event start.
    pub start_time: String,
    /// Event end.
    pub end_time: String,
}

impl ActiveEvent {
    /// Parsed window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_raw(&self.start_time, &self.end_time)
    }
}

/// Event reference embedded in verification data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRef {
    /// Event title.
    pub title: String,
}

/// Student details returned with a verification or entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentInfo {
    /// Full name.
    pub name: String,
    /// University register number.
    #[serde(deserialize_with = "lenient_string")]
    pub register_number: String,
    /// Degree label.
    pub degree: String,
    /// Semester, possibly empty.
    #[serde(deserialize_with = "lenient_string")]
    pub semester: String,
}

/// Payload of a verification response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationData {
    /// Token that was checked.
    #[serde(deserialize_with = "lenient_string")]
    pub token_id: String,
    /// When entry was recorded.
    pub entry_time: Option<String>,
    /// Event the token belongs to.
    pub event: Option<EventRef>,
    /// Student the token was issued to.
    pub student: Option<StudentInfo>,
}

/// Result of one verification call that produced a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// True when entry is allowed.
    #[serde(default)]
    pub success: bool,
    /// Service message, shown verbatim.
    #[serde(default)]
    pub message: String,
    /// Entry metadata, usually only on success.
    #[serde(default)]
    pub data: Option<VerificationData>,
}

impl VerificationOutcome {
    /// Student details, if returned.
    pub fn student(&self) -> Option<&StudentInfo> {
        self.data.as_ref().and_then(|d| d.student.as_ref())
    }

    /// Parsed entry time, if returned.
    pub fn entry_instant(&self) -> Option<NaiveDateTime> {
        self.data
            .as_ref()
            .and_then(|d| d.entry_time.as_deref())
            .and_then(parse_instant)
    }
}

/// One admitted entry in the live feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryRecord {
    /// Token that was admitted.
    #[serde(deserialize_with = "lenient_string")]
    pub token_id: String,
    /// Admission time.
    pub entry_time: Option<String>,
    /// Admitted student.
    pub student: StudentInfo,
}

/// Live entries feed for the active event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveEntries {
    /// Event being fed.
    pub event: EventRef,
    /// Entries, most recent first as sent.
    pub entries: Vec<EntryRecord>,
    /// Total admitted so far.
    pub total_entries: u64,
}

/// Token counters for an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenCounts {
    /// Tokens generated.
    pub total_tokens: u64,
    /// Tokens scanned at the gate.
    pub used_tokens: u64,
    /// Tokens still valid.
    pub unused_tokens: u64,
    /// Tokens past their window.
    pub expired_tokens: u64,
}

/// Statistics for the active event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventStats {
    /// Event the stats belong to.
    pub event: ActiveEvent,
    /// Token counters.
    pub stats: TokenCounts,
}

/// Contents of the QR code a student shows at the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatePass {
    /// Token to admit.
    pub token_id: TokenId,
    /// Student name.
    pub name: String,
    /// Register number.
    pub register_number: String,
    /// Degree label.
    pub degree: String,
    /// Semester.
    pub semester: String,
}

impl GatePass {
    /// Builds a pass from a token and the holder's details.
    pub fn new(token_id: TokenId, student: &StudentInfo) -> Self {
        Self {
            token_id,
            name: student.name.clone(),
            register_number: student.register_number.clone(),
            degree: student.degree.clone(),
            semester: student.semester.clone(),
        }
    }

    /// Compact JSON text to encode into the QR image.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.token_id.to_string())
    }
}
