//! The service seam.

use async_trait::async_trait;
use messgate_core::{
    ActiveEvent, EventPayload, EventStats, LiveEntries, ScanToken, TokenId, VerificationOutcome,
};

use crate::error::ClientError;

/// Default message when event creation fails without one.
pub const CREATE_EVENT_FAILED: &str = "Event creation failed";
/// Default message when verification fails without one.
pub const VERIFY_FAILED: &str = messgate_core::DEFAULT_FAILURE_MESSAGE;
/// Default message when token generation fails without one.
pub const GENERATE_FAILED: &str = "Token generation failed";
/// Default message when the student view cannot load.
pub const LOAD_DATA_FAILED: &str = "Failed to load data";
/// Default message when the entries feed cannot load.
pub const LOAD_ENTRIES_FAILED: &str = "Failed to load entries";
/// Default message when event stats cannot load.
pub const LOAD_STATS_FAILED: &str = "Failed to load stats";

/// Operations the remote entry service offers.
///
/// The service is the sole authority on token validity; implementors only
/// move requests and decode answers.
#[async_trait]
pub trait GateApi: Send + Sync {
    /// Submits a validated event with its slots. Returns the service message.
    async fn create_event(&self, payload: &EventPayload) -> Result<Option<String>, ClientError>;

    /// Asks whether `token_id` may enter now.
    ///
    /// A response body with `success=false` is a business rejection and comes
    /// back as `Ok`; only missing or non-2xx responses are `Err`.
    async fn verify_token(&self, token_id: &TokenId) -> Result<VerificationOutcome, ClientError>;

    /// Generates the caller's token for the active event.
    async fn generate_token(&self) -> Result<ScanToken, ClientError>;

    /// The caller's token, or `None` if they have not generated one.
    async fn my_token(&self) -> Result<Option<ScanToken>, ClientError>;

    /// The active event, or `None` when nothing is open.
    async fn active_event(&self) -> Result<Option<ActiveEvent>, ClientError>;

    /// Entries admitted so far for the active event.
    async fn live_entries(&self) -> Result<LiveEntries, ClientError>;

    /// Token counters for the active event.
    async fn event_stats(&self) -> Result<EventStats, ClientError>;
}
