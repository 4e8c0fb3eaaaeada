//! Remote side of mess entry control.
//!
//! - [`GateApi`]: the service seam, with [`HttpGateApi`] as its HTTP adapter
//! - [`GateWorkflow`]: drives a gate session against a service
//! - [`LivePoller`]: periodic refresh of the live entries feed
//!
#![deny(missing_docs)]

/// Service trait and per-call default messages.
pub mod api;
/// Connection settings.
pub mod config;
/// Client errors.
pub mod error;
/// HTTP adapter.
pub mod http;
/// Live entries polling.
pub mod poller;
/// Async gate verification driver.
pub mod workflow;

pub use api::{
    GateApi, CREATE_EVENT_FAILED, GENERATE_FAILED, LOAD_DATA_FAILED, LOAD_ENTRIES_FAILED,
    LOAD_STATS_FAILED, VERIFY_FAILED,
};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use http::HttpGateApi;
pub use poller::{LivePoller, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use workflow::{attempt, GateWorkflow};
