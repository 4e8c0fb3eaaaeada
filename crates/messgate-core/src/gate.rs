//! Gate verification session: one verification slot, one tagged state.
//!
//! The session never performs I/O. A trigger (scan or manual submit) yields a
//! [`VerifyTicket`]; whoever runs the remote call hands the result back with
//! that ticket through [`GateSession::complete`].
//!
//! Concurrency policy: tickets carry a monotonically increasing sequence
//! number. Only the most recently issued ticket may complete the session;
//! answers to superseded or cleared attempts are reported as
//! [`Completion::Stale`] and dropped, regardless of arrival order.

use crate::lifecycle::Severity;
use crate::records::VerificationOutcome;
use crate::scan::{extract_token_id, TokenId, TokenIdError};

/// Banner text when a verification call produced no usable message.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Verification failed";

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Nothing scanned, or cleared.
    Idle,
    /// A verification call is outstanding.
    Verifying {
        /// Identifier sent to the service.
        token_id: TokenId,
    },
    /// The service admitted the token.
    Allowed {
        /// Full response, including student metadata.
        outcome: VerificationOutcome,
    },
    /// The service answered but refused entry.
    Blocked {
        /// Refusal message as returned.
        message: String,
        /// Full response.
        outcome: VerificationOutcome,
    },
    /// The call did not produce a response.
    Failed {
        /// Server message or [`DEFAULT_FAILURE_MESSAGE`].
        message: String,
    },
}

impl GateState {
    /// Short upper-case name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            GateState::Idle => "IDLE",
            GateState::Verifying { .. } => "VERIFYING",
            GateState::Allowed { .. } => "ALLOWED",
            GateState::Blocked { .. } => "BLOCKED",
            GateState::Failed { .. } => "FAILED",
        }
    }

    /// Message to render, if the state carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            GateState::Allowed { outcome } => Some(outcome.message.as_str()),
            GateState::Blocked { message, .. } | GateState::Failed { message } => {
                Some(message.as_str())
            }
            GateState::Idle | GateState::Verifying { .. } => None,
        }
    }

    /// Rendering severity: affirmative, cautionary, or error banner.
    pub fn severity(&self) -> Severity {
        match self {
            GateState::Allowed { .. } => Severity::Positive,
            GateState::Blocked { .. } => Severity::Caution,
            GateState::Failed { .. } => Severity::Negative,
            GateState::Idle | GateState::Verifying { .. } => Severity::Neutral,
        }
    }

    /// True when an attempt has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GateState::Allowed { .. } | GateState::Blocked { .. } | GateState::Failed { .. }
        )
    }
}

/// Handle for one issued verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyTicket {
    /// Issue order; higher is newer.
    pub seq: u64,
    /// Identifier to verify.
    pub token_id: TokenId,
}

/// What came back from the remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// A response body arrived (success or business rejection).
    Responded(VerificationOutcome),
    /// Transport or server failure; carries the server message if any.
    Failed {
        /// Message from the error body, when present.
        message: Option<String>,
    },
}

/// Whether a completion changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied.
    Applied,
    /// The ticket was superseded or cleared; the result was dropped.
    Stale,
}

/// Maps a finished attempt to its terminal state.
pub fn resolve(result: AttemptResult) -> GateState {
    match result {
        AttemptResult::Responded(outcome) if outcome.success => GateState::Allowed { outcome },
        AttemptResult::Responded(outcome) => GateState::Blocked {
            message: outcome.message.clone(),
            outcome,
        },
        AttemptResult::Failed { message } => GateState::Failed {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        },
    }
}

/// State of one gate-scanning surface.
#[derive(Debug, Clone)]
pub struct GateSession {
    state: GateState,
    last_scan: String,
    manual_input: String,
    issued: u64,
}

impl Default for GateSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GateSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
            last_scan: String::new(),
            manual_input: String::new(),
            issued: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Raw text of the most recent scan.
    pub fn last_scan(&self) -> &str {
        &self.last_scan
    }

    /// Current typed input.
    pub fn manual_input(&self) -> &str {
        &self.manual_input
    }

    /// Sequence number of the most recently issued ticket (0 before any).
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// True while a call is outstanding.
    pub fn is_verifying(&self) -> bool {
        matches!(self.state, GateState::Verifying { .. })
    }

    /// Identifier the surface would show: the scanned one, else the typed one.
    pub fn current_token_id(&self) -> String {
        let scanned = extract_token_id(&self.last_scan);
        if scanned.is_empty() {
            self.manual_input.trim().to_string()
        } else {
            scanned
        }
    }

    fn begin(&mut self, token_id: TokenId) -> VerifyTicket {
        self.issued += 1;
        self.state = GateState::Verifying {
            token_id: token_id.clone(),
        };
        VerifyTicket {
            seq: self.issued,
            token_id,
        }
    }

    /// Records a decoded scan and starts an attempt if it yields an identifier.
    pub fn on_scan(&mut self, raw: &str) -> Option<VerifyTicket> {
        self.last_scan = raw.to_string();
        TokenId::from_scan(raw).map(|token_id| self.begin(token_id))
    }

    /// Replaces the typed input.
    pub fn set_manual_input(&mut self, text: impl Into<String>) {
        self.manual_input = text.into();
    }

    /// Starts an attempt from the typed input.
    pub fn submit_manual(&mut self) -> Result<VerifyTicket, TokenIdError> {
        let token_id = TokenId::parse(&self.manual_input)?;
        Ok(self.begin(token_id))
    }

    /// Applies a finished attempt if its ticket is still current.
    pub fn complete(&mut self, ticket: &VerifyTicket, result: AttemptResult) -> Completion {
        if ticket.seq != self.issued || !self.is_verifying() {
            return Completion::Stale;
        }
        self.state = resolve(result);
        Completion::Applied
    }

    /// Back to idle; drops scan text, typed input and outcome.
    pub fn clear(&mut self) {
        self.state = GateState::Idle;
        self.last_scan.clear();
        self.manual_input.clear();
    }
}
