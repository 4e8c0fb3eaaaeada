//! Async driver for [`GateSession`].
//!
//! The session decides which answers count; this driver runs the remote
//! calls, publishes every state change on a `watch` channel, and aborts a
//! call once a newer attempt or a clear has made it irrelevant.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use messgate_core::{
    AttemptResult, Completion, GateSession, GateState, TokenId, TokenIdError, VerifyTicket,
};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::api::GateApi;

/// Runs one verification call and folds its result for the session.
pub async fn attempt<A: GateApi + ?Sized>(api: &A, token_id: &TokenId) -> AttemptResult {
    match api.verify_token(token_id).await {
        Ok(outcome) => AttemptResult::Responded(outcome),
        Err(e) => {
            debug!(token_id = %token_id, error = %e, "verification call failed");
            AttemptResult::Failed {
                message: e.server_message().map(str::to_string),
            }
        }
    }
}

struct Shared<A> {
    api: A,
    session: Mutex<GateSession>,
    state_tx: watch::Sender<GateState>,
}

impl<A: GateApi> Shared<A> {
    fn session(&self) -> MutexGuard<'_, GateSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `start` to the session and publishes the new state if it issued a ticket.
    fn issue<T>(
        &self,
        start: impl FnOnce(&mut GateSession) -> T,
        ticket_of: impl FnOnce(&T) -> Option<&VerifyTicket>,
    ) -> T {
        let mut session = self.session();
        let started = start(&mut session);
        if let Some(ticket) = ticket_of(&started) {
            info!(seq = ticket.seq, token_id = %ticket.token_id, "verification issued");
            self.state_tx.send_replace(session.state().clone());
        }
        started
    }

    async fn run(&self, ticket: VerifyTicket) -> GateState {
        let result = attempt(&self.api, &ticket.token_id).await;
        let mut session = self.session();
        match session.complete(&ticket, result) {
            Completion::Applied => {
                info!(seq = ticket.seq, state = session.state().name(), "verification applied");
                self.state_tx.send_replace(session.state().clone());
            }
            Completion::Stale => {
                debug!(seq = ticket.seq, latest = session.latest_seq(), "stale verification dropped");
            }
        }
        session.state().clone()
    }
}

/// One gate-scanning surface bound to a service.
pub struct GateWorkflow<A> {
    shared: Arc<Shared<A>>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl<A: GateApi + 'static> GateWorkflow<A> {
    /// Creates an idle workflow.
    pub fn new(api: A) -> Self {
        let (state_tx, _) = watch::channel(GateState::Idle);
        Self {
            shared: Arc::new(Shared {
                api,
                session: Mutex::new(GateSession::new()),
                state_tx,
            }),
            in_flight: Mutex::new(None),
        }
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.shared.state_tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> GateState {
        self.shared.session().state().clone()
    }

    /// Identifier the surface would display.
    pub fn current_token_id(&self) -> String {
        self.shared.session().current_token_id()
    }

    /// Replaces the typed input.
    pub fn set_manual_input(&self, text: impl Into<String>) {
        self.shared.session().set_manual_input(text);
    }

    /// Starts an attempt while holding the in-flight slot.
    ///
    /// When `start` issues a ticket the previous call is aborted. The guard is
    /// returned so the caller can store the new call's handle before anyone
    /// else can start or abort.
    fn begin<T>(
        &self,
        start: impl FnOnce(&mut GateSession) -> T,
        ticket_of: impl Fn(&T) -> Option<&VerifyTicket>,
    ) -> (T, MutexGuard<'_, Option<AbortHandle>>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let started = self.shared.issue(start, &ticket_of);
        if ticket_of(&started).is_some() {
            if let Some(previous) = in_flight.take() {
                previous.abort();
            }
        }
        (started, in_flight)
    }

    /// Handles a decoded scan and waits for its verification.
    ///
    /// Returns `None` when the payload carries no identifier, in which case
    /// nothing is started or aborted. Otherwise returns the state after the
    /// call, which may belong to a newer attempt.
    pub async fn scan(&self, raw: &str) -> Option<GateState> {
        let ticket = {
            let (ticket, _in_flight) = self.begin(|s| s.on_scan(raw), |t| t.as_ref());
            ticket
        }?;
        Some(self.shared.run(ticket).await)
    }

    /// Verifies the typed input and waits for the answer.
    pub async fn submit(&self) -> Result<GateState, TokenIdError> {
        let ticket = {
            let (ticket, _in_flight) = self.begin(|s| s.submit_manual(), |r| r.as_ref().ok());
            ticket
        }?;
        Ok(self.shared.run(ticket).await)
    }

    /// Handles a decoded scan without waiting.
    ///
    /// The call runs on a spawned task. Starting an attempt aborts any earlier
    /// in-flight call; a payload without an identifier starts nothing.
    /// Returns whether an attempt was started. Must be called within a Tokio
    /// runtime.
    pub fn trigger_scan(&self, raw: &str) -> bool {
        let (ticket, mut in_flight) = self.begin(|s| s.on_scan(raw), |t| t.as_ref());
        let Some(ticket) = ticket else {
            return false;
        };
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            shared.run(ticket).await;
        });
        *in_flight = Some(handle.abort_handle());
        true
    }

    /// Resets to idle and abandons any outstanding call.
    pub fn clear(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = in_flight.take() {
            previous.abort();
        }
        let mut session = self.shared.session();
        session.clear();
        self.shared.state_tx.send_replace(session.state().clone());
        debug!("gate session cleared");
    }
}
