#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use messgate_client::{ClientError, GateApi};
use messgate_core::{
    ActiveEvent, EventPayload, EventRef, EventStats, LiveEntries, ScanToken, StudentInfo, TokenId,
    VerificationData, VerificationOutcome,
};

#[derive(Debug, Clone)]
pub enum Reply {
    Outcome(VerificationOutcome),
    Server { status: u16, message: Option<String> },
    Transport,
}

#[derive(Default)]
struct Inner {
    verify: Mutex<HashMap<String, (Duration, Reply)>>,
    verify_calls: AtomicUsize,
    verify_finished: Mutex<Vec<String>>,
    entries_calls: AtomicU64,
    entries_fail: AtomicBool,
}

/// In-memory service whose verification answers are scripted per token.
#[derive(Clone, Default)]
pub struct ScriptedApi {
    inner: Arc<Inner>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, token: &str, delay: Duration, reply: Reply) -> &Self {
        self.inner
            .verify
            .lock()
            .unwrap()
            .insert(token.to_string(), (delay, reply));
        self
    }

    pub fn verify_calls(&self) -> usize {
        self.inner.verify_calls.load(Ordering::SeqCst)
    }

    /// Tokens whose verification call ran to the end, in finishing order.
    pub fn verify_finished(&self) -> Vec<String> {
        self.inner.verify_finished.lock().unwrap().clone()
    }

    pub fn entries_calls(&self) -> u64 {
        self.inner.entries_calls.load(Ordering::SeqCst)
    }

    pub fn fail_entries(&self, fail: bool) {
        self.inner.entries_fail.store(fail, Ordering::SeqCst);
    }
}

fn unscripted() -> ClientError {
    ClientError::Transport("not scripted".to_string())
}

#[async_trait]
impl GateApi for ScriptedApi {
    async fn create_event(&self, _payload: &EventPayload) -> Result<Option<String>, ClientError> {
        Err(unscripted())
    }

    async fn verify_token(&self, token_id: &TokenId) -> Result<VerificationOutcome, ClientError> {
        self.inner.verify_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .inner
            .verify
            .lock()
            .unwrap()
            .get(token_id.as_str())
            .cloned();
        let (delay, reply) = scripted.ok_or_else(unscripted)?;
        tokio::time::sleep(delay).await;
        self.inner
            .verify_finished
            .lock()
            .unwrap()
            .push(token_id.to_string());
        match reply {
            Reply::Outcome(outcome) => Ok(outcome),
            Reply::Server { status, message } => Err(ClientError::Server { status, message }),
            Reply::Transport => Err(ClientError::Transport("connection reset".to_string())),
        }
    }

    async fn generate_token(&self) -> Result<ScanToken, ClientError> {
        Err(unscripted())
    }

    async fn my_token(&self) -> Result<Option<ScanToken>, ClientError> {
        Ok(None)
    }

    async fn active_event(&self) -> Result<Option<ActiveEvent>, ClientError> {
        Ok(None)
    }

    async fn live_entries(&self) -> Result<LiveEntries, ClientError> {
        let call = self.inner.entries_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.inner.entries_fail.load(Ordering::SeqCst) {
            return Err(ClientError::Server {
                status: 404,
                message: Some("No active event".to_string()),
            });
        }
        Ok(LiveEntries {
            event: EventRef {
                title: "Lunch".to_string(),
            },
            entries: Vec::new(),
            total_entries: call,
        })
    }

    async fn event_stats(&self) -> Result<EventStats, ClientError> {
        Err(unscripted())
    }
}

pub fn allowed(token: &str) -> Reply {
    Reply::Outcome(VerificationOutcome {
        success: true,
        message: "Entry allowed".to_string(),
        data: Some(VerificationData {
            token_id: token.to_string(),
            entry_time: Some("2025-03-01T09:12:00".to_string()),
            event: Some(EventRef {
                title: "Lunch".to_string(),
            }),
            student: Some(StudentInfo {
                name: "Asha R".to_string(),
                register_number: "21BCE1042".to_string(),
                degree: "BTECH".to_string(),
                semester: "6".to_string(),
            }),
        }),
    })
}

pub fn rejected(message: &str) -> Reply {
    Reply::Outcome(VerificationOutcome {
        success: false,
        message: message.to_string(),
        data: None,
    })
}
