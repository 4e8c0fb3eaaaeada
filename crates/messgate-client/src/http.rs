//! `reqwest` adapter for [`GateApi`].

use async_trait::async_trait;
use messgate_core::{
    ActiveEvent, Envelope, EventPayload, EventStats, LiveEntries, ScanToken, TokenId,
    VerificationOutcome,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::GateApi;
use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    token_id: &'a TokenId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
}

/// Maps a non-2xx response to [`ClientError::Server`], keeping the body's
/// `message` when it has one.
pub fn decode_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    ClientError::Server { status, message }
}

/// Decodes a success envelope and returns its `data`, if any.
pub fn decode_data<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ClientError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(envelope.data)
}

/// Like [`decode_data`], but the payload must be present.
pub fn decode_required<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    decode_data(body)?.ok_or_else(|| ClientError::Decode("response has no data".to_string()))
}

/// Decodes a 2xx verification body; `success=false` is still `Ok`.
pub fn decode_verification(body: &str) -> Result<VerificationOutcome, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// HTTP client for the entry service.
#[derive(Debug, Clone)]
pub struct HttpGateApi {
    config: ClientConfig,
    client: Client,
}

impl HttpGateApi {
    /// Builds a client from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Settings in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.config.endpoint(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.config.endpoint(path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends `request` and returns the body of a 2xx response.
    async fn send(&self, path: &str, request: RequestBuilder) -> Result<String, ClientError> {
        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "request failed");
            ClientError::from(e)
        })?;
        let status = response.status();
        let body = response.text().await?;
        debug!(path, status = status.as_u16(), "response received");
        if status.is_success() {
            Ok(body)
        } else {
            Err(decode_error(status.as_u16(), &body))
        }
    }

    /// Like [`send`](Self::send), but a 404 becomes `None`.
    async fn send_optional(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Option<String>, ClientError> {
        match self.send(path, request).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl GateApi for HttpGateApi {
    async fn create_event(&self, payload: &EventPayload) -> Result<Option<String>, ClientError> {
        let path = "/events/create";
        let body = self.send(path, self.post(path).json(payload)).await?;
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(envelope.message)
    }

    async fn verify_token(&self, token_id: &TokenId) -> Result<VerificationOutcome, ClientError> {
        let path = "/tokens/verify";
        debug!(token_id = %token_id, "verifying token");
        let body = self
            .send(path, self.post(path).json(&VerifyRequest { token_id }))
            .await?;
        decode_verification(&body)
    }

    async fn generate_token(&self) -> Result<ScanToken, ClientError> {
        let path = "/tokens/generate";
        let body = self.send(path, self.post(path)).await?;
        decode_required(&body)
    }

    async fn my_token(&self) -> Result<Option<ScanToken>, ClientError> {
        let path = "/tokens/my";
        match self.send_optional(path, self.get(path)).await? {
            Some(body) => decode_data(&body),
            None => Ok(None),
        }
    }

    async fn active_event(&self) -> Result<Option<ActiveEvent>, ClientError> {
        let path = "/events/active";
        match self.send_optional(path, self.get(path)).await? {
            Some(body) => decode_data(&body),
            None => Ok(None),
        }
    }

    async fn live_entries(&self) -> Result<LiveEntries, ClientError> {
        let path = "/admin/entries";
        let body = self.send(path, self.get(path)).await?;
        decode_required(&body)
    }

    async fn event_stats(&self) -> Result<EventStats, ClientError> {
        let path = "/admin/event-stats";
        let body = self.send(path, self.get(path)).await?;
        decode_required(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_message_is_kept() {
        let err = decode_error(400, r#"{"success":false,"message":"Token expired"}"#);
        assert_eq!(err.server_message(), Some("Token expired"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn error_body_without_message() {
        let err = decode_error(502, "<html>Bad Gateway</html>");
        assert!(matches!(
            err,
            ClientError::Server {
                status: 502,
                message: None
            }
        ));
        assert_eq!(err.message_or("Failed to load stats"), "Failed to load stats");
        assert!(decode_error(404, "").is_not_found());
    }

    #[test]
    fn verification_rejection_is_ok() {
        let outcome =
            decode_verification(r#"{"success":false,"message":"Token already used"}"#).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Token already used");
    }

    #[test]
    fn verification_success_carries_student() {
        let outcome = decode_verification(
            r#"{
                "success": true,
                "message": "Entry allowed",
                "data": {
                    "tokenId": "ABC123",
                    "entryTime": "2025-03-01T09:12:00",
                    "event": { "title": "Lunch" },
                    "student": { "name": "Asha R", "registerNumber": 211042, "degree": "BTECH", "semester": 6 }
                }
            }"#,
        )
        .unwrap();
        let student = outcome.student().unwrap();
        assert_eq!(student.register_number, "211042");
        assert_eq!(student.semester, "6");
    }

    #[test]
    fn data_envelope_decoding() {
        let stats: EventStats = decode_required(
            r#"{"success":true,"data":{"event":{"title":"Lunch","startTime":"2025-03-01T09:00","endTime":"2025-03-01T11:00"},"stats":{"totalTokens":40,"usedTokens":25,"unusedTokens":10,"expiredTokens":5}}}"#,
        )
        .unwrap();
        assert_eq!(stats.stats.used_tokens, 25);
        assert!(stats.event.window().is_well_ordered());

        let none: Option<ActiveEvent> = decode_data(r#"{"success":true,"data":null}"#).unwrap();
        assert!(none.is_none());
        assert!(matches!(
            decode_required::<LiveEntries>(r#"{"success":true}"#),
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(
            decode_data::<ScanToken>("not json"),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn verify_request_shape() {
        let token = TokenId::parse("T-1").unwrap();
        let json = serde_json::to_string(&VerifyRequest { token_id: &token }).unwrap();
        assert_eq!(json, r#"{"tokenId":"T-1"}"#);
    }
}
