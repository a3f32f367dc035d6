//! # HTTP Message Gateway
//!
//! Transport implementation of [`MessageGateway`] and [`OfferingLookup`]
//! over the PFI's HTTP API.
//!
//! Routes:
//! - `POST {base}/exchanges/{exchange_id}/messages` submits a signed
//!   message and returns a [`SubmissionAck`].
//! - `GET {base}/exchanges/{exchange_id}` fetches the exchange message
//!   history.
//! - `GET {base}/offerings/{offering_id}` resolves an offering.
//!
//! History reads are authenticated with a detached signature over the
//! request path, carried in `x-request-key-id` / `x-request-signature`
//! headers.
//!
//! One gateway instance serves every PFI the wallet talks to: a default
//! base URL covers the single-counterparty case, and per-PFI endpoint
//! overrides route the rest.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use async_trait::async_trait;

use crate::domain::messages::{Message, MessageKind, SignedMessage};
use crate::domain::value_objects::{ExchangeId, OfferingId, PfiId};
use crate::infrastructure::gateway::error::{GatewayError, GatewayResult};
use crate::infrastructure::gateway::offerings::{
    Offering, OfferingError, OfferingLookup, OfferingResult,
};
use crate::infrastructure::gateway::traits::{MessageGateway, SubmissionAck};
use crate::infrastructure::identity::SigningCredentials;

/// Wire envelope for exchange history responses.
#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    data: Vec<Message>,
}

/// Wire envelope for offering responses.
#[derive(Debug, Deserialize)]
struct OfferingEnvelope {
    data: Offering,
}

/// HTTP transport to PFI message endpoints.
#[derive(Debug, Clone)]
pub struct HttpMessageGateway {
    /// Inner reqwest client.
    client: Client,
    /// Default PFI base URL.
    base_url: String,
    /// Per-PFI base URL overrides, keyed by PFI id.
    endpoints: HashMap<String, String>,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpMessageGateway {
    /// Creates a gateway against `base_url` with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be
    /// created.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: trim_base(base_url.into()),
            endpoints: HashMap::new(),
            timeout_ms,
        })
    }

    /// Routes messages addressed to `pfi_id` to `base_url` instead of
    /// the default endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, pfi_id: PfiId, base_url: impl Into<String>) -> Self {
        self.endpoints
            .insert(pfi_id.into_inner(), trim_base(base_url.into()));
        self
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the base URL serving the given PFI.
    fn endpoint_for(&self, pfi_id: &str) -> &str {
        self.endpoints
            .get(pfi_id)
            .map_or(self.base_url.as_str(), String::as_str)
    }

    /// Builds detached-signature auth headers over a request path.
    fn auth_headers(
        path: &str,
        credentials: &SigningCredentials,
    ) -> GatewayResult<HeaderMap> {
        let signature = credentials
            .sign_payload(path.as_bytes())
            .map_err(|e| GatewayError::authentication(format!("request signing failed: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-request-key-id"),
            HeaderValue::from_str(credentials.key_id())
                .map_err(|e| GatewayError::internal(format!("invalid key id header: {e}")))?,
        );
        headers.insert(
            HeaderName::from_static("x-request-signature"),
            HeaderValue::from_str(&signature)
                .map_err(|e| GatewayError::internal(format!("invalid signature header: {e}")))?,
        );
        Ok(headers)
    }

    /// Handles an HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> GatewayResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| GatewayError::protocol(format!("failed to parse response: {e}")))
        } else {
            let retry_after_ms = retry_after_ms(&response);
            let body = response.text().await.unwrap_or_default();
            Err(map_status_error(status, retry_after_ms, &body))
        }
    }

    /// Maps a reqwest error to a gateway error.
    fn map_reqwest_error(&self, error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::timeout_with_duration("request timed out", self.timeout_ms)
        } else if error.is_connect() {
            GatewayError::connection(format!("connection failed: {error}"))
        } else {
            GatewayError::connection(format!("HTTP request failed: {error}"))
        }
    }
}

#[async_trait]
impl MessageGateway for HttpMessageGateway {
    async fn submit(
        &self,
        kind: MessageKind,
        message: &SignedMessage,
    ) -> GatewayResult<SubmissionAck> {
        let metadata = message.message.metadata();
        let base = self.endpoint_for(&metadata.to);
        let url = format!("{base}/exchanges/{}/messages", metadata.exchange_id);

        tracing::debug!(%kind, exchange_id = %metadata.exchange_id, "submitting message");

        let response = self
            .client
            .post(&url)
            .json(message)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    async fn fetch_history(
        &self,
        pfi_id: &PfiId,
        exchange_id: &ExchangeId,
        credentials: &SigningCredentials,
    ) -> GatewayResult<Vec<Message>> {
        let path = format!("/exchanges/{exchange_id}");
        let url = format!("{}{path}", self.endpoint_for(pfi_id.as_str()));
        let headers = Self::auth_headers(&path, credentials)?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let envelope: HistoryEnvelope = self.handle_response(response).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl OfferingLookup for HttpMessageGateway {
    async fn find_offering(&self, id: &OfferingId) -> OfferingResult<Offering> {
        let url = format!("{}/offerings/{id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OfferingError::lookup(self.map_reqwest_error(e).to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(OfferingError::not_found(id.as_str()));
        }

        let envelope: OfferingEnvelope = self
            .handle_response(response)
            .await
            .map_err(|e| OfferingError::lookup(e.to_string()))?;
        Ok(envelope.data)
    }
}

/// Strips a trailing slash so route formatting stays uniform.
fn trim_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Reads a `Retry-After` header as milliseconds, when present.
fn retry_after_ms(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// Maps an HTTP status code to a gateway error.
fn map_status_error(status: StatusCode, retry_after_ms: Option<u64>, body: &str) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::authentication(format!("authentication failed: {body}"))
        }
        StatusCode::TOO_MANY_REQUESTS => match retry_after_ms {
            Some(ms) => GatewayError::rate_limited_with_retry("rate limit exceeded", ms),
            None => GatewayError::rate_limited("rate limit exceeded"),
        },
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::connection(format!("server error ({status}): {body}"))
        }
        s if s.is_client_error() => {
            if body.is_empty() {
                GatewayError::rejected("message rejected by counterparty")
            } else {
                GatewayError::rejected(body)
            }
        }
        _ => GatewayError::protocol(format!("HTTP error ({status}): {body}")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::value_objects::{
        CurrencyCode, CustomerId, PaymentSelections, Timestamp,
    };
    use crate::infrastructure::identity::HmacSigner;

    fn test_credentials() -> SigningCredentials {
        SigningCredentials::new(
            "did:key:alice",
            "did:key:alice#key-1",
            Arc::new(HmacSigner::new(b"test-secret")),
        )
    }

    fn signed_rfq(pfi_id: &str) -> SignedMessage {
        let selections =
            PaymentSelections::new(Decimal::new(100, 0), "BANK_TRANSFER", "WALLET").unwrap();
        let message = Message::rfq(
            &CustomerId::from("did:key:alice"),
            &PfiId::from(pfi_id),
            OfferingId::from("offering_usd_mxn"),
            &selections,
        );
        test_credentials().sign(&message).unwrap()
    }

    fn ack_body(message_id: &str) -> serde_json::Value {
        serde_json::json!({
            "message_id": message_id,
            "accepted_at": "2026-01-10T12:00:00Z",
        })
    }

    mod submit {
        use super::*;

        #[tokio::test]
        async fn posts_signed_message_and_parses_ack() {
            let server = MockServer::start().await;
            let signed = signed_rfq("did:key:pfi");
            let exchange_id = signed.message.exchange_id().clone();

            Mock::given(method("POST"))
                .and(path(format!("/exchanges/{exchange_id}/messages")))
                .respond_with(ResponseTemplate::new(200).set_body_json(ack_body("msg_1")))
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let ack = gateway.submit(MessageKind::Rfq, &signed).await.unwrap();

            assert_eq!(ack.message_id.as_str(), "msg_1");
        }

        #[tokio::test]
        async fn client_error_maps_to_rejection() {
            let server = MockServer::start().await;
            let signed = signed_rfq("did:key:pfi");
            let exchange_id = signed.message.exchange_id().clone();

            Mock::given(method("POST"))
                .and(path(format!("/exchanges/{exchange_id}/messages")))
                .respond_with(
                    ResponseTemplate::new(400).set_body_string("offering requirements not met"),
                )
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let err = gateway
                .submit(MessageKind::Rfq, &signed)
                .await
                .unwrap_err();

            assert!(err.is_rejection());
            assert!(!err.is_retryable());
            assert!(err.to_string().contains("offering requirements not met"));
        }

        #[tokio::test]
        async fn rate_limit_carries_retry_after() {
            let server = MockServer::start().await;
            let signed = signed_rfq("did:key:pfi");
            let exchange_id = signed.message.exchange_id().clone();

            Mock::given(method("POST"))
                .and(path(format!("/exchanges/{exchange_id}/messages")))
                .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let err = gateway
                .submit(MessageKind::Rfq, &signed)
                .await
                .unwrap_err();

            assert!(err.is_retryable());
            assert_eq!(err.retry_after_ms(), Some(2000));
        }

        #[tokio::test]
        async fn server_error_is_retryable() {
            let server = MockServer::start().await;
            let signed = signed_rfq("did:key:pfi");
            let exchange_id = signed.message.exchange_id().clone();

            Mock::given(method("POST"))
                .and(path(format!("/exchanges/{exchange_id}/messages")))
                .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let err = gateway
                .submit(MessageKind::Rfq, &signed)
                .await
                .unwrap_err();

            assert!(err.is_retryable());
            assert!(!err.is_rejection());
        }

        #[tokio::test]
        async fn auth_failure_is_not_retryable() {
            let server = MockServer::start().await;
            let signed = signed_rfq("did:key:pfi");
            let exchange_id = signed.message.exchange_id().clone();

            Mock::given(method("POST"))
                .and(path(format!("/exchanges/{exchange_id}/messages")))
                .respond_with(ResponseTemplate::new(401).set_body_string("bad signature"))
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let err = gateway
                .submit(MessageKind::Rfq, &signed)
                .await
                .unwrap_err();

            assert!(!err.is_retryable());
            assert!(err.to_string().contains("authentication failed"));
        }

        #[tokio::test]
        async fn slow_server_times_out() {
            let server = MockServer::start().await;
            let signed = signed_rfq("did:key:pfi");
            let exchange_id = signed.message.exchange_id().clone();

            Mock::given(method("POST"))
                .and(path(format!("/exchanges/{exchange_id}/messages")))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(ack_body("msg_1"))
                        .set_delay(Duration::from_millis(500)),
                )
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 100).unwrap();
            let err = gateway
                .submit(MessageKind::Rfq, &signed)
                .await
                .unwrap_err();

            assert!(err.is_retryable());
            assert!(matches!(err, GatewayError::Timeout { .. }));
        }
    }

    mod fetch_history {
        use super::*;
        use crate::domain::messages::{QuoteMessage, QuotedSide};

        fn quote_message(exchange_id: &ExchangeId) -> Message {
            let body = QuoteMessage::new(
                Timestamp::now().add_secs(300),
                QuotedSide::new("USD", Decimal::new(100, 0)),
                QuotedSide::new("MXN", Decimal::new(1857, 1)),
            );
            Message::quote(
                &PfiId::from("did:key:pfi"),
                &CustomerId::from("did:key:alice"),
                exchange_id.clone(),
                body,
            )
        }

        #[tokio::test]
        async fn returns_messages_and_signs_request() {
            let server = MockServer::start().await;
            let exchange_id = ExchangeId::from("exch_1");
            let history = serde_json::json!({
                "data": [serde_json::to_value(quote_message(&exchange_id)).unwrap()],
            });

            Mock::given(method("GET"))
                .and(path("/exchanges/exch_1"))
                .and(header_exists("x-request-key-id"))
                .and(header_exists("x-request-signature"))
                .respond_with(ResponseTemplate::new(200).set_body_json(history))
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let messages = gateway
                .fetch_history(
                    &PfiId::from("did:key:pfi"),
                    &exchange_id,
                    &test_credentials(),
                )
                .await
                .unwrap();

            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].kind(), MessageKind::Quote);
            assert_eq!(messages[0].exchange_id(), &exchange_id);
        }

        #[tokio::test]
        async fn malformed_body_is_protocol_error() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/exchanges/exch_1"))
                .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let err = gateway
                .fetch_history(
                    &PfiId::from("did:key:pfi"),
                    &ExchangeId::from("exch_1"),
                    &test_credentials(),
                )
                .await
                .unwrap_err();

            assert!(matches!(err, GatewayError::Protocol { .. }));
        }

        #[tokio::test]
        async fn endpoint_override_routes_by_pfi() {
            let default_server = MockServer::start().await;
            let override_server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/exchanges/exch_1"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({ "data": [] })),
                )
                .mount(&override_server)
                .await;

            let gateway = HttpMessageGateway::new(default_server.uri(), 5000)
                .unwrap()
                .with_endpoint(PfiId::from("did:key:other-pfi"), override_server.uri());

            let messages = gateway
                .fetch_history(
                    &PfiId::from("did:key:other-pfi"),
                    &ExchangeId::from("exch_1"),
                    &test_credentials(),
                )
                .await
                .unwrap();

            assert!(messages.is_empty());
        }
    }

    mod offerings {
        use super::*;

        fn offering_body() -> serde_json::Value {
            let offering = Offering::new(
                OfferingId::from("offering_usd_mxn"),
                PfiId::from("did:key:pfi"),
                "USD to MXN",
                CurrencyCode::new("USD").unwrap(),
                CurrencyCode::new("MXN").unwrap(),
                Decimal::new(1857, 2),
            );
            serde_json::json!({ "data": serde_json::to_value(offering).unwrap() })
        }

        #[tokio::test]
        async fn finds_offering() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/offerings/offering_usd_mxn"))
                .respond_with(ResponseTemplate::new(200).set_body_json(offering_body()))
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let offering = gateway
                .find_offering(&OfferingId::from("offering_usd_mxn"))
                .await
                .unwrap();

            assert_eq!(offering.pfi_id.as_str(), "did:key:pfi");
            assert_eq!(offering.rate, Decimal::new(1857, 2));
        }

        #[tokio::test]
        async fn missing_offering_is_not_found() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/offerings/offering_gone"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;

            let gateway = HttpMessageGateway::new(server.uri(), 5000).unwrap();
            let err = gateway
                .find_offering(&OfferingId::from("offering_gone"))
                .await
                .unwrap_err();

            assert!(err.is_not_found());
        }
    }

    mod status_mapping {
        use super::*;

        #[test]
        fn trailing_slash_is_trimmed() {
            assert_eq!(trim_base("http://pfi.example/".to_string()), "http://pfi.example");
            assert_eq!(trim_base("http://pfi.example".to_string()), "http://pfi.example");
        }

        #[test]
        fn empty_rejection_body_gets_default_reason() {
            let err = map_status_error(StatusCode::CONFLICT, None, "");
            assert!(err.is_rejection());
            assert!(err.to_string().contains("rejected by counterparty"));
        }

        #[test]
        fn unexpected_status_is_protocol_error() {
            let err = map_status_error(StatusCode::SWITCHING_PROTOCOLS, None, "odd");
            assert!(matches!(err, GatewayError::Protocol { .. }));
        }
    }
}
