//! WhatsApp Notification Service
//!
//! Best-effort customer notifications over an external WhatsApp gateway.
//!
//! # Readiness
//!
//! The gateway session starts unauthenticated: linking it to a phone requires
//! a human to approve a pairing code out of band. The service therefore
//! begins in a not-ready state and runs the handshake in a background task;
//! until it completes, every send is a no-op that reports failure. Callers
//! must treat delivery as best-effort: a lost confirmation message never
//! rolls back the order transition that triggered it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Default country code prefixed to bare local numbers (India).
const DEFAULT_COUNTRY_CODE: &str = "91";

/// Outbound message transport.
///
/// The seam between the notification service and whatever actually moves
/// messages. `connect` performs the one-time session handshake and returns
/// once messages can be delivered; `send_text` delivers one message to an
/// already-canonicalized number.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn connect(&self) -> anyhow::Result<()>;
    async fn send_text(&self, number: &str, body: &str) -> anyhow::Result<()>;
}

/// WhatsApp notification service
///
/// Cheap to clone; all clones share the readiness flag.
#[derive(Clone)]
pub struct WhatsAppService {
    inner: Arc<Inner>,
}

struct Inner {
    ready: AtomicBool,
    transport: Option<Arc<dyn MessageTransport>>,
}

impl std::fmt::Debug for WhatsAppService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppService")
            .field("ready", &self.is_ready())
            .field("transport", &self.inner.transport.is_some())
            .finish()
    }
}

impl WhatsAppService {
    /// Create a service over the given transport. Not ready until
    /// [`start_handshake`](Self::start_handshake) completes.
    pub fn new(transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                ready: AtomicBool::new(false),
                transport: Some(transport),
            }),
        }
    }

    /// Create a service with no transport at all.
    ///
    /// Used when no gateway is configured: the server stays fully functional
    /// and every send reports failure.
    pub fn disconnected() -> Self {
        Self {
            inner: Arc::new(Inner {
                ready: AtomicBool::new(false),
                transport: None,
            }),
        }
    }

    /// Kick off the session handshake in a background task.
    ///
    /// Readiness flips to true when the transport reports a linked session.
    /// A failed handshake leaves the service not ready; sends keep reporting
    /// failure rather than erroring.
    pub fn start_handshake(&self) {
        let Some(transport) = self.inner.transport.clone() else {
            tracing::warn!("No WhatsApp gateway configured; order confirmations will not be sent");
            return;
        };

        let inner = self.inner.clone();
        tokio::spawn(async move {
            match transport.connect().await {
                Ok(()) => {
                    inner.ready.store(true, Ordering::SeqCst);
                    tracing::info!("WhatsApp gateway session is ready");
                }
                Err(e) => {
                    tracing::error!(error = %e, "WhatsApp gateway handshake failed");
                }
            }
        });
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    /// Send the order confirmation message. Returns delivery success.
    ///
    /// Never returns an error: not-ready, missing transport and transport
    /// failures all log and report `false`.
    pub async fn send_order_confirmation(&self, phone: &str, order_id: i64, otp: &str) -> bool {
        let body = confirmation_message(order_id, otp);
        self.send_message(phone, &body).await
    }

    async fn send_message(&self, phone: &str, body: &str) -> bool {
        if !self.is_ready() {
            tracing::warn!("WhatsApp gateway not ready yet; message dropped");
            return false;
        }
        let Some(transport) = &self.inner.transport else {
            return false;
        };

        let number = canonical_phone(phone);
        match transport.send_text(&number, body).await {
            Ok(()) => {
                tracing::info!(number = %number, "WhatsApp message sent");
                true
            }
            Err(e) => {
                tracing::warn!(number = %number, error = %e, "Failed to send WhatsApp message");
                false
            }
        }
    }
}

/// Canonicalize a customer phone number for the gateway:
/// strip everything that is not a digit, then prefix the country code
/// unless it is already there.
fn canonical_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with(DEFAULT_COUNTRY_CODE) {
        digits
    } else {
        format!("{DEFAULT_COUNTRY_CODE}{digits}")
    }
}

/// Fixed confirmation template embedding order id and OTP.
fn confirmation_message(order_id: i64, otp: &str) -> String {
    format!(
        "🍽️ *Daily Food House*\n\n\
         Your order #{order_id} has been confirmed!\n\n\
         ✅ Order Status: Confirmed\n\
         🔢 OTP: *{otp}*\n\n\
         📍 Please share this OTP with the delivery partner when your order arrives.\n\n\
         Thank you for choosing Daily Food House! 😊"
    )
}

// ========== HTTP gateway transport ==========

/// Transport over a self-hosted WhatsApp HTTP gateway.
///
/// Expected gateway surface:
/// - `GET  {base}/session/status` → `{"status": "connected" | "pairing" | ..., "pairingCode": "..."}`
/// - `POST {base}/messages` with `{"number": ..., "body": ...}`
pub struct HttpGatewayTransport {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionStatus {
    status: String,
    pairing_code: Option<String>,
}

impl HttpGatewayTransport {
    /// Poll interval while waiting for the operator to link the device.
    const POLL_INTERVAL: Duration = Duration::from_secs(5);
    /// Give up after this many polls (~10 minutes).
    const MAX_POLLS: u32 = 120;

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MessageTransport for HttpGatewayTransport {
    async fn connect(&self) -> anyhow::Result<()> {
        let url = format!("{}/session/status", self.base_url);
        let mut announced_code: Option<String> = None;

        for _ in 0..Self::MAX_POLLS {
            match self.client.get(&url).send().await {
                Ok(resp) => {
                    let status: SessionStatus = resp.error_for_status()?.json().await?;
                    if status.status == "connected" {
                        return Ok(());
                    }
                    // Surface the pairing code once so the operator can link
                    // the device from their phone.
                    if let Some(code) = status.pairing_code {
                        if announced_code.as_deref() != Some(code.as_str()) {
                            tracing::info!(
                                pairing_code = %code,
                                "Link the WhatsApp device to complete the gateway handshake"
                            );
                            announced_code = Some(code);
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "WhatsApp gateway unreachable, retrying");
                }
            }
            tokio::time::sleep(Self::POLL_INTERVAL).await;
        }

        anyhow::bail!("WhatsApp gateway did not reach a linked session in time")
    }

    async fn send_text(&self, number: &str, body: &str) -> anyhow::Result<()> {
        let url = format!("{}/messages", self.base_url);
        self.client
            .post(&url)
            .json(&serde_json::json!({ "number": number, "body": body }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OkTransport;

    #[async_trait]
    impl MessageTransport for OkTransport {
        async fn connect(&self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn send_text(&self, _number: &str, _body: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn canonical_phone_strips_and_prefixes() {
        assert_eq!(canonical_phone("98765 43210"), "919876543210");
        assert_eq!(canonical_phone("+91-9876543210"), "919876543210");
        assert_eq!(canonical_phone("919876543210"), "919876543210");
        assert_eq!(canonical_phone("(983) 027-1851"), "919830271851");
    }

    #[test]
    fn confirmation_message_embeds_id_and_otp() {
        let msg = confirmation_message(42, "4821");
        assert!(msg.contains("#42"));
        assert!(msg.contains("*4821*"));
    }

    #[tokio::test]
    async fn send_before_readiness_is_a_failed_noop() {
        let service = WhatsAppService::new(Arc::new(OkTransport));
        assert!(!service.is_ready());
        assert!(!service.send_order_confirmation("9876543210", 1, "1234").await);
    }

    #[tokio::test]
    async fn send_succeeds_once_ready() {
        let service = WhatsAppService::new(Arc::new(OkTransport));
        service.start_handshake();
        // Handshake is instantaneous with OkTransport; give the task a tick.
        for _ in 0..100 {
            if service.is_ready() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert!(service.is_ready());
        assert!(service.send_order_confirmation("9876543210", 1, "1234").await);
    }

    #[tokio::test]
    async fn disconnected_service_never_becomes_ready() {
        let service = WhatsAppService::disconnected();
        service.start_handshake();
        assert!(!service.is_ready());
        assert!(!service.send_order_confirmation("9876543210", 1, "1234").await);
    }
}
