//! Payment gateway orders and checkout signature verification.
//!
//! The hosted gateway is called over its REST API with basic auth. Without
//! keys the [`OfflineGateway`] mints local order ids so checkout can be
//! exercised end to end in development.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use util::config::AppConfig;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment gateway rejected order: {0}")]
    Rejected(String),

    #[error("Payments are not configured")]
    NotConfigured,
}

/// An order as created on the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an order for `amount` minor units.
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError>;

    /// Public key handed to the checkout widget.
    fn key_id(&self) -> &str;

    /// Checks the signature the checkout widget returned for a payment.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    /// Whether the gateway can take payments at all.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"`.
pub fn sign_payment(secret: &str, order_id: &str, payment_id: &str) -> String {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison of a hex signature against the expected HMAC.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    mac.verify_slice(&expected).is_ok()
}

pub struct RazorpayGateway {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    description: String,
}

impl RazorpayGateway {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            key_id: config.payment_key_id.clone(),
            key_secret: config.payment_key_secret.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        let response = self
            .client
            .post("https://api.razorpay.com/v1/orders")
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&serde_json::json!({
                "amount": amount,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<GatewayErrorBody>().await {
                Ok(body) => body.error.description,
                Err(_) => status.to_string(),
            };
            return Err(PaymentError::Rejected(message));
        }

        Ok(response.json::<GatewayOrder>().await?)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_payment_signature(&self.key_secret, order_id, payment_id, signature)
    }
}

/// Local stand-in used when no gateway keys are configured.
///
/// Signatures are checked against `PAYMENT_KEY_SECRET`. With an empty secret
/// the gateway refuses every order and signature.
pub struct OfflineGateway {
    key_secret: String,
}

impl OfflineGateway {
    pub fn new(key_secret: impl Into<String>) -> Self {
        Self {
            key_secret: key_secret.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for OfflineGateway {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        if !self.is_configured() {
            return Err(PaymentError::NotConfigured);
        }
        let id = format!("order_{}", uuid::Uuid::new_v4().simple());
        tracing::info!(order = %id, amount, currency, receipt, "Created offline payment order");
        Ok(GatewayOrder {
            id,
            amount,
            currency: currency.to_owned(),
        })
    }

    fn key_id(&self) -> &str {
        "offline"
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        self.is_configured()
            && verify_payment_signature(&self.key_secret, order_id, payment_id, signature)
    }

    fn is_configured(&self) -> bool {
        !self.key_secret.is_empty()
    }
}
