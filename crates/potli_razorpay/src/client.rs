//! Minimal Razorpay REST client: orders, payments, captures and refunds.

use crate::error::RazorpayError;
use potli_common::HTTP_CLIENT;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

#[derive(Serialize, Debug, Clone)]
pub struct CreateOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: HashMap<String, String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RazorpayPayment {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    /// created, authorized, captured, refunded or failed
    pub status: String,
    pub order_id: Option<String>,
    pub method: Option<String>,
    #[serde(default)]
    pub captured: bool,
    pub created_at: Option<i64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RazorpayRefund {
    pub id: String,
    pub amount: i64,
    pub status: Option<String>,
    pub created_at: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    description: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RazorpayClient {
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(key_id: &str, key_secret: &str, base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .filter(|b| !b.is_empty())
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("Razorpay {} {}", method, url);
        HTTP_CLIENT
            .request(method, url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, RazorpayError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.error.description.or(b.error.code))
                .unwrap_or(text);
            return Err(RazorpayError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn create_order(&self, order: &CreateOrderRequest) -> Result<RazorpayOrder, RazorpayError> {
        let response = self.request(Method::POST, "/orders").json(order).send().await?;
        Self::parse(response).await
    }

    pub async fn fetch_payment(&self, payment_id: &str) -> Result<RazorpayPayment, RazorpayError> {
        let response = self
            .request(Method::GET, &format!("/payments/{}", payment_id))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn capture_payment(
        &self,
        payment_id: &str,
        amount: i64,
        currency: &str,
    ) -> Result<RazorpayPayment, RazorpayError> {
        let response = self
            .request(Method::POST, &format!("/payments/{}/capture", payment_id))
            .json(&serde_json::json!({ "amount": amount, "currency": currency }))
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn refund_payment(&self, payment_id: &str, amount: i64) -> Result<RazorpayRefund, RazorpayError> {
        let response = self
            .request(Method::POST, &format!("/payments/{}/refund", payment_id))
            .json(&serde_json::json!({ "amount": amount }))
            .send()
            .await?;
        Self::parse(response).await
    }
}
