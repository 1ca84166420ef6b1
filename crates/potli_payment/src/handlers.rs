use crate::service::{CreatePaymentSessionInput, PaymentModule};
use axum::{
    extract::{Path, State},
    Json,
};
use potli_common::models::PaymentData;
use potli_common::PotliError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentState {
    pub payments: Arc<PaymentModule>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug)]
pub struct CreatePaymentSessionRequest {
    #[cfg_attr(feature = "openapi", schema(example = "pp_razorpay_razorpay"))]
    pub provider_id: String,
    /// Minor units, e.g. paise.
    #[cfg_attr(feature = "openapi", schema(example = 49900))]
    pub amount: i64,
    #[cfg_attr(feature = "openapi", schema(example = "inr"))]
    pub currency_code: String,
    pub region_id: Option<String>,
    pub customer_id: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: PaymentData,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug)]
pub struct RefundRequest {
    #[cfg_attr(feature = "openapi", schema(example = 10000))]
    pub amount: i64,
}

#[axum::debug_handler]
pub async fn create_payment_session_handler(
    State(state): State<Arc<PaymentState>>,
    Path(cart_id): Path<String>,
    Json(payload): Json<CreatePaymentSessionRequest>,
) -> Result<Json<Value>, PotliError> {
    let session = state
        .payments
        .create_session(CreatePaymentSessionInput {
            cart_id,
            provider_id: payload.provider_id,
            amount: payload.amount,
            currency_code: payload.currency_code,
            region_id: payload.region_id,
            customer_id: payload.customer_id,
            email: payload.email,
            data: payload.data,
        })
        .await?;
    Ok(Json(json!({ "payment_session": session })))
}

/// Returns the session with its status refreshed from the provider.
#[axum::debug_handler]
pub async fn get_payment_session_handler(
    State(state): State<Arc<PaymentState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, PotliError> {
    let session = state.payments.refresh_session_status(&id).await?;
    Ok(Json(json!({ "payment_session": session })))
}

#[axum::debug_handler]
pub async fn capture_payment_session_handler(
    State(state): State<Arc<PaymentState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, PotliError> {
    let session = state.payments.capture_session(&id).await?;
    Ok(Json(json!({ "payment_session": session })))
}

#[axum::debug_handler]
pub async fn refund_payment_session_handler(
    State(state): State<Arc<PaymentState>>,
    Path(id): Path<String>,
    Json(payload): Json<RefundRequest>,
) -> Result<Json<Value>, PotliError> {
    let session = state.payments.refund_session(&id, payload.amount).await?;
    Ok(Json(json!({ "payment_session": session })))
}

#[axum::debug_handler]
pub async fn cancel_payment_session_handler(
    State(state): State<Arc<PaymentState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, PotliError> {
    let session = state.payments.cancel_session(&id).await?;
    Ok(Json(json!({ "payment_session": session })))
}
