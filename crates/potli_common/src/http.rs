// --- File: crates/potli_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::error::{HttpStatusCode, PotliError};

pub mod client;

impl IntoResponse for PotliError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

/// A JSON body with an explicit status, for routes whose wire format is fixed.
pub type JsonResponse = (StatusCode, Json<Value>);

/// `{ "message": message }` with `status`.
pub fn message_response(status: StatusCode, message: impl Into<String>) -> JsonResponse {
    (status, Json(json!({ "message": message.into() })))
}

/// `{ "message": message, "error": detail }`, used for 500s.
pub fn failure_response(
    status: StatusCode,
    message: impl Into<String>,
    detail: impl std::fmt::Display,
) -> JsonResponse {
    (
        status,
        Json(json!({ "message": message.into(), "error": detail.to_string() })),
    )
}
