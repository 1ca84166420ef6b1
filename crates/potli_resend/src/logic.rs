//! Raw calls against the Resend REST API.

use crate::error::ResendError;
use potli_common::HTTP_CLIENT;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.resend.com";

#[derive(Serialize, Debug, Clone)]
pub struct SendEmailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SendEmailResponse {
    id: Option<String>,
}

/// POSTs `{base}/emails`. Non-2xx responses come back as [`ResendError::ApiError`].
pub async fn send_email(
    api_base: &str,
    api_key: &str,
    request: &SendEmailRequest,
) -> Result<Option<String>, ResendError> {
    let url = format!("{}/emails", api_base.trim_end_matches('/'));
    debug!("Sending email '{}' via {}", request.subject, url);

    let response = HTTP_CLIENT
        .post(&url)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ResendError::ApiError {
            status_code: status.as_u16(),
            message,
        });
    }

    let body: SendEmailResponse = response.json().await?;
    Ok(body.id)
}
