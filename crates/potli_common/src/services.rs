// --- File: crates/potli_common/src/services.rs ---
//! Provider contracts.
//!
//! Feature crates implement these traits against a vendor (Razorpay, R2,
//! Resend); everything else talks to the traits. The backend hands the
//! implementations out through a [`ServiceFactory`] with errors erased to
//! [`BoxedError`] so handlers never depend on a vendor crate directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use crate::models::{PaymentData, PaymentSessionStatus};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

impl BoxedError {
    pub fn new<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        BoxedError(Box::new(err))
    }
}

// --- Payments ---

/// Cart facts passed to a provider when a session is opened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentContext {
    pub cart_id: Option<String>,
    pub region_id: Option<String>,
    pub customer_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentInput {
    /// Smallest currency unit; providers round before use.
    pub amount: f64,
    pub currency_code: String,
    #[serde(default)]
    pub context: PaymentContext,
    #[serde(default)]
    pub data: PaymentData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentOutput {
    /// Provider-side reference, e.g. a Razorpay order id.
    pub id: String,
    pub status: PaymentSessionStatus,
    pub data: PaymentData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizePaymentOutput {
    pub status: PaymentSessionStatus,
    pub data: PaymentData,
}

/// What a provider webhook asks the payment module to do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentAction {
    Authorized,
    Captured,
    Failed,
    NotSupported,
}

#[derive(Debug, Clone, Default)]
pub struct WebhookPayload {
    pub data: Value,
    pub raw_data: Vec<u8>,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookActionResult {
    pub action: PaymentAction,
    pub data: Option<Value>,
}

/// The payment lifecycle a gateway adapter must support.
///
/// Every operation takes the session's stored `data` and returns the data to
/// store next; providers merge their own fields into it.
pub trait PaymentProvider: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Short name such as `razorpay`.
    fn identifier(&self) -> &str;

    /// Registry key for sessions, `pp_{identifier}_{identifier}`.
    fn provider_id(&self) -> String {
        format!("pp_{0}_{0}", self.identifier())
    }

    fn initiate_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> BoxFuture<'_, InitiatePaymentOutput, Self::Error>;

    /// `context` carries what the storefront collected from the checkout widget.
    fn authorize_payment(
        &self,
        data: PaymentData,
        context: PaymentData,
    ) -> BoxFuture<'_, AuthorizePaymentOutput, Self::Error>;

    fn update_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error>;

    fn capture_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error>;

    fn cancel_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error>;

    fn delete_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error>;

    fn retrieve_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error>;

    fn refund_payment(
        &self,
        data: PaymentData,
        amount: f64,
    ) -> BoxFuture<'_, PaymentData, Self::Error>;

    fn get_payment_status(
        &self,
        data: PaymentData,
    ) -> BoxFuture<'_, PaymentSessionStatus, Self::Error>;

    fn get_webhook_action_and_data(
        &self,
        payload: WebhookPayload,
    ) -> BoxFuture<'_, WebhookActionResult, Self::Error>;
}

// --- Files ---

#[derive(Debug, Clone)]
pub enum FileContent {
    Bytes(Vec<u8>),
    /// Base64 encoded body, as admin uploads arrive from JSON clients.
    Base64(String),
}

/// A file handed to a [`FileProvider`]. Callers fill whichever name field they have.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: Option<String>,
    pub original_name: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub content: FileContent,
}

impl UploadFile {
    pub fn from_bytes(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            original_name: None,
            name: None,
            id: None,
            url: None,
            content_type: Some(content_type.into()),
            content: FileContent::Bytes(bytes),
        }
    }
}

/// Identifies a stored file for deletion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: Option<String>,
    pub url: Option<String>,
    pub filename: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedFile {
    pub url: String,
    pub key: String,
}

pub trait FileProvider: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    fn upload(&self, file: UploadFile) -> BoxFuture<'_, UploadedFile, Self::Error>;

    /// Best effort; implementations log failures instead of returning them.
    fn delete(&self, file: FileDescriptor) -> BoxFuture<'_, (), Self::Error>;
}

// --- Notifications ---

/// Fully rendered content that bypasses the provider's templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationContent {
    pub subject: String,
    pub html: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub channel: String,
    pub template: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub content: Option<NotificationContent>,
}

impl Notification {
    pub fn email(to: impl Into<String>, template: impl Into<String>, data: Value) -> Self {
        Self {
            to: to.into(),
            channel: "email".to_string(),
            template: template.into(),
            data,
            content: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Provider message id; `None` when nothing was sent.
    pub id: Option<String>,
}

pub trait NotificationProvider: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    fn send(&self, notification: Notification) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// Erases a provider's concrete error into [`BoxedError`] so it can sit behind
/// `dyn PaymentProvider<Error = BoxedError>` and friends.
pub struct Boxed<T>(pub T);

fn boxed<E: StdError + Send + Sync + 'static>(err: E) -> BoxedError {
    BoxedError::new(err)
}

impl<P: PaymentProvider> PaymentProvider for Boxed<P> {
    type Error = BoxedError;

    fn identifier(&self) -> &str {
        self.0.identifier()
    }

    fn provider_id(&self) -> String {
        self.0.provider_id()
    }

    fn initiate_payment(
        &self,
        input: InitiatePaymentInput,
    ) -> BoxFuture<'_, InitiatePaymentOutput, Self::Error> {
        Box::pin(async move { self.0.initiate_payment(input).await.map_err(boxed) })
    }

    fn authorize_payment(
        &self,
        data: PaymentData,
        context: PaymentData,
    ) -> BoxFuture<'_, AuthorizePaymentOutput, Self::Error> {
        Box::pin(async move { self.0.authorize_payment(data, context).await.map_err(boxed) })
    }

    fn update_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { self.0.update_payment(data).await.map_err(boxed) })
    }

    fn capture_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { self.0.capture_payment(data).await.map_err(boxed) })
    }

    fn cancel_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { self.0.cancel_payment(data).await.map_err(boxed) })
    }

    fn delete_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { self.0.delete_payment(data).await.map_err(boxed) })
    }

    fn retrieve_payment(&self, data: PaymentData) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { self.0.retrieve_payment(data).await.map_err(boxed) })
    }

    fn refund_payment(
        &self,
        data: PaymentData,
        amount: f64,
    ) -> BoxFuture<'_, PaymentData, Self::Error> {
        Box::pin(async move { self.0.refund_payment(data, amount).await.map_err(boxed) })
    }

    fn get_payment_status(
        &self,
        data: PaymentData,
    ) -> BoxFuture<'_, PaymentSessionStatus, Self::Error> {
        Box::pin(async move { self.0.get_payment_status(data).await.map_err(boxed) })
    }

    fn get_webhook_action_and_data(
        &self,
        payload: WebhookPayload,
    ) -> BoxFuture<'_, WebhookActionResult, Self::Error> {
        Box::pin(async move { self.0.get_webhook_action_and_data(payload).await.map_err(boxed) })
    }
}

impl<F: FileProvider> FileProvider for Boxed<F> {
    type Error = BoxedError;

    fn upload(&self, file: UploadFile) -> BoxFuture<'_, UploadedFile, Self::Error> {
        Box::pin(async move { self.0.upload(file).await.map_err(boxed) })
    }

    fn delete(&self, file: FileDescriptor) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move { self.0.delete(file).await.map_err(boxed) })
    }
}

impl<N: NotificationProvider> NotificationProvider for Boxed<N> {
    type Error = BoxedError;

    fn send(&self, notification: Notification) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move { self.0.send(notification).await.map_err(boxed) })
    }
}

pub type SharedFileProvider = Arc<dyn FileProvider<Error = BoxedError>>;
pub type SharedNotificationProvider = Arc<dyn NotificationProvider<Error = BoxedError>>;

/// Hands out the configured providers.
pub trait ServiceFactory: Send + Sync {
    /// Provider registered under `provider_id` (`pp_razorpay_razorpay`).
    fn payment_provider(
        &self,
        provider_id: &str,
    ) -> Option<Arc<dyn PaymentProvider<Error = BoxedError>>>;

    fn payment_providers(&self) -> Vec<Arc<dyn PaymentProvider<Error = BoxedError>>>;

    fn file_provider(&self) -> Option<SharedFileProvider>;

    fn notification_provider(&self) -> Option<SharedNotificationProvider>;
}
