// --- File: crates/potli_auth/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use crate::handlers::{
    CheckEmailRequest, CreateCustomerRequest, LoginRequest, ResetPasswordRequest, VerifyEmailQuery,
};
use utoipa::OpenApi;

#[utoipa::path(
    get,
    path = "/auth/verify-email",
    params(VerifyEmailQuery),
    responses(
        (status = 302, description = "Redirect to the storefront with ?verified=true or ?error=<code>")
    ),
    tag = "Auth"
)]
fn doc_verify_email_handler() {}

#[utoipa::path(
    post,
    path = "/store/auth/check-email-verified",
    request_body(content = CheckEmailRequest, example = json!({"email": "jane@example.com"})),
    responses(
        (status = 200, description = "{can_login: true}"),
        (status = 400, description = "Email is required"),
        (status = 403, description = "{can_login: false, code: EMAIL_NOT_VERIFIED, message}"),
        (status = 500, description = "Unable to verify email status")
    ),
    tag = "Auth"
)]
fn doc_check_email_verified_handler() {}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 400, description = "Email and password are required"),
        (status = 410, description = "DEPRECATED_ENDPOINT")
    ),
    tag = "Auth"
)]
fn doc_login_handler() {}

#[utoipa::path(
    post,
    path = "/store/customers",
    request_body(content = CreateCustomerRequest, example = json!({
        "email": "jane@example.com",
        "first_name": "Jane"
    })),
    responses(
        (status = 200, description = "{customer}; a verification email follows"),
        (status = 400, description = "Email is required"),
        (status = 409, description = "Customer with this email already exists")
    ),
    tag = "Customers"
)]
fn doc_create_customer_handler() {}

#[utoipa::path(
    post,
    path = "/auth/{actor_type}/emailpass/reset-password",
    params(("actor_type" = String, Path, description = "`customer` or `user`")),
    request_body(content = ResetPasswordRequest, example = json!({"identifier": "jane@example.com"})),
    responses(
        (status = 201, description = "Accepted; an email is sent when the identity exists")
    ),
    tag = "Auth"
)]
fn doc_reset_password_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_verify_email_handler,
        doc_check_email_verified_handler,
        doc_login_handler,
        doc_create_customer_handler,
        doc_reset_password_handler
    ),
    components(schemas(CheckEmailRequest, CreateCustomerRequest, LoginRequest, ResetPasswordRequest)),
    tags((name = "Auth", description = "Email verification and password reset"), (name = "Customers", description = "Storefront registration"))
)]
pub struct AuthApiDoc;
