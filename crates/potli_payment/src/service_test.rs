use crate::mock::MockPaymentProvider;
use crate::service::{CreatePaymentSessionInput, PaymentModule, REFUNDED_TOTAL_KEY};
use crate::PaymentError;
use potli_common::models::{PaymentData, PaymentSessionStatus};
use potli_db::{init_schemas, DbClient};
use serde_json::json;
use std::sync::Arc;

pub(crate) async fn module_with_mock() -> (PaymentModule, Arc<MockPaymentProvider>) {
    let db = DbClient::in_memory().await.expect("in-memory sqlite");
    init_schemas(&db).await.expect("schemas");
    let provider = Arc::new(MockPaymentProvider::new());
    let module = PaymentModule::new(db).with_provider(provider.clone());
    (module, provider)
}

pub(crate) fn input(cart_id: &str, amount: i64) -> CreatePaymentSessionInput {
    CreatePaymentSessionInput {
        cart_id: cart_id.to_string(),
        provider_id: "pp_mock_mock".to_string(),
        amount,
        currency_code: "INR".to_string(),
        region_id: Some("reg_in".to_string()),
        ..Default::default()
    }
}

fn ok_context() -> PaymentData {
    let mut ctx = PaymentData::new();
    ctx.insert("ok".into(), json!(true));
    ctx
}

#[tokio::test]
async fn test_create_session_opens_collection() {
    let (module, provider) = module_with_mock().await;
    assert_eq!(module.provider_ids(), vec!["pp_mock_mock".to_string()]);

    let session = module.create_session(input("cart_1", 49900)).await.unwrap();
    assert_eq!(session.status, PaymentSessionStatus::Pending);
    assert_eq!(session.currency_code, "inr");
    assert_eq!(session.data["order_id"], json!("order_mock"));
    assert_eq!(session.data["cart_id"], json!("cart_1"));

    let collection = module.find_collection_by_cart("cart_1").await.unwrap().unwrap();
    assert_eq!(collection.amount, 49900);
    assert_eq!(collection.status, "not_paid");
    assert_eq!(session.payment_collection_id, collection.id);
    assert_eq!(provider.calls(), vec!["initiate"]);
}

#[tokio::test]
async fn test_new_session_replaces_open_one() {
    let (module, provider) = module_with_mock().await;
    let first = module.create_session(input("cart_1", 100)).await.unwrap();
    let second = module.create_session(input("cart_1", 250)).await.unwrap();

    let sessions = module.list_sessions(&second.payment_collection_id).await.unwrap();
    assert_eq!(sessions.len(), 2);
    let stale = sessions.iter().find(|s| s.id == first.id).unwrap();
    assert_eq!(stale.status, PaymentSessionStatus::Canceled);
    assert_eq!(
        module.find_collection_by_cart("cart_1").await.unwrap().unwrap().amount,
        250
    );
    assert_eq!(provider.calls(), vec!["initiate", "delete", "initiate"]);
}

#[tokio::test]
async fn test_unknown_provider() {
    let (module, _) = module_with_mock().await;
    let mut bad = input("cart_1", 100);
    bad.provider_id = "pp_stripe_stripe".to_string();
    let err = module.create_session(bad).await.unwrap_err();
    assert!(matches!(err, PaymentError::ProviderNotFound(_)));
    assert!(module.find_collection_by_cart("cart_1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_provider_error_is_surfaced() {
    let (module, _) = module_with_mock().await;
    let err = module.create_session(input("cart_1", 0)).await.unwrap_err();
    assert_eq!(err.to_string(), "Amount must be greater than zero");
}

#[tokio::test]
async fn test_authorize_capture_refund_flow() {
    let (module, provider) = module_with_mock().await;
    let session = module.create_session(input("cart_1", 1000)).await.unwrap();

    let err = module.authorize_session(&session.id, PaymentData::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid payment signature");

    let err = module.capture_session(&session.id).await.unwrap_err();
    assert!(matches!(err, PaymentError::InvalidState(_)));

    let authorized = module.authorize_session(&session.id, ok_context()).await.unwrap();
    assert_eq!(authorized.status, PaymentSessionStatus::Authorized);
    assert!(authorized.authorized_at.is_some());
    assert_eq!(authorized.data["payment_id"], json!("pay_mock"));
    let collection = module.find_collection_by_cart("cart_1").await.unwrap().unwrap();
    assert_eq!(collection.status, "authorized");

    // Idempotent once authorized.
    module.authorize_session(&session.id, PaymentData::new()).await.unwrap();

    let captured = module.capture_session(&session.id).await.unwrap();
    assert_eq!(captured.status, PaymentSessionStatus::Captured);
    assert_eq!(captured.data["captured"], json!(true));

    let err = module.refund_session(&session.id, 5000).await.unwrap_err();
    assert!(matches!(err, PaymentError::Validation(_)));
    let refunded = module.refund_session(&session.id, 400).await.unwrap();
    assert_eq!(refunded.data["refund_amount"], json!(400));
    assert_eq!(refunded.status, PaymentSessionStatus::Captured);

    assert_eq!(
        provider.calls(),
        vec!["initiate", "authorize", "authorize", "capture", "refund"]
    );
}

#[tokio::test]
async fn test_refunds_accumulate_up_to_the_captured_amount() {
    let (module, provider) = module_with_mock().await;
    let session = module.create_session(input("cart_1", 500)).await.unwrap();
    module.authorize_session(&session.id, ok_context()).await.unwrap();
    module.capture_session(&session.id).await.unwrap();

    let first = module.refund_session(&session.id, 400).await.unwrap();
    assert_eq!(first.data[REFUNDED_TOTAL_KEY], json!(400));

    let err = module.refund_session(&session.id, 400).await.unwrap_err();
    assert!(matches!(err, PaymentError::Validation(_)));
    assert!(err.to_string().contains("refundable amount 100"));

    let last = module.refund_session(&session.id, 100).await.unwrap();
    assert_eq!(last.data[REFUNDED_TOTAL_KEY], json!(500));
    let err = module.refund_session(&session.id, 1).await.unwrap_err();
    assert!(matches!(err, PaymentError::Validation(_)));

    let stored = module.retrieve_session(&session.id).await.unwrap();
    assert_eq!(stored.data[REFUNDED_TOTAL_KEY], json!(500));
    assert_eq!(
        provider.calls(),
        vec!["initiate", "authorize", "capture", "refund", "refund"]
    );
}

#[tokio::test]
async fn test_cancel_and_refresh() {
    let (module, provider) = module_with_mock().await;
    let session = module.create_session(input("cart_1", 1000)).await.unwrap();

    *provider.status.lock().unwrap() = PaymentSessionStatus::Authorized;
    let refreshed = module.refresh_session_status(&session.id).await.unwrap();
    assert_eq!(refreshed.status, PaymentSessionStatus::Authorized);
    assert!(refreshed.authorized_at.is_some());

    // Pending never downgrades a settled session.
    *provider.status.lock().unwrap() = PaymentSessionStatus::Pending;
    let refreshed = module.refresh_session_status(&session.id).await.unwrap();
    assert_eq!(refreshed.status, PaymentSessionStatus::Authorized);

    let canceled = module.cancel_session(&session.id).await.unwrap();
    assert_eq!(canceled.status, PaymentSessionStatus::Canceled);
    assert_eq!(canceled.data["status"], json!("canceled"));
    assert_eq!(
        module.find_collection_by_cart("cart_1").await.unwrap().unwrap().status,
        "canceled"
    );

    let err = module.authorize_session(&session.id, ok_context()).await.unwrap_err();
    assert!(matches!(err, PaymentError::InvalidState(_)));
}

#[tokio::test]
async fn test_missing_session() {
    let (module, _) = module_with_mock().await;
    let err = module.capture_session("payses_missing").await.unwrap_err();
    assert!(matches!(err, PaymentError::SessionNotFound(_)));
}
