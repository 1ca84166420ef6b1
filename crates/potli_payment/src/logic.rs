use potli_common::models::{PaymentSession, PaymentSessionStatus};

/// Registry key for a provider identifier: `razorpay` -> `pp_razorpay_razorpay`.
pub fn provider_id_for(identifier: &str) -> String {
    format!("pp_{0}_{0}", identifier)
}

/// Matches the canonical provider id and any id mentioning the identifier.
pub fn is_provider_session(session: &PaymentSession, identifier: &str) -> bool {
    session.provider_id == provider_id_for(identifier) || session.provider_id.contains(identifier)
}

/// Collection status that follows a session reaching `status`.
pub fn collection_status(status: PaymentSessionStatus) -> &'static str {
    match status {
        PaymentSessionStatus::Pending => "not_paid",
        PaymentSessionStatus::RequiresMore => "awaiting",
        PaymentSessionStatus::Authorized => "authorized",
        PaymentSessionStatus::Captured => "completed",
        PaymentSessionStatus::Canceled => "canceled",
        PaymentSessionStatus::Error => "failed",
    }
}

/// Sessions that can still be authorized.
pub fn is_open(status: PaymentSessionStatus) -> bool {
    matches!(
        status,
        PaymentSessionStatus::Pending | PaymentSessionStatus::RequiresMore
    )
}
