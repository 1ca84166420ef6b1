// --- File: crates/services/potli_backend/src/service_factory.rs ---
//! Builds the vendor providers enabled by cargo features and runtime flags.
use potli_common::services::{
    BoxedError, PaymentProvider, ServiceFactory, SharedFileProvider, SharedNotificationProvider,
};
use potli_config::AppConfig;
use std::collections::HashMap;
use std::sync::Arc;
#[allow(unused_imports)] // which ones are used depends on the enabled features
use {
    potli_common::services::Boxed,
    tracing::{error, info, warn},
};

#[cfg(feature = "razorpay")]
use potli_razorpay::RazorpayProviderService;

#[cfg(feature = "r2")]
use potli_r2::R2FileService;

#[cfg(feature = "resend")]
use potli_resend::ResendNotificationService;

type SharedPaymentProvider = Arc<dyn PaymentProvider<Error = BoxedError>>;

/// Providers are created once at start-up. A provider whose config is
/// incomplete is logged and left out rather than failing the server.
pub struct PotliServiceFactory {
    payment_providers: HashMap<String, SharedPaymentProvider>,
    file_provider: Option<SharedFileProvider>,
    notification_provider: Option<SharedNotificationProvider>,
}

impl PotliServiceFactory {
    #[allow(unused_variables)]
    pub fn new(config: &Arc<AppConfig>) -> Self {
        #[allow(unused_mut)]
        let mut factory = Self {
            payment_providers: HashMap::new(),
            file_provider: None,
            notification_provider: None,
        };

        #[cfg(feature = "razorpay")]
        if potli_common::is_razorpay_enabled(config) {
            if let Some(razorpay) = config.razorpay.clone() {
                match RazorpayProviderService::new(razorpay) {
                    Ok(service) => {
                        let provider: SharedPaymentProvider = Arc::new(Boxed(service));
                        info!("✅ Razorpay payment provider registered as {}", provider.provider_id());
                        factory.payment_providers.insert(provider.provider_id(), provider);
                    }
                    Err(e) => error!("🚨 Razorpay provider not available: {}", e),
                }
            }
        } else {
            info!("ℹ️ Razorpay disabled");
        }

        #[cfg(feature = "r2")]
        if potli_common::is_r2_enabled(config) {
            if let Some(r2) = config.r2.as_ref() {
                match R2FileService::new(r2) {
                    Ok(service) => factory.file_provider = Some(Arc::new(Boxed(service))),
                    Err(e) => error!("🚨 R2 file provider not available: {}", e),
                }
            }
        } else {
            warn!("ℹ️ R2 disabled, hero banner uploads will fail");
        }

        #[cfg(feature = "resend")]
        if potli_common::is_resend_enabled(config) {
            if let Some(resend) = config.resend.clone() {
                match ResendNotificationService::new(resend) {
                    Ok(service) => {
                        info!("✅ Resend notification provider initialized");
                        factory.notification_provider = Some(Arc::new(Boxed(service)));
                    }
                    Err(e) => error!("🚨 Resend provider not available: {}", e),
                }
            }
        } else {
            warn!("ℹ️ Resend disabled, emails will not be sent");
        }

        factory
    }
}

impl ServiceFactory for PotliServiceFactory {
    fn payment_provider(&self, provider_id: &str) -> Option<SharedPaymentProvider> {
        self.payment_providers.get(provider_id).cloned()
    }

    fn payment_providers(&self) -> Vec<SharedPaymentProvider> {
        self.payment_providers.values().cloned().collect()
    }

    fn file_provider(&self) -> Option<SharedFileProvider> {
        self.file_provider.clone()
    }

    fn notification_provider(&self) -> Option<SharedNotificationProvider> {
        self.notification_provider.clone()
    }
}
