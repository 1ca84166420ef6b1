// --- File: crates/services/potli_backend/src/app_state.rs ---
use crate::service_factory::PotliServiceFactory;
use potli_common::services::ServiceFactory;
use potli_common::{EventBus, PotliError};
use potli_config::AppConfig;
use potli_db::{init_schemas, DbClient, SqlCustomerRepository};
use potli_payment::PaymentModule;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

#[cfg(feature = "hero_banner")]
use potli_hero_banner::HeroBannerService;

/// Shared state handed to every feature router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbClient,
    pub events: EventBus,
    pub service_factory: Arc<dyn ServiceFactory>,
    pub payments: Arc<PaymentModule>,
    /// Present when hero banners are switched on.
    #[cfg(feature = "hero_banner")]
    pub hero_banners: Option<Arc<HeroBannerService>>,
}

/// Assembles an [`AppState`] from parts; tests use it to inject an
/// in-memory database and mock providers.
pub struct AppStateBuilder {
    config: Arc<AppConfig>,
    db: DbClient,
    events: EventBus,
    service_factory: Option<Arc<dyn ServiceFactory>>,
}

impl AppStateBuilder {
    pub fn new(config: Arc<AppConfig>, db: DbClient) -> Self {
        Self {
            config,
            db,
            events: EventBus::default(),
            service_factory: None,
        }
    }

    pub fn with_service_factory(mut self, service_factory: Arc<dyn ServiceFactory>) -> Self {
        self.service_factory = Some(service_factory);
        self
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Registers every payment provider the factory offers.
    pub fn build(self) -> AppState {
        let service_factory = self
            .service_factory
            .unwrap_or_else(|| Arc::new(PotliServiceFactory::new(&self.config)));

        let payments = service_factory
            .payment_providers()
            .into_iter()
            .fold(PaymentModule::new(self.db.clone()), PaymentModule::with_provider);

        #[cfg(feature = "hero_banner")]
        let hero_banners = potli_common::is_hero_banner_enabled(&self.config).then(|| {
            let ttl = std::time::Duration::from_secs(self.config.hero_banner.cache_ttl_secs);
            Arc::new(HeroBannerService::new(self.db.clone(), ttl))
        });

        AppState {
            config: self.config,
            db: self.db,
            events: self.events,
            service_factory,
            payments: Arc::new(payments),
            #[cfg(feature = "hero_banner")]
            hero_banners,
        }
    }
}

impl AppState {
    pub fn builder(config: Arc<AppConfig>, db: DbClient) -> AppStateBuilder {
        AppStateBuilder::new(config, db)
    }

    /// Connects to the configured database, creates the schema and builds
    /// the vendor providers.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, PotliError> {
        let db = DbClient::new(&config).await?;
        init_schemas(&db).await?;
        info!("✅ Database ready");
        Ok(Self::builder(config, db).build())
    }

    /// Starts the event subscribers. The handles live as long as the bus.
    pub fn spawn_subscribers(&self) -> Vec<JoinHandle<()>> {
        let notifications = self.service_factory.notification_provider();

        let mut auth = potli_auth::AuthSubscribers::new(
            self.config.clone(),
            SqlCustomerRepository::new(self.db.clone()),
            notifications.clone(),
        );
        auth.send_verification = self.email_verification_enabled();

        #[allow(unused_mut)]
        let mut handles = vec![potli_auth::spawn_subscribers(&self.events, auth)];

        #[cfg(feature = "settings_access")]
        if potli_common::is_settings_access_enabled(&self.config) {
            let access = potli_access::AccessSubscribers::new(
                self.config.clone(),
                self.db.clone(),
                notifications,
            );
            handles.push(potli_access::spawn_subscribers(&self.events, access));
        }

        handles
    }

    #[cfg(feature = "email_verification")]
    fn email_verification_enabled(&self) -> bool {
        potli_common::is_email_verification_enabled(&self.config)
    }

    #[cfg(not(feature = "email_verification"))]
    fn email_verification_enabled(&self) -> bool {
        false
    }
}
