//! Repository traits and their SQL implementations.

pub mod customer;
pub mod customer_sql;
pub mod factory;
pub mod hero_banner;
pub mod hero_banner_sql;
pub mod invite;
pub mod invite_sql;
pub mod payment;
pub mod payment_sql;
pub mod user;
pub mod user_sql;

pub use customer::CustomerRepository;
pub use customer_sql::SqlCustomerRepository;
pub use factory::SqlRepositoryFactory;
pub use hero_banner::HeroBannerRepository;
pub use hero_banner_sql::SqlHeroBannerRepository;
pub use invite::InviteRepository;
pub use invite_sql::SqlInviteRepository;
pub use payment::PaymentRepository;
pub use payment_sql::SqlPaymentRepository;
pub use user::UserRepository;
pub use user_sql::SqlUserRepository;
