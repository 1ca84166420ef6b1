//! Factory for the SQL repositories
//!
//! Every repository shares the same pool; the factory only clones the client.

use crate::repositories::{
    SqlCustomerRepository, SqlHeroBannerRepository, SqlInviteRepository, SqlPaymentRepository,
    SqlUserRepository,
};
use crate::{DbClient, RepositoryFactory};

#[derive(Debug, Clone, Default)]
pub struct SqlRepositoryFactory;

impl SqlRepositoryFactory {
    pub fn new() -> Self {
        Self
    }
}

macro_rules! sql_repository_factory {
    ($($repo:ty),* $(,)?) => {
        $(
            impl RepositoryFactory<$repo, DbClient> for SqlRepositoryFactory {
                fn create_repository(&self, db_client: DbClient) -> $repo {
                    <$repo>::new(db_client)
                }
            }
        )*
    };
}

sql_repository_factory!(
    SqlHeroBannerRepository,
    SqlCustomerRepository,
    SqlUserRepository,
    SqlInviteRepository,
    SqlPaymentRepository,
);
