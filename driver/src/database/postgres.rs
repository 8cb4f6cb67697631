use std::ops::{Deref, DerefMut};

use sqlx::{PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::database::StorageBackend;
use crate::error::{ConvertError, DriverError};

pub use self::{item::*, wishlist::*};

mod item;
mod wishlist;

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    /// Connects to `url` and applies pending migrations.
    pub async fn new(url: &str) -> error_stack::Result<Self, KernelError> {
        let pool = Pool::<Postgres>::connect(url).await.convert_error()?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DriverError::from)
            .convert_error()?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(con))
    }
}

impl StorageBackend for PostgresDatabase {
    type ItemRepository = PostgresItemRepository;
    type WishlistRepository = PostgresWishlistRepository;

    fn item_repository(&self) -> &Self::ItemRepository {
        &PostgresItemRepository
    }

    fn wishlist_repository(&self) -> &Self::WishlistRepository {
        &PostgresWishlistRepository
    }
}

pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
pub(in crate::database) mod test {
    use error_stack::Report;
    use kernel::KernelError;

    use crate::database::postgres::PostgresDatabase;
    use crate::env;
    use crate::error::ConvertError;

    pub async fn database() -> error_stack::Result<PostgresDatabase, KernelError> {
        let url = env("POSTGRES_URL").convert_error()?.ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable("POSTGRES_URL is not set")
        })?;
        PostgresDatabase::new(&url).await
    }
}
