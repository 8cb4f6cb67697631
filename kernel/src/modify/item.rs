use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Item, ItemId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ItemModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError>;

    /// Conditional write: succeeds only while the stored version still equals
    /// `item.version()`, and stores the item under the next version.
    /// A stale or missing row fails with [`KernelError::Concurrency`].
    async fn update(
        &self,
        con: &mut Self::Transaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError>;

    async fn delete(
        &self,
        con: &mut Self::Transaction,
        id: &ItemId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnItemModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type ItemModifier: ItemModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn item_modifier(&self) -> &Self::ItemModifier;
}
