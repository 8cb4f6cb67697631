use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Item, ItemId, SelectLimit, SelectOffset, WishlistId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ItemQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError>;

    /// Items ordered by creation time.
    async fn find_by_wishlist_id(
        &self,
        con: &mut Self::Transaction,
        wishlist_id: &WishlistId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Item>, KernelError>;
}

pub trait DependOnItemQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ItemQuery: ItemQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn item_query(&self) -> &Self::ItemQuery;
}
