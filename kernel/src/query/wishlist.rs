use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{UserId, Wishlist, WishlistId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait WishlistQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &WishlistId,
    ) -> error_stack::Result<Option<Wishlist>, KernelError>;

    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Wishlist>, KernelError>;
}

pub trait DependOnWishlistQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type WishlistQuery: WishlistQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn wishlist_query(&self) -> &Self::WishlistQuery;
}
