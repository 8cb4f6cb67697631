use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::Wishlist;
use crate::KernelError;

#[async_trait::async_trait]
pub trait WishlistModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        wishlist: &Wishlist,
    ) -> error_stack::Result<(), KernelError>;

    async fn update(
        &self,
        con: &mut Self::Transaction,
        wishlist: &Wishlist,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnWishlistModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type WishlistModifier: WishlistModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn wishlist_modifier(&self) -> &Self::WishlistModifier;
}
