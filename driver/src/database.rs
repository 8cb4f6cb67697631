mod inmemory;
mod postgres;

pub use self::{inmemory::*, postgres::*};
use kernel::interface::database::DatabaseConnection;
use kernel::interface::query::{ItemQuery, WishlistQuery};
use kernel::interface::update::{ItemModifier, WishlistModifier};

/// A storage variant the service can be composed with.
pub trait StorageBackend: DatabaseConnection + Clone {
    type ItemRepository: ItemQuery<Transaction = Self::Transaction>
        + ItemModifier<Transaction = Self::Transaction>;
    type WishlistRepository: WishlistQuery<Transaction = Self::Transaction>
        + WishlistModifier<Transaction = Self::Transaction>;

    fn item_repository(&self) -> &Self::ItemRepository;
    fn wishlist_repository(&self) -> &Self::WishlistRepository;
}
