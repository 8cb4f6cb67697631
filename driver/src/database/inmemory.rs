mod item;
mod wishlist;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{Item, ItemId, Wishlist, WishlistId};
use kernel::KernelError;

pub use self::{item::*, wishlist::*};
use crate::database::StorageBackend;

#[derive(Default)]
struct Store {
    wishlists: RwLock<HashMap<WishlistId, Wishlist>>,
    items: RwLock<HashMap<ItemId, Item>>,
}

/// Process-local storage. Each write is applied atomically under the
/// collection's lock as soon as it is issued.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<Store>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        Ok(InMemoryTransaction {
            store: Arc::clone(&self.store),
        })
    }
}

impl StorageBackend for InMemoryDatabase {
    type ItemRepository = InMemoryItemRepository;
    type WishlistRepository = InMemoryWishlistRepository;

    fn item_repository(&self) -> &Self::ItemRepository {
        &InMemoryItemRepository
    }

    fn wishlist_repository(&self) -> &Self::WishlistRepository {
        &InMemoryWishlistRepository
    }
}

/// Writes are never buffered, so there is nothing to commit or undo.
pub struct InMemoryTransaction {
    store: Arc<Store>,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
