use error_stack::Report;

use kernel::interface::query::ItemQuery;
use kernel::interface::update::ItemModifier;
use kernel::prelude::entity::{Item, ItemId, SelectLimit, SelectOffset, WishlistId};
use kernel::KernelError;

use crate::database::inmemory::{read, write, InMemoryTransaction};

pub struct InMemoryItemRepository;

#[async_trait::async_trait]
impl ItemQuery for InMemoryItemRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        Ok(read(&con.store.items).get(id).cloned())
    }

    async fn find_by_wishlist_id(
        &self,
        con: &mut InMemoryTransaction,
        wishlist_id: &WishlistId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        let limit = usize::try_from(*limit.as_ref()).unwrap_or_default();
        let offset = usize::try_from(*offset.as_ref()).unwrap_or_default();
        let mut items = read(&con.store.items)
            .values()
            .filter(|item| item.id().wishlist_id() == wishlist_id)
            .cloned()
            .collect::<Vec<Item>>();
        items.sort_by(|a, b| {
            a.created_at()
                .as_ref()
                .cmp(b.created_at().as_ref())
                .then_with(|| a.id().product_id().as_ref().cmp(b.id().product_id().as_ref()))
        });
        Ok(items.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait::async_trait]
impl ItemModifier for InMemoryItemRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        let mut items = write(&con.store.items);
        if items.contains_key(item.id()) {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Item already exists: {:?}", item.id())));
        }
        items.insert(item.id().clone(), item.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        let mut items = write(&con.store.items);
        match items.get(item.id()) {
            Some(stored) if stored.version() == item.version() => {
                let next = item.clone().reconstruct(|i| i.version = item.version().next());
                items.insert(item.id().clone(), next);
                Ok(())
            }
            Some(stored) => Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "Stale item version {} (stored {})",
                item.version().as_ref(),
                stored.version().as_ref()
            ))),
            None => Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("Item vanished: {:?}", item.id()))),
        }
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        id: &ItemId,
    ) -> error_stack::Result<(), KernelError> {
        write(&con.store.items).remove(id);
        Ok(())
    }
}
