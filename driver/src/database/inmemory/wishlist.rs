use error_stack::Report;

use kernel::interface::query::WishlistQuery;
use kernel::interface::update::WishlistModifier;
use kernel::prelude::entity::{UserId, Wishlist, WishlistId};
use kernel::KernelError;

use crate::database::inmemory::{read, write, InMemoryTransaction};

pub struct InMemoryWishlistRepository;

#[async_trait::async_trait]
impl WishlistQuery for InMemoryWishlistRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &WishlistId,
    ) -> error_stack::Result<Option<Wishlist>, KernelError> {
        Ok(read(&con.store.wishlists).get(id).cloned())
    }

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Wishlist>, KernelError> {
        let mut wishlists = read(&con.store.wishlists)
            .values()
            .filter(|wishlist| wishlist.is_owned_by(user_id))
            .cloned()
            .collect::<Vec<Wishlist>>();
        wishlists.sort_by(|a, b| a.created_at().as_ref().cmp(b.created_at().as_ref()));
        Ok(wishlists)
    }
}

#[async_trait::async_trait]
impl WishlistModifier for InMemoryWishlistRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        wishlist: &Wishlist,
    ) -> error_stack::Result<(), KernelError> {
        let mut wishlists = write(&con.store.wishlists);
        if wishlists.contains_key(wishlist.id()) {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Wishlist already exists: {:?}", wishlist.id())));
        }
        let default_taken = *wishlist.is_default().as_ref()
            && wishlists.values().any(|stored| {
                stored.user_id() == wishlist.user_id() && *stored.is_default().as_ref()
            });
        if default_taken {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "User {:?} already has a default wishlist",
                wishlist.user_id()
            )));
        }
        wishlists.insert(wishlist.id().clone(), wishlist.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        wishlist: &Wishlist,
    ) -> error_stack::Result<(), KernelError> {
        let mut wishlists = write(&con.store.wishlists);
        match wishlists.get_mut(wishlist.id()) {
            Some(stored) => {
                *stored = wishlist.clone();
                Ok(())
            }
            None => Err(Report::new(KernelError::WishlistNotFound)
                .attach_printable(format!("Wishlist: {:?}", wishlist.id()))),
        }
    }
}
