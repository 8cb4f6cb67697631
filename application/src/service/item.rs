use error_stack::Report;
use time::OffsetDateTime;
use tracing::info;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnItemQuery, DependOnWishlistQuery, ItemQuery, WishlistQuery};
use kernel::interface::update::{DependOnItemModifier, ItemModifier};
use kernel::prelude::entity::{
    CreatedAt, IsBookingAvailable, Item, ItemId, ProductId, SelectLimit, SelectOffset, UpdatedAt,
    Version, WishlistId,
};
use kernel::KernelError;

use crate::transfer::{AddItemDto, GetItemsDto, ItemDto, ItemPageDto, RemoveItemDto};

#[async_trait::async_trait]
pub trait GetItemService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnItemQuery
{
    async fn get_items(&self, dto: GetItemsDto) -> error_stack::Result<ItemPageDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let wishlist_id = WishlistId::new(dto.wishlist_id);
        let limit = dto
            .limit
            .filter(|limit| *limit > 0)
            .map(SelectLimit::new)
            .unwrap_or_default();
        let offset = SelectOffset::new(dto.offset.unwrap_or_default());
        let size = usize::try_from(*limit.as_ref()).unwrap_or_default();
        let mut items = self
            .item_query()
            .find_by_wishlist_id(&mut con, &wishlist_id, &limit.lookahead(), &offset)
            .await?;
        let has_more = items.len() > size;
        items.truncate(size);
        Ok(ItemPageDto {
            items: items.into_iter().map(ItemDto::from).collect(),
            has_more,
        })
    }
}

impl<T> GetItemService for T where T: DependOnDatabaseConnection + DependOnItemQuery {}

#[async_trait::async_trait]
pub trait AddItemService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnItemQuery
    + DependOnItemModifier
    + DependOnWishlistQuery
{
    /// Adding a product that is already on the wishlist returns the existing item.
    #[tracing::instrument(skip_all, fields(wishlist = %dto.wishlist_id, product = %dto.product_id))]
    async fn add_item(&self, dto: AddItemDto) -> error_stack::Result<ItemDto, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let wishlist_id = WishlistId::new(dto.wishlist_id);
        if self
            .wishlist_query()
            .find_by_id(&mut con, &wishlist_id)
            .await?
            .is_none()
        {
            return Err(Report::new(KernelError::WishlistNotFound)
                .attach_printable(format!("wishlist: {wishlist_id:?}")));
        }
        let id = ItemId::new(wishlist_id, ProductId::new(dto.product_id));
        if let Some(item) = self.item_query().find_by_id(&mut con, &id).await? {
            return Ok(ItemDto::from(item));
        }
        let now = OffsetDateTime::now_utc();
        let item = Item::new(
            id,
            IsBookingAvailable::new(true),
            None,
            Version::initial(),
            CreatedAt::new(now),
            UpdatedAt::new(now),
        );
        self.item_modifier().create(&mut con, &item).await?;
        con.commit().await?;
        info!("Item added");
        Ok(ItemDto::from(item))
    }
}

impl<T> AddItemService for T where
    T: DependOnDatabaseConnection
        + DependOnItemQuery
        + DependOnItemModifier
        + DependOnWishlistQuery
{
}

#[async_trait::async_trait]
pub trait RemoveItemService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnItemQuery + DependOnItemModifier
{
    #[tracing::instrument(skip_all, fields(wishlist = %dto.wishlist_id, product = %dto.product_id))]
    async fn remove_item(&self, dto: RemoveItemDto) -> error_stack::Result<(), KernelError> {
        let mut con = self.database_connection().transact().await?;
        let id = ItemId::new(
            WishlistId::new(dto.wishlist_id),
            ProductId::new(dto.product_id),
        );
        if self.item_query().find_by_id(&mut con, &id).await?.is_none() {
            return Err(
                Report::new(KernelError::ItemNotFound).attach_printable(format!("item: {id:?}"))
            );
        }
        self.item_modifier().delete(&mut con, &id).await?;
        con.commit().await?;
        info!("Item removed");
        Ok(())
    }
}

impl<T> RemoveItemService for T where
    T: DependOnDatabaseConnection + DependOnItemQuery + DependOnItemModifier
{
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::KernelError;

    use crate::service::{AddItemService, CreateWishlistService, GetItemService, RemoveItemService};
    use crate::testing::TestModule;
    use crate::transfer::{AddItemDto, CreateWishlistDto, GetItemsDto, RemoveItemDto};

    #[tokio::test]
    async fn add_list_remove() -> error_stack::Result<(), KernelError> {
        let module = TestModule::recording();
        let wishlist = module
            .create_wishlist(CreateWishlistDto {
                user_id: Uuid::new_v4(),
                title: "birthday".to_string(),
                description: None,
            })
            .await?;

        let mut products = Vec::new();
        for _ in 0..3 {
            let product_id = Uuid::new_v4();
            let item = module
                .add_item(AddItemDto {
                    wishlist_id: wishlist.id,
                    product_id,
                })
                .await?;
            assert!(item.is_booking_available);
            assert!(item.booked_by.is_none());
            assert_eq!(item.version, 0);
            products.push(product_id);
        }

        let again = module
            .add_item(AddItemDto {
                wishlist_id: wishlist.id,
                product_id: products[0],
            })
            .await?;
        assert_eq!(again.product_id, products[0]);

        let page = module
            .get_items(GetItemsDto {
                wishlist_id: wishlist.id,
                limit: Some(2),
                offset: None,
            })
            .await?;
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);

        let page = module
            .get_items(GetItemsDto {
                wishlist_id: wishlist.id,
                limit: Some(2),
                offset: Some(2),
            })
            .await?;
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_more);

        module
            .remove_item(RemoveItemDto {
                wishlist_id: wishlist.id,
                product_id: products[1],
            })
            .await?;
        let page = module
            .get_items(GetItemsDto {
                wishlist_id: wishlist.id,
                limit: None,
                offset: None,
            })
            .await?;
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|i| i.product_id != products[1]));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_targets() -> error_stack::Result<(), KernelError> {
        let module = TestModule::recording();
        let report = module
            .add_item(AddItemDto {
                wishlist_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
            })
            .await
            .expect_err("unknown wishlist");
        assert!(matches!(
            report.current_context(),
            KernelError::WishlistNotFound
        ));

        let report = module
            .remove_item(RemoveItemDto {
                wishlist_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
            })
            .await
            .expect_err("unknown item");
        assert!(matches!(report.current_context(), KernelError::ItemNotFound));
        Ok(())
    }
}
