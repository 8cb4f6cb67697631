use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructItem, DestructItemId, Item};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ItemDto {
    pub wishlist_id: Uuid,
    pub product_id: Uuid,
    pub is_booking_available: bool,
    pub booked_by: Option<Uuid>,
    pub version: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Item> for ItemDto {
    fn from(value: Item) -> Self {
        let DestructItem {
            id,
            is_booking_available,
            booked_by,
            version,
            created_at,
            updated_at,
        } = value.into_destruct();
        let DestructItemId {
            wishlist_id,
            product_id,
        } = id.into_destruct();
        Self {
            wishlist_id: wishlist_id.into(),
            product_id: product_id.into(),
            is_booking_available: is_booking_available.into(),
            booked_by: booked_by.map(Into::into),
            version: *version.as_ref(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemPageDto {
    pub items: Vec<ItemDto>,
    pub has_more: bool,
}

pub struct GetItemsDto {
    pub wishlist_id: Uuid,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

pub struct AddItemDto {
    pub wishlist_id: Uuid,
    pub product_id: Uuid,
}

pub struct RemoveItemDto {
    pub wishlist_id: Uuid,
    pub product_id: Uuid,
}
