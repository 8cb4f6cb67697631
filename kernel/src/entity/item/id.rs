use destructure::Destructure;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln, References};

use crate::entity::WishlistId;

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

/// Composite key of an item. Immutable once the item exists.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct ItemId {
    #[serde(rename = "wishlistID")]
    wishlist_id: WishlistId,
    #[serde(rename = "productID")]
    product_id: ProductId,
}

impl ItemId {
    pub fn new(wishlist_id: WishlistId, product_id: ProductId) -> Self {
        Self {
            wishlist_id,
            product_id,
        }
    }
}
