use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructWishlist, Wishlist};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WishlistDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_default: bool,
    pub title: String,
    pub description: String,
    pub avatar: Option<Uuid>,
    pub is_archived: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Wishlist> for WishlistDto {
    fn from(value: Wishlist) -> Self {
        let DestructWishlist {
            id,
            user_id,
            is_default,
            title,
            description,
            avatar,
            is_archived,
            created_at,
            updated_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            is_default: is_default.into(),
            title: title.into(),
            description: description.into(),
            avatar: avatar.map(Into::into),
            is_archived: is_archived.into(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

pub struct GetWishlistDto {
    pub id: Uuid,
}

pub struct GetUserWishlistsDto {
    pub user_id: Uuid,
}

pub struct CreateWishlistDto {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

pub struct UpdateWishlistDto {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct ArchiveWishlistDto {
    pub id: Uuid,
}

pub struct RestoreWishlistDto {
    pub id: Uuid,
}
