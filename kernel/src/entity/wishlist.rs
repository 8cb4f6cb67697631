mod description;
mod id;
mod title;

pub use self::{description::*, id::*, title::*};
use crate::entity::{CreatedAt, ImageId, IsArchived, IsDefault, UpdatedAt, UserId};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

/// A user's list of wishes. Owned exclusively by `user_id`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Wishlist {
    id: WishlistId,
    user_id: UserId,
    is_default: IsDefault,
    title: WishlistTitle,
    description: WishlistDescription,
    avatar: Option<ImageId>,
    is_archived: IsArchived,
    created_at: CreatedAt<Wishlist>,
    updated_at: UpdatedAt<Wishlist>,
}

impl Wishlist {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: WishlistId,
        user_id: UserId,
        is_default: IsDefault,
        title: WishlistTitle,
        description: WishlistDescription,
        avatar: Option<ImageId>,
        is_archived: IsArchived,
        created_at: CreatedAt<Wishlist>,
        updated_at: UpdatedAt<Wishlist>,
    ) -> Self {
        Self {
            id,
            user_id,
            is_default,
            title,
            description,
            avatar,
            is_archived,
            created_at,
            updated_at,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
