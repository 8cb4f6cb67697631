use error_stack::Report;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnWishlistQuery, WishlistQuery};
use kernel::interface::update::{DependOnWishlistModifier, WishlistModifier};
use kernel::prelude::entity::{
    CreatedAt, DestructWishlist, IsArchived, IsDefault, UpdatedAt, UserId, Wishlist,
    WishlistDescription, WishlistId, WishlistTitle,
};
use kernel::KernelError;

use crate::transfer::{
    ArchiveWishlistDto, CreateWishlistDto, GetUserWishlistsDto, GetWishlistDto,
    RestoreWishlistDto, UpdateWishlistDto, WishlistDto,
};

#[async_trait::async_trait]
pub trait GetWishlistService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnWishlistQuery
{
    async fn get_wishlist(
        &self,
        dto: GetWishlistDto,
    ) -> error_stack::Result<Option<WishlistDto>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let id = WishlistId::new(dto.id);
        let wishlist = self.wishlist_query().find_by_id(&mut con, &id).await?;
        Ok(wishlist.map(WishlistDto::from))
    }

    async fn get_wishlists_by_user(
        &self,
        dto: GetUserWishlistsDto,
    ) -> error_stack::Result<Vec<WishlistDto>, KernelError> {
        let mut con = self.database_connection().transact().await?;
        let user_id = UserId::new(dto.user_id);
        let wishlists = self
            .wishlist_query()
            .find_by_user_id(&mut con, &user_id)
            .await?;
        Ok(wishlists.into_iter().map(WishlistDto::from).collect())
    }
}

impl<T> GetWishlistService for T where T: DependOnDatabaseConnection + DependOnWishlistQuery {}

/// A lost race for the default flag is retried once as a regular wishlist.
const MAX_CREATE_ATTEMPTS: usize = 2;

#[async_trait::async_trait]
pub trait CreateWishlistService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnWishlistQuery
    + DependOnWishlistModifier
{
    /// The first wishlist of a user becomes their default one.
    ///
    /// When a concurrent create takes the default first, the wishlist is
    /// created again as a regular one.
    #[tracing::instrument(skip_all, fields(user = %dto.user_id))]
    async fn create_wishlist(
        &self,
        dto: CreateWishlistDto,
    ) -> error_stack::Result<WishlistDto, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let mut attempt = 1;
        loop {
            let mut con = self.database_connection().transact().await?;
            let is_default = self
                .wishlist_query()
                .find_by_user_id(&mut con, &user_id)
                .await?
                .is_empty();
            let now = OffsetDateTime::now_utc();
            let wishlist = Wishlist::new(
                WishlistId::new(Uuid::new_v4()),
                user_id.clone(),
                IsDefault::new(is_default),
                WishlistTitle::new(dto.title.clone()),
                dto.description
                    .clone()
                    .map(WishlistDescription::new)
                    .unwrap_or_default(),
                None,
                IsArchived::new(false),
                CreatedAt::new(now),
                UpdatedAt::new(now),
            );
            match self.wishlist_modifier().create(&mut con, &wishlist).await {
                Ok(()) => {
                    con.commit().await?;
                    info!("Wishlist {:?} created", wishlist.id());
                    return Ok(WishlistDto::from(wishlist));
                }
                Err(report)
                    if is_default
                        && attempt < MAX_CREATE_ATTEMPTS
                        && matches!(report.current_context(), KernelError::Concurrency) =>
                {
                    con.roll_back().await?;
                    debug!("Default wishlist taken concurrently, attempt {attempt}");
                    attempt += 1;
                }
                Err(report) => return Err(report),
            }
        }
    }
}

impl<T> CreateWishlistService for T where
    T: DependOnDatabaseConnection + DependOnWishlistQuery + DependOnWishlistModifier
{
}

async fn modify<T: ?Sized, F>(
    module: &T,
    id: Uuid,
    f: F,
) -> error_stack::Result<WishlistDto, KernelError>
where
    T: DependOnWishlistQuery + DependOnWishlistModifier,
    F: FnOnce(&mut DestructWishlist) + Send,
{
    let mut con = module.database_connection().transact().await?;
    let id = WishlistId::new(id);
    let wishlist = module
        .wishlist_query()
        .find_by_id(&mut con, &id)
        .await?
        .ok_or_else(|| {
            Report::new(KernelError::WishlistNotFound).attach_printable(format!("wishlist: {id:?}"))
        })?;
    let mut destruct = wishlist.into_destruct();
    f(&mut destruct);
    destruct.updated_at = UpdatedAt::new(OffsetDateTime::now_utc());
    let wishlist = destruct.freeze();
    module.wishlist_modifier().update(&mut con, &wishlist).await?;
    con.commit().await?;
    Ok(WishlistDto::from(wishlist))
}

#[async_trait::async_trait]
pub trait UpdateWishlistService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnWishlistQuery
    + DependOnWishlistModifier
{
    async fn update_wishlist(
        &self,
        dto: UpdateWishlistDto,
    ) -> error_stack::Result<WishlistDto, KernelError> {
        let UpdateWishlistDto {
            id,
            title,
            description,
        } = dto;
        modify(self, id, move |w| {
            if let Some(title) = title {
                w.title = WishlistTitle::new(title);
            }
            if let Some(description) = description {
                w.description = WishlistDescription::new(description);
            }
        })
        .await
    }

    async fn archive_wishlist(
        &self,
        dto: ArchiveWishlistDto,
    ) -> error_stack::Result<WishlistDto, KernelError> {
        modify(self, dto.id, |w| w.is_archived = IsArchived::new(true)).await
    }

    async fn restore_wishlist(
        &self,
        dto: RestoreWishlistDto,
    ) -> error_stack::Result<WishlistDto, KernelError> {
        modify(self, dto.id, |w| w.is_archived = IsArchived::new(false)).await
    }
}

impl<T> UpdateWishlistService for T where
    T: DependOnDatabaseConnection + DependOnWishlistQuery + DependOnWishlistModifier
{
}
