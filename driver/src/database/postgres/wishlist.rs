use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::WishlistQuery;
use kernel::interface::update::WishlistModifier;
use kernel::prelude::entity::{
    CreatedAt, ImageId, IsArchived, IsDefault, UpdatedAt, UserId, Wishlist, WishlistDescription,
    WishlistId, WishlistTitle,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::{ConvertError, DriverError};

pub struct PostgresWishlistRepository;

#[async_trait::async_trait]
impl WishlistQuery for PostgresWishlistRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &WishlistId,
    ) -> error_stack::Result<Option<Wishlist>, KernelError> {
        PgWishlistInternal::find_by_id(con, id).await.convert_error()
    }

    async fn find_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Wishlist>, KernelError> {
        PgWishlistInternal::find_by_user_id(con, user_id)
            .await
            .convert_error()
    }
}

#[async_trait::async_trait]
impl WishlistModifier for PostgresWishlistRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        wishlist: &Wishlist,
    ) -> error_stack::Result<(), KernelError> {
        PgWishlistInternal::create(con, wishlist)
            .await
            .convert_error()
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        wishlist: &Wishlist,
    ) -> error_stack::Result<(), KernelError> {
        let updated = PgWishlistInternal::update(con, wishlist)
            .await
            .convert_error()?;
        if !updated {
            return Err(Report::new(KernelError::WishlistNotFound)
                .attach_printable(format!("Wishlist: {:?}", wishlist.id())));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct WishlistRow {
    id: Uuid,
    user_id: Uuid,
    is_default: bool,
    title: String,
    description: String,
    avatar: Option<Uuid>,
    is_archived: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<WishlistRow> for Wishlist {
    fn from(value: WishlistRow) -> Self {
        Wishlist::new(
            WishlistId::new(value.id),
            UserId::new(value.user_id),
            IsDefault::new(value.is_default),
            WishlistTitle::new(value.title),
            WishlistDescription::new(value.description),
            value.avatar.map(ImageId::new),
            IsArchived::new(value.is_archived),
            CreatedAt::new(value.created_at),
            UpdatedAt::new(value.updated_at),
        )
    }
}

pub(in crate::database) struct PgWishlistInternal;

impl PgWishlistInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &WishlistId,
    ) -> Result<Option<Wishlist>, DriverError> {
        let row = sqlx::query_as::<_, WishlistRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, is_default, title, description, avatar, is_archived, created_at, updated_at
            FROM wishlists
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await?;
        Ok(row.map(Wishlist::from))
    }

    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> Result<Vec<Wishlist>, DriverError> {
        let rows = sqlx::query_as::<_, WishlistRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, is_default, title, description, avatar, is_archived, created_at, updated_at
            FROM wishlists
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await?;
        Ok(rows.into_iter().map(Wishlist::from).collect())
    }

    async fn create(con: &mut PgConnection, wishlist: &Wishlist) -> Result<(), DriverError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO wishlists (id, user_id, is_default, title, description, avatar, is_archived, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(wishlist.id().as_ref())
        .bind(wishlist.user_id().as_ref())
        .bind(wishlist.is_default().as_ref())
        .bind(wishlist.title().as_ref())
        .bind(wishlist.description().as_ref())
        .bind(wishlist.avatar().as_ref().map(AsRef::<Uuid>::as_ref).copied())
        .bind(wishlist.is_archived().as_ref())
        .bind(wishlist.created_at().as_ref())
        .bind(wishlist.updated_at().as_ref())
        .execute(con)
        .await?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, wishlist: &Wishlist) -> Result<bool, DriverError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE wishlists
            SET is_default = $2, title = $3, description = $4, avatar = $5, is_archived = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(wishlist.id().as_ref())
        .bind(wishlist.is_default().as_ref())
        .bind(wishlist.title().as_ref())
        .bind(wishlist.description().as_ref())
        .bind(wishlist.avatar().as_ref().map(AsRef::<Uuid>::as_ref).copied())
        .bind(wishlist.is_archived().as_ref())
        .bind(wishlist.updated_at().as_ref())
        .execute(con)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
