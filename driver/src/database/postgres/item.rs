use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::ItemQuery;
use kernel::interface::update::ItemModifier;
use kernel::prelude::entity::{
    CreatedAt, IsBookingAvailable, Item, ItemId, ProductId, SelectLimit, SelectOffset, UpdatedAt,
    UserId, Version, WishlistId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::{ConvertError, DriverError};

pub struct PostgresItemRepository;

#[async_trait::async_trait]
impl ItemQuery for PostgresItemRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        PgItemInternal::find_by_id(con, id).await.convert_error()
    }

    async fn find_by_wishlist_id(
        &self,
        con: &mut PostgresTransaction,
        wishlist_id: &WishlistId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        PgItemInternal::find_by_wishlist_id(con, wishlist_id, limit, offset)
            .await
            .convert_error()
    }
}

#[async_trait::async_trait]
impl ItemModifier for PostgresItemRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        PgItemInternal::create(con, item).await.convert_error()
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        let updated = PgItemInternal::update(con, item).await.convert_error()?;
        if !updated {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "Stale item version {} for {:?}",
                item.version().as_ref(),
                item.id()
            )));
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        id: &ItemId,
    ) -> error_stack::Result<(), KernelError> {
        PgItemInternal::delete(con, id).await.convert_error()
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    wishlist_id: Uuid,
    product_id: Uuid,
    is_booking_available: bool,
    booked_by: Option<Uuid>,
    version: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ItemRow> for Item {
    fn from(value: ItemRow) -> Self {
        Item::new(
            ItemId::new(
                WishlistId::new(value.wishlist_id),
                ProductId::new(value.product_id),
            ),
            IsBookingAvailable::new(value.is_booking_available),
            value.booked_by.map(UserId::new),
            Version::new(value.version),
            CreatedAt::new(value.created_at),
            UpdatedAt::new(value.updated_at),
        )
    }
}

pub(in crate::database) struct PgItemInternal;

impl PgItemInternal {
    async fn find_by_id(con: &mut PgConnection, id: &ItemId) -> Result<Option<Item>, DriverError> {
        let row = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            SELECT wishlist_id, product_id, is_booking_available, booked_by, version, created_at, updated_at
            FROM wishlist_items
            WHERE wishlist_id = $1 AND product_id = $2
            "#,
        )
        .bind(id.wishlist_id().as_ref())
        .bind(id.product_id().as_ref())
        .fetch_optional(con)
        .await?;
        Ok(row.map(Item::from))
    }

    async fn find_by_wishlist_id(
        con: &mut PgConnection,
        wishlist_id: &WishlistId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> Result<Vec<Item>, DriverError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            SELECT wishlist_id, product_id, is_booking_available, booked_by, version, created_at, updated_at
            FROM wishlist_items
            WHERE wishlist_id = $1
            ORDER BY created_at, product_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(wishlist_id.as_ref())
        .bind(i64::from(*limit.as_ref()))
        .bind(i64::from(*offset.as_ref()))
        .fetch_all(con)
        .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn create(con: &mut PgConnection, item: &Item) -> Result<(), DriverError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO wishlist_items (wishlist_id, product_id, is_booking_available, booked_by, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id().wishlist_id().as_ref())
        .bind(item.id().product_id().as_ref())
        .bind(item.is_booking_available().as_ref())
        .bind(item.booked_by().as_ref().map(AsRef::<Uuid>::as_ref).copied())
        .bind(item.version().as_ref())
        .bind(item.created_at().as_ref())
        .bind(item.updated_at().as_ref())
        .execute(con)
        .await?;
        Ok(())
    }

    /// Returns `false` when the stored version no longer matches.
    async fn update(con: &mut PgConnection, item: &Item) -> Result<bool, DriverError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE wishlist_items
            SET is_booking_available = $3, booked_by = $4, updated_at = $5, version = version + 1
            WHERE wishlist_id = $1 AND product_id = $2 AND version = $6
            "#,
        )
        .bind(item.id().wishlist_id().as_ref())
        .bind(item.id().product_id().as_ref())
        .bind(item.is_booking_available().as_ref())
        .bind(item.booked_by().as_ref().map(AsRef::<Uuid>::as_ref).copied())
        .bind(item.updated_at().as_ref())
        .bind(item.version().as_ref())
        .execute(con)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(con: &mut PgConnection, id: &ItemId) -> Result<(), DriverError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM wishlist_items
            WHERE wishlist_id = $1 AND product_id = $2
            "#,
        )
        .bind(id.wishlist_id().as_ref())
        .bind(id.product_id().as_ref())
        .execute(con)
        .await?;
        Ok(())
    }
}
