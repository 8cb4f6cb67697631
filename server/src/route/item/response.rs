use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{ItemDto, ItemPageDto};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    wishlist_id: Uuid,
    product_id: Uuid,
    is_booking_available: bool,
    booked_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<ItemDto> for ItemResponse {
    fn from(value: ItemDto) -> Self {
        Self {
            wishlist_id: value.wishlist_id,
            product_id: value.product_id,
            is_booking_available: value.is_booking_available,
            booked_by: value.booked_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl IntoResponse for ItemResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ItemPageResponse {
    items: Vec<ItemResponse>,
    has_more: bool,
}

pub struct Presenter;

impl Exhaust<ItemDto> for Presenter {
    type To = ItemResponse;
    fn emit(&self, input: ItemDto) -> Self::To {
        ItemResponse::from(input)
    }
}

impl Exhaust<ItemPageDto> for Presenter {
    type To = Json<ItemPageResponse>;
    fn emit(&self, input: ItemPageDto) -> Self::To {
        Json(ItemPageResponse {
            items: input.items.into_iter().map(ItemResponse::from).collect(),
            has_more: input.has_more,
        })
    }
}

impl Exhaust<()> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}
