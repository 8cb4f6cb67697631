use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::WishlistDto;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    id: Uuid,
    user_id: Uuid,
    is_default: bool,
    title: String,
    description: String,
    avatar: Option<Uuid>,
    is_archived: bool,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<WishlistDto> for WishlistResponse {
    fn from(value: WishlistDto) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            is_default: value.is_default,
            title: value.title,
            description: value.description,
            avatar: value.avatar,
            is_archived: value.is_archived,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl IntoResponse for WishlistResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<WishlistDto> for Presenter {
    type To = WishlistResponse;
    fn emit(&self, input: WishlistDto) -> Self::To {
        WishlistResponse::from(input)
    }
}

impl Exhaust<Option<WishlistDto>> for Presenter {
    type To = Option<WishlistResponse>;
    fn emit(&self, input: Option<WishlistDto>) -> Self::To {
        input.map(WishlistResponse::from)
    }
}

impl Exhaust<Vec<WishlistDto>> for Presenter {
    type To = Json<Vec<WishlistResponse>>;
    fn emit(&self, input: Vec<WishlistDto>) -> Self::To {
        Json(input.into_iter().map(WishlistResponse::from).collect())
    }
}
