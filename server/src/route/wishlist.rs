use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{CreateWishlistService, GetWishlistService, UpdateWishlistService};
use driver::database::StorageBackend;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::wishlist::request::{
    ArchiveRequest, CreateRequest, GetByUserRequest, GetRequest, RestoreRequest,
    Transformer as WishlistTransformer, UpdateRequest,
};
use crate::route::wishlist::response::{Presenter as WishlistPresenter, WishlistResponse};

mod request;
mod response;

pub trait WishlistRouter {
    fn route_wishlist(self) -> Self;
}

impl<B: StorageBackend> WishlistRouter for Router<AppModule<B>> {
    fn route_wishlist(self) -> Self {
        self.route(
            "/wishlists",
            post(
                |State(module): State<AppModule<B>>, Json(req): Json<CreateRequest>| async move {
                    Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.create_wishlist(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/wishlists/:id",
            get(
                |State(module): State<AppModule<B>>, Path(id): Path<Uuid>| async move {
                    Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.get_wishlist(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                        .map(|res| {
                            res.map(WishlistResponse::into_response)
                                .unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
                        })
                },
            )
            .patch(
                |State(module): State<AppModule<B>>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateRequest>| async move {
                    Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.update_wishlist(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/wishlists/:id/archive",
            post(
                |State(module): State<AppModule<B>>, Path(id): Path<Uuid>| async move {
                    Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake(ArchiveRequest::new(id))
                        .handle(|dto| async move { module.archive_wishlist(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/wishlists/:id/restore",
            post(
                |State(module): State<AppModule<B>>, Path(id): Path<Uuid>| async move {
                    Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake(RestoreRequest::new(id))
                        .handle(|dto| async move { module.restore_wishlist(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id/wishlists",
            get(
                |State(module): State<AppModule<B>>, Path(id): Path<Uuid>| async move {
                    Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake(GetByUserRequest::new(id))
                        .handle(|dto| async move { module.get_wishlists_by_user(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
