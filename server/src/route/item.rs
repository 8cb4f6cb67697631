use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, put};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{
    AddItemService, BookItemService, GetItemService, RemoveItemService,
    SetBookingAvailabilityService, UnbookItemService,
};
use driver::database::StorageBackend;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::item::request::{
    AddRequest, AvailabilityRequest, BookRequest, Caller, GetAllRequest, RemoveRequest,
    Transformer as ItemTransformer, UnbookRequest,
};
use crate::route::item::response::Presenter as ItemPresenter;

mod request;
mod response;

pub trait ItemRouter {
    fn route_item(self) -> Self;
}

impl<B: StorageBackend> ItemRouter for Router<AppModule<B>> {
    fn route_item(self) -> Self {
        self.route(
            "/wishlists/:id/items",
            get(
                |State(module): State<AppModule<B>>,
                 Path(id): Path<Uuid>,
                 Query(req): Query<GetAllRequest>| async move {
                    Controller::new(ItemTransformer, ItemPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.get_items(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule<B>>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<AddRequest>| async move {
                    Controller::new(ItemTransformer, ItemPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.add_item(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/wishlists/:id/items/:product_id",
            delete(
                |State(module): State<AppModule<B>>,
                 Path((id, product_id)): Path<(Uuid, Uuid)>| async move {
                    Controller::new(ItemTransformer, ItemPresenter)
                        .intake(RemoveRequest::new(id, product_id))
                        .handle(|dto| async move { module.remove_item(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/wishlists/:id/items/:product_id/booking",
            put(
                |State(module): State<AppModule<B>>,
                 Path((id, product_id)): Path<(Uuid, Uuid)>,
                 Query(caller): Query<Caller>| async move {
                    Controller::new(ItemTransformer, ItemPresenter)
                        .intake(BookRequest::new(id, product_id, caller))
                        .handle(|dto| async move { module.book_item(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<B>>,
                 Path((id, product_id)): Path<(Uuid, Uuid)>,
                 Query(caller): Query<Caller>| async move {
                    Controller::new(ItemTransformer, ItemPresenter)
                        .intake(UnbookRequest::new(id, product_id, caller))
                        .handle(|dto| async move { module.unbook_item(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/wishlists/:id/items/:product_id/availability",
            patch(
                |State(module): State<AppModule<B>>,
                 Path((id, product_id)): Path<(Uuid, Uuid)>,
                 Json(req): Json<AvailabilityRequest>| async move {
                    Controller::new(ItemTransformer, ItemPresenter)
                        .intake((id, product_id, req))
                        .handle(|dto| async move { module.set_booking_availability(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
