use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    AddItemDto, BookItemDto, GetItemsDto, RemoveItemDto, SetBookingAvailabilityDto,
    UnbookItemDto,
};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    limit: Option<i32>,
    offset: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    product_id: Uuid,
}

#[derive(Debug)]
pub struct RemoveRequest {
    wishlist_id: Uuid,
    product_id: Uuid,
}

impl RemoveRequest {
    pub fn new(wishlist_id: Uuid, product_id: Uuid) -> Self {
        Self {
            wishlist_id,
            product_id,
        }
    }
}

/// The caller is identified upstream and passed as a query parameter.
#[derive(Debug, Deserialize)]
pub struct Caller {
    user_id: Uuid,
}

#[derive(Debug)]
pub struct BookRequest {
    wishlist_id: Uuid,
    product_id: Uuid,
    caller: Caller,
}

impl BookRequest {
    pub fn new(wishlist_id: Uuid, product_id: Uuid, caller: Caller) -> Self {
        Self {
            wishlist_id,
            product_id,
            caller,
        }
    }
}

#[derive(Debug)]
pub struct UnbookRequest {
    wishlist_id: Uuid,
    product_id: Uuid,
    caller: Caller,
}

impl UnbookRequest {
    pub fn new(wishlist_id: Uuid, product_id: Uuid, caller: Caller) -> Self {
        Self {
            wishlist_id,
            product_id,
            caller,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    available: bool,
}

pub struct Transformer;

impl Intake<(Uuid, GetAllRequest)> for Transformer {
    type To = GetItemsDto;
    fn emit(&self, input: (Uuid, GetAllRequest)) -> Self::To {
        let (wishlist_id, input) = input;
        GetItemsDto {
            wishlist_id,
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<(Uuid, AddRequest)> for Transformer {
    type To = AddItemDto;
    fn emit(&self, input: (Uuid, AddRequest)) -> Self::To {
        let (wishlist_id, input) = input;
        AddItemDto {
            wishlist_id,
            product_id: input.product_id,
        }
    }
}

impl Intake<RemoveRequest> for Transformer {
    type To = RemoveItemDto;
    fn emit(&self, input: RemoveRequest) -> Self::To {
        RemoveItemDto {
            wishlist_id: input.wishlist_id,
            product_id: input.product_id,
        }
    }
}

impl Intake<BookRequest> for Transformer {
    type To = BookItemDto;
    fn emit(&self, input: BookRequest) -> Self::To {
        BookItemDto {
            wishlist_id: input.wishlist_id,
            product_id: input.product_id,
            user_id: input.caller.user_id,
        }
    }
}

impl Intake<UnbookRequest> for Transformer {
    type To = UnbookItemDto;
    fn emit(&self, input: UnbookRequest) -> Self::To {
        UnbookItemDto {
            wishlist_id: input.wishlist_id,
            product_id: input.product_id,
            user_id: input.caller.user_id,
        }
    }
}

impl Intake<(Uuid, Uuid, AvailabilityRequest)> for Transformer {
    type To = SetBookingAvailabilityDto;
    fn emit(&self, input: (Uuid, Uuid, AvailabilityRequest)) -> Self::To {
        let (wishlist_id, product_id, input) = input;
        SetBookingAvailabilityDto {
            wishlist_id,
            product_id,
            available: input.available,
        }
    }
}
