use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    ArchiveWishlistDto, CreateWishlistDto, GetUserWishlistsDto, GetWishlistDto,
    RestoreWishlistDto, UpdateWishlistDto,
};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    user_id: Uuid,
    title: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug)]
pub struct GetRequest {
    id: Uuid,
}

impl GetRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetByUserRequest {
    user_id: Uuid,
}

impl GetByUserRequest {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[derive(Debug)]
pub struct ArchiveRequest {
    id: Uuid,
}

impl ArchiveRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct RestoreRequest {
    id: Uuid,
}

impl RestoreRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = CreateWishlistDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateWishlistDto {
            user_id: input.user_id,
            title: input.title,
            description: input.description,
        }
    }
}

impl Intake<(Uuid, UpdateRequest)> for Transformer {
    type To = UpdateWishlistDto;
    fn emit(&self, input: (Uuid, UpdateRequest)) -> Self::To {
        let (id, input) = input;
        UpdateWishlistDto {
            id,
            title: input.title,
            description: input.description,
        }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetWishlistDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetWishlistDto { id: input.id }
    }
}

impl Intake<GetByUserRequest> for Transformer {
    type To = GetUserWishlistsDto;
    fn emit(&self, input: GetByUserRequest) -> Self::To {
        GetUserWishlistsDto {
            user_id: input.user_id,
        }
    }
}

impl Intake<ArchiveRequest> for Transformer {
    type To = ArchiveWishlistDto;
    fn emit(&self, input: ArchiveRequest) -> Self::To {
        ArchiveWishlistDto { id: input.id }
    }
}

impl Intake<RestoreRequest> for Transformer {
    type To = RestoreWishlistDto;
    fn emit(&self, input: RestoreRequest) -> Self::To {
        RestoreWishlistDto { id: input.id }
    }
}
