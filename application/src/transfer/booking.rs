use uuid::Uuid;

pub struct BookItemDto {
    pub wishlist_id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
}

pub struct UnbookItemDto {
    pub wishlist_id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
}

pub struct SetBookingAvailabilityDto {
    pub wishlist_id: Uuid,
    pub product_id: Uuid,
    pub available: bool,
}
