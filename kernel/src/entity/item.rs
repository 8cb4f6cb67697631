mod booking;
mod id;

pub use self::{booking::*, id::*};
use crate::entity::{CreatedAt, IsBookingAvailable, UpdatedAt, UserId, Version};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

/// A product placed on a wishlist, together with its booking slot.
///
/// `booked_by` holds at most one occupant and is always empty while booking
/// is unavailable. All occupancy changes go through the transitions in
/// [`booking`](self::booking).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Item {
    id: ItemId,
    is_booking_available: IsBookingAvailable,
    booked_by: Option<UserId>,
    version: Version<Item>,
    created_at: CreatedAt<Item>,
    updated_at: UpdatedAt<Item>,
}

impl Item {
    pub fn new(
        id: ItemId,
        is_booking_available: IsBookingAvailable,
        booked_by: Option<UserId>,
        version: Version<Item>,
        created_at: CreatedAt<Item>,
        updated_at: UpdatedAt<Item>,
    ) -> Self {
        let booked_by = if *is_booking_available.as_ref() {
            booked_by
        } else {
            None
        };
        Self {
            id,
            is_booking_available,
            booked_by,
            version,
            created_at,
            updated_at,
        }
    }
}
