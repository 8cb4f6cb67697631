use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vodca::References;

use crate::entity::{ItemId, UserId};
use crate::event::DomainEvent;

pub const BOOKING_CHANGED: &str = "wish.booking.update";

/// Emitted once for every transition that changes an item's occupant.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References)]
#[serde(rename_all = "camelCase")]
pub struct BookingChangedEvent {
    #[serde(rename = "itemID")]
    item_id: ItemId,
    wish_owner: UserId,
    old_booked_by: Option<UserId>,
    new_booked_by: Option<UserId>,
    event_by: UserId,
    #[serde(with = "time::serde::rfc3339")]
    event_at: OffsetDateTime,
}

impl BookingChangedEvent {
    pub fn new(
        item_id: ItemId,
        wish_owner: UserId,
        old_booked_by: Option<UserId>,
        new_booked_by: Option<UserId>,
        event_by: UserId,
        event_at: OffsetDateTime,
    ) -> Self {
        Self {
            item_id,
            wish_owner,
            old_booked_by,
            new_booked_by,
            event_by,
            event_at,
        }
    }
}

impl DomainEvent for BookingChangedEvent {
    const NAME: &'static str = BOOKING_CHANGED;
}
