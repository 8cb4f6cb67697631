use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::UserId;
use crate::event::BookingChangedEvent;
use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NotificationReason {
    /// Sent to the user who just booked an item.
    BookingConfirmed,
    /// Sent to the wish owner when somebody else booked one of their items.
    WishBooked,
    /// Sent to a former occupant whose booking was removed by someone else.
    BookingRemoved,
}

#[derive(Debug, Clone, Eq, PartialEq, References)]
pub struct Notification {
    recipient: UserId,
    reason: NotificationReason,
    event: BookingChangedEvent,
}

impl Notification {
    pub fn new(recipient: UserId, reason: NotificationReason, event: BookingChangedEvent) -> Self {
        Self {
            recipient,
            reason,
            event,
        }
    }
}

#[async_trait::async_trait]
pub trait NotificationSink: 'static + Sync + Send {
    async fn notify(&self, notification: &Notification) -> error_stack::Result<(), KernelError>;
}
