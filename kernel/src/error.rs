use std::fmt::Display;

use error_stack::Context;

#[derive(Debug)]
pub enum KernelError {
    ItemNotFound,
    WishlistNotFound,
    BookingNotAvailable,
    ItemAlreadyBooked,
    ItemBookedByAnotherUser,
    InvalidEventPayload,
    EventBusClosed,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::ItemNotFound => write!(f, "Wishlist item not found"),
            KernelError::WishlistNotFound => write!(f, "Wishlist not found"),
            KernelError::BookingNotAvailable => write!(f, "Item's booking not available"),
            KernelError::ItemAlreadyBooked => write!(f, "Item already booked"),
            KernelError::ItemBookedByAnotherUser => write!(f, "Item booked by another user"),
            KernelError::InvalidEventPayload => write!(f, "Invalid event payload"),
            KernelError::EventBusClosed => write!(f, "Event bus is closed"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
