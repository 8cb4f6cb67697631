mod booking;
mod item;
mod wishlist;

pub use self::{booking::*, item::*, wishlist::*};
