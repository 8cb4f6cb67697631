mod item;
mod wishlist;

pub use self::{item::*, wishlist::*};
