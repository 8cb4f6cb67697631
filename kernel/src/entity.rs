mod common;
mod image;
mod item;
mod user;
mod wishlist;

pub use self::{common::*, image::*, item::*, user::*, wishlist::*};
