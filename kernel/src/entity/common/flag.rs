use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct IsBookingAvailable(bool);

impl IsBookingAvailable {
    pub fn new(value: impl Into<bool>) -> Self {
        Self(value.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct IsDefault(bool);

impl IsDefault {
    pub fn new(value: impl Into<bool>) -> Self {
        Self(value.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct IsArchived(bool);

impl IsArchived {
    pub fn new(value: impl Into<bool>) -> Self {
        Self(value.into())
    }
}
