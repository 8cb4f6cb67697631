use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Page size of a listing query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectLimit(i32);

impl SelectLimit {
    pub const DEFAULT: i32 = 30;

    pub fn new(value: impl Into<i32>) -> Self {
        SelectLimit(value.into())
    }

    /// One row past the page, fetched to tell whether another page follows.
    pub fn lookahead(&self) -> Self {
        SelectLimit(self.0.saturating_add(1))
    }
}

impl Default for SelectLimit {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectOffset(i32);

impl SelectOffset {
    /// Negative offsets start from the first row.
    pub fn new(value: impl Into<i32>) -> Self {
        SelectOffset(value.into().max(0))
    }
}
