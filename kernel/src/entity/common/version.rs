use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Optimistic concurrency token of a stored `T`.
///
/// Storage only accepts a write when the version carried by the written
/// value still equals the stored one, and bumps it on success.
pub struct Version<T>(i64, PhantomData<T>);

impl<T> Version<T> {
    pub fn new(version: impl Into<i64>) -> Self {
        Self(version.into(), PhantomData)
    }

    pub fn initial() -> Self {
        Self::new(0)
    }

    pub fn next(&self) -> Self {
        Self::new(self.0 + 1)
    }
}

impl<T> Clone for Version<T> {
    fn clone(&self) -> Self {
        Self(self.0, PhantomData)
    }
}

impl<T> Debug for Version<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Version").field(&self.0).finish()
    }
}

impl<T> PartialEq for Version<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Version<T> {}

impl<T> From<i64> for Version<T> {
    fn from(version: i64) -> Self {
        Self::new(version)
    }
}

impl<T> AsRef<i64> for Version<T> {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}

impl<T> Serialize for Version<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Version<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::new)
    }
}
