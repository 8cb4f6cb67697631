mod booking;

pub use self::booking::*;
use destructure::Destructure;
use error_stack::{Report, ResultExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::References;

use crate::KernelError;

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventName(String);

impl EventName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A typed event that can travel through the event bus.
pub trait DomainEvent: 'static + Sync + Send + Serialize + DeserializeOwned {
    const NAME: &'static str;

    fn name() -> EventName {
        EventName::new(Self::NAME)
    }
}

/// Serialized form of a [`DomainEvent`] as carried by the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct EventEnvelope {
    id: Uuid,
    name: EventName,
    payload: serde_json::Value,
}

impl EventEnvelope {
    pub fn new(id: Uuid, name: EventName, payload: serde_json::Value) -> Self {
        Self { id, name, payload }
    }

    pub fn encode<E: DomainEvent>(event: &E) -> error_stack::Result<Self, KernelError> {
        let payload = serde_json::to_value(event)
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| format!("Failed to encode event {}", E::NAME))?;
        Ok(Self::new(Uuid::new_v4(), E::name(), payload))
    }

    pub fn decode<E: DomainEvent>(&self) -> error_stack::Result<E, KernelError> {
        if self.name.as_str() != E::NAME {
            return Err(Report::new(KernelError::InvalidEventPayload).attach_printable(format!(
                "Expected {} but received {}",
                E::NAME,
                self.name.as_str()
            )));
        }
        serde_json::from_value(self.payload.clone())
            .change_context_lazy(|| KernelError::InvalidEventPayload)
            .attach_printable_lazy(|| format!("Event id: {}", self.id))
    }
}
