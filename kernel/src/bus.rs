mod config;
mod handler;

pub use self::{config::*, handler::*};
use crate::event::{EventEnvelope, EventName};
use crate::KernelError;

#[async_trait::async_trait]
pub trait EventPublisher: 'static + Sync + Send {
    /// Enqueues the event without waiting for any handler to run.
    ///
    /// Waits while the queue is full. Fails with [`KernelError::EventBusClosed`]
    /// once the bus has stopped accepting events.
    async fn publish(&self, envelope: EventEnvelope) -> error_stack::Result<(), KernelError>;

    /// Publishes in order. Stops at the first rejected event, so nothing
    /// after it is enqueued.
    async fn publish_many(
        &self,
        envelopes: Vec<EventEnvelope>,
    ) -> error_stack::Result<(), KernelError> {
        for envelope in envelopes {
            self.publish(envelope).await?;
        }
        Ok(())
    }
}

pub trait DependOnEventPublisher: 'static + Sync + Send {
    type EventPublisher: EventPublisher;
    fn event_publisher(&self) -> &Self::EventPublisher;
}

pub trait EventSubscriber: 'static + Sync + Send {
    /// Handlers for the same name run in registration order.
    fn subscribe<H: EventHandler>(&self, name: EventName, handler: H);
}
