use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use error_stack::Report;
use tokio::sync::{mpsc, Mutex as AsyncMutex, RwLock as AsyncRwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use kernel::interface::bus::{BusConfig, EventHandler, EventPublisher, EventSubscriber};
use kernel::interface::event::{EventEnvelope, EventName};
use kernel::KernelError;

type Handlers = HashMap<EventName, Vec<Arc<dyn EventHandler>>>;

/// Bounded FIFO event bus dispatching to handlers on a single worker.
///
/// Events are delivered in publish order. Once [`stop`](Self::stop) is called
/// no further event is accepted, and everything already queued is still
/// dispatched before [`run`](Self::run) returns.
pub struct InMemoryEventBus {
    sender: AsyncRwLock<Option<mpsc::Sender<EventEnvelope>>>,
    receiver: AsyncMutex<Option<mpsc::Receiver<EventEnvelope>>>,
    handlers: RwLock<Handlers>,
    stopping: CancellationToken,
}

impl InMemoryEventBus {
    pub fn new(config: &BusConfig) -> Self {
        let (sender, receiver) = mpsc::channel(*config.capacity());
        Self {
            sender: AsyncRwLock::new(Some(sender)),
            receiver: AsyncMutex::new(Some(receiver)),
            handlers: RwLock::new(HashMap::new()),
            stopping: CancellationToken::new(),
        }
    }

    /// Dispatches queued events until the bus is stopped and drained, or
    /// `shutdown` is cancelled, which stops the bus and drains it.
    ///
    /// Only one worker may run per bus.
    pub async fn run(&self, shutdown: CancellationToken) -> error_stack::Result<(), KernelError> {
        let mut receiver = self.receiver.lock().await.take().ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable("Event bus is already running")
        })?;
        info!("Event bus worker started");
        loop {
            tokio::select! {
                envelope = receiver.recv() => match envelope {
                    Some(envelope) => self.dispatch(envelope).await,
                    None => break,
                },
                _ = shutdown.cancelled() => {
                    self.stop().await;
                    while let Some(envelope) = receiver.recv().await {
                        self.dispatch(envelope).await;
                    }
                    break;
                }
            }
        }
        info!("Event bus worker stopped");
        Ok(())
    }

    /// Stops accepting events. Idempotent.
    ///
    /// Publishers waiting on a full queue are released with
    /// [`KernelError::EventBusClosed`].
    pub async fn stop(&self) {
        self.stopping.cancel();
        if self.sender.write().await.take().is_some() {
            debug!("Event bus closed");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopping.is_cancelled()
    }

    async fn dispatch(&self, envelope: EventEnvelope) {
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(envelope.name())
            .cloned()
            .unwrap_or_default();
        if handlers.is_empty() {
            debug!(
                "No handler for event {} ({})",
                envelope.name().as_str(),
                envelope.id()
            );
            return;
        }
        for handler in handlers {
            if let Err(report) = handler.call(envelope.clone()).await {
                error!("{report:?}");
            }
        }
    }
}

#[async_trait::async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, envelope: EventEnvelope) -> error_stack::Result<(), KernelError> {
        let sender = self.sender.read().await;
        let Some(sender) = sender.as_ref() else {
            return Err(Report::new(KernelError::EventBusClosed)
                .attach_printable(format!("Rejected event {}", envelope.name().as_str())));
        };
        let id = *envelope.id();
        tokio::select! {
            biased;
            result = sender.send(envelope) => result.map_err(|error| {
                Report::new(KernelError::EventBusClosed)
                    .attach_printable(format!("Rejected event {}", error.0.id()))
            }),
            _ = self.stopping.cancelled() => {
                warn!("Event {id} dropped while waiting for queue capacity");
                Err(Report::new(KernelError::EventBusClosed)
                    .attach_printable(format!("Rejected event {id}")))
            }
        }
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe<H: EventHandler>(&self, name: EventName, handler: H) {
        debug!("Subscribed handler to {}", name.as_str());
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .push(Arc::new(handler));
    }
}
