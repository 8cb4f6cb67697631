use std::sync::{Arc, Mutex, PoisonError};

use driver::database::{InMemoryDatabase, InMemoryItemRepository, InMemoryWishlistRepository};
use kernel::interface::bus::{DependOnEventPublisher, EventPublisher};
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::event::{BookingChangedEvent, EventEnvelope};
use kernel::interface::query::{DependOnItemQuery, DependOnWishlistQuery};
use kernel::interface::update::{DependOnItemModifier, DependOnWishlistModifier};
use kernel::KernelError;

/// Keeps every published envelope.
#[derive(Default)]
pub struct RecordingPublisher {
    envelopes: Mutex<Vec<EventEnvelope>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<BookingChangedEvent> {
        self.envelopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|envelope| envelope.decode::<BookingChangedEvent>().unwrap())
            .collect()
    }
}

#[async_trait::async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, envelope: EventEnvelope) -> error_stack::Result<(), KernelError> {
        self.envelopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope);
        Ok(())
    }
}

pub struct TestModule<P: EventPublisher> {
    database: InMemoryDatabase,
    publisher: Arc<P>,
}

impl TestModule<RecordingPublisher> {
    pub fn recording() -> Self {
        Self::new(Arc::new(RecordingPublisher::default()))
    }
}

impl<P: EventPublisher> TestModule<P> {
    pub fn new(publisher: Arc<P>) -> Self {
        Self {
            database: InMemoryDatabase::new(),
            publisher,
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

impl<P: EventPublisher> DependOnDatabaseConnection for TestModule<P> {
    type DatabaseConnection = InMemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl<P: EventPublisher> DependOnItemQuery for TestModule<P> {
    type ItemQuery = InMemoryItemRepository;
    fn item_query(&self) -> &Self::ItemQuery {
        &InMemoryItemRepository
    }
}

impl<P: EventPublisher> DependOnItemModifier for TestModule<P> {
    type ItemModifier = InMemoryItemRepository;
    fn item_modifier(&self) -> &Self::ItemModifier {
        &InMemoryItemRepository
    }
}

impl<P: EventPublisher> DependOnWishlistQuery for TestModule<P> {
    type WishlistQuery = InMemoryWishlistRepository;
    fn wishlist_query(&self) -> &Self::WishlistQuery {
        &InMemoryWishlistRepository
    }
}

impl<P: EventPublisher> DependOnWishlistModifier for TestModule<P> {
    type WishlistModifier = InMemoryWishlistRepository;
    fn wishlist_modifier(&self) -> &Self::WishlistModifier {
        &InMemoryWishlistRepository
    }
}

impl<P: EventPublisher> DependOnEventPublisher for TestModule<P> {
    type EventPublisher = P;
    fn event_publisher(&self) -> &Self::EventPublisher {
        &self.publisher
    }
}
