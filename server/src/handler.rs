use std::ops::Deref;
use std::sync::Arc;

use driver::bus::InMemoryEventBus;
use driver::database::StorageBackend;
use kernel::interface::bus::DependOnEventPublisher;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{DependOnItemQuery, DependOnWishlistQuery};
use kernel::interface::update::{DependOnItemModifier, DependOnWishlistModifier};

#[derive(Clone)]
pub struct AppModule<B: StorageBackend>(Arc<Handler<B>>);

impl<B: StorageBackend> AppModule<B> {
    pub fn new(database: B, bus: Arc<InMemoryEventBus>) -> Self {
        Self(Arc::new(Handler { database, bus }))
    }
}

impl<B: StorageBackend> Deref for AppModule<B> {
    type Target = Handler<B>;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler<B: StorageBackend> {
    database: B,
    bus: Arc<InMemoryEventBus>,
}

impl<B: StorageBackend> DependOnDatabaseConnection for Handler<B> {
    type DatabaseConnection = B;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl<B: StorageBackend> DependOnItemQuery for Handler<B> {
    type ItemQuery = B::ItemRepository;
    fn item_query(&self) -> &Self::ItemQuery {
        self.database.item_repository()
    }
}

impl<B: StorageBackend> DependOnItemModifier for Handler<B> {
    type ItemModifier = B::ItemRepository;
    fn item_modifier(&self) -> &Self::ItemModifier {
        self.database.item_repository()
    }
}

impl<B: StorageBackend> DependOnWishlistQuery for Handler<B> {
    type WishlistQuery = B::WishlistRepository;
    fn wishlist_query(&self) -> &Self::WishlistQuery {
        self.database.wishlist_repository()
    }
}

impl<B: StorageBackend> DependOnWishlistModifier for Handler<B> {
    type WishlistModifier = B::WishlistRepository;
    fn wishlist_modifier(&self) -> &Self::WishlistModifier {
        self.database.wishlist_repository()
    }
}

impl<B: StorageBackend> DependOnEventPublisher for Handler<B> {
    type EventPublisher = InMemoryEventBus;
    fn event_publisher(&self) -> &Self::EventPublisher {
        &self.bus
    }
}
