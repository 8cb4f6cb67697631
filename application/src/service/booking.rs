use error_stack::Report;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use kernel::interface::bus::{DependOnEventPublisher, EventPublisher};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::event::{BookingChangedEvent, EventEnvelope};
use kernel::interface::query::{DependOnItemQuery, DependOnWishlistQuery, ItemQuery, WishlistQuery};
use kernel::interface::update::{DependOnItemModifier, ItemModifier};
use kernel::prelude::entity::{BookingTransition, Item, ItemId, ProductId, UserId, WishlistId};
use kernel::KernelError;

use crate::transfer::{BookItemDto, ItemDto, SetBookingAvailabilityDto, UnbookItemDto};

/// Number of optimistic attempts before a contended write gives up.
pub const MAX_BOOKING_ATTEMPTS: usize = 5;

/// A committed booking operation.
struct Applied {
    item: Item,
    owner: UserId,
    old_booked_by: Option<UserId>,
    new_booked_by: Option<UserId>,
    changed: bool,
}

/// Reads the item and its wishlist, applies `transition` and writes the
/// result back with a conditional update. A lost race re-reads and
/// re-evaluates, so decisions are always made against the latest state.
async fn apply<T: ?Sized, F>(
    module: &T,
    id: &ItemId,
    transition: F,
) -> error_stack::Result<Applied, KernelError>
where
    T: DependOnItemQuery + DependOnItemModifier + DependOnWishlistQuery,
    F: Fn(Item, &UserId) -> error_stack::Result<BookingTransition, KernelError> + Send + Sync,
{
    let mut attempt = 1;
    loop {
        let mut con = module.database_connection().transact().await?;
        let item = module
            .item_query()
            .find_by_id(&mut con, id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::ItemNotFound).attach_printable(format!("item: {id:?}"))
            })?;
        let wishlist = module
            .wishlist_query()
            .find_by_id(&mut con, id.wishlist_id())
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::WishlistNotFound)
                    .attach_printable(format!("wishlist: {:?}", id.wishlist_id()))
            })?;
        let owner = wishlist.user_id().clone();

        match transition(item.clone(), &owner)? {
            BookingTransition::Unchanged => {
                con.commit().await?;
                let booked_by = item.booked_by().clone();
                return Ok(Applied {
                    item,
                    owner,
                    old_booked_by: booked_by.clone(),
                    new_booked_by: booked_by,
                    changed: false,
                });
            }
            BookingTransition::Changed {
                item,
                old_booked_by,
                new_booked_by,
            } => match module.item_modifier().update(&mut con, &item).await {
                Ok(()) => {
                    con.commit().await?;
                    let item = item.reconstruct(|i| i.version = i.version.next());
                    return Ok(Applied {
                        item,
                        owner,
                        old_booked_by,
                        new_booked_by,
                        changed: true,
                    });
                }
                Err(report) if matches!(report.current_context(), KernelError::Concurrency) => {
                    con.roll_back().await?;
                    if attempt >= MAX_BOOKING_ATTEMPTS {
                        warn!("Giving up on {id:?} after {attempt} attempts");
                        return Err(report.attach_printable(format!("attempts: {attempt}")));
                    }
                    debug!("Write conflict on {id:?}, attempt {attempt}");
                    attempt += 1;
                }
                Err(report) => return Err(report),
            },
        }
    }
}

async fn publish_change<T: ?Sized>(
    module: &T,
    item_id: &ItemId,
    applied: &Applied,
    event_by: &UserId,
) where
    T: DependOnEventPublisher,
{
    let event = BookingChangedEvent::new(
        item_id.clone(),
        applied.owner.clone(),
        applied.old_booked_by.clone(),
        applied.new_booked_by.clone(),
        event_by.clone(),
        *applied.item.updated_at().as_ref(),
    );
    let published = match EventEnvelope::encode(&event) {
        Ok(envelope) => module.event_publisher().publish(envelope).await,
        Err(report) => Err(report),
    };
    if let Err(report) = published {
        error!("{report:?}");
    }
}

fn item_id(wishlist_id: uuid::Uuid, product_id: uuid::Uuid) -> ItemId {
    ItemId::new(WishlistId::new(wishlist_id), ProductId::new(product_id))
}

#[async_trait::async_trait]
pub trait BookItemService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnItemQuery
    + DependOnItemModifier
    + DependOnWishlistQuery
    + DependOnEventPublisher
{
    /// Books the item for `user_id`. Re-booking by the current occupant is
    /// a no-op and emits no event.
    ///
    /// Fails with [`KernelError::Concurrency`] when every one of the
    /// [`MAX_BOOKING_ATTEMPTS`] writes lost to a concurrent update, which is
    /// distinct from [`KernelError::ItemAlreadyBooked`].
    #[tracing::instrument(skip_all, fields(wishlist = %dto.wishlist_id, product = %dto.product_id, user = %dto.user_id))]
    async fn book_item(&self, dto: BookItemDto) -> error_stack::Result<ItemDto, KernelError> {
        let id = item_id(dto.wishlist_id, dto.product_id);
        let actor = UserId::new(dto.user_id);
        let applied = apply(self, &id, |item, _| {
            item.book(&actor, OffsetDateTime::now_utc())
        })
        .await?;
        if applied.changed {
            info!("Item booked");
            publish_change(self, &id, &applied, &actor).await;
        } else {
            debug!("Item already booked by the same user");
        }
        Ok(ItemDto::from(applied.item))
    }
}

impl<T> BookItemService for T where
    T: DependOnDatabaseConnection
        + DependOnItemQuery
        + DependOnItemModifier
        + DependOnWishlistQuery
        + DependOnEventPublisher
{
}

#[async_trait::async_trait]
pub trait UnbookItemService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnItemQuery
    + DependOnItemModifier
    + DependOnWishlistQuery
    + DependOnEventPublisher
{
    /// Clears the occupant. Allowed for the occupant and the wish owner.
    ///
    /// Fails with [`KernelError::Concurrency`] when every one of the
    /// [`MAX_BOOKING_ATTEMPTS`] writes lost to a concurrent update.
    #[tracing::instrument(skip_all, fields(wishlist = %dto.wishlist_id, product = %dto.product_id, user = %dto.user_id))]
    async fn unbook_item(&self, dto: UnbookItemDto) -> error_stack::Result<ItemDto, KernelError> {
        let id = item_id(dto.wishlist_id, dto.product_id);
        let actor = UserId::new(dto.user_id);
        let applied = apply(self, &id, |item, owner| {
            item.unbook(&actor, owner, OffsetDateTime::now_utc())
        })
        .await?;
        if applied.changed {
            info!("Item unbooked");
            publish_change(self, &id, &applied, &actor).await;
        } else {
            debug!("Item was not booked");
        }
        Ok(ItemDto::from(applied.item))
    }
}

impl<T> UnbookItemService for T where
    T: DependOnDatabaseConnection
        + DependOnItemQuery
        + DependOnItemModifier
        + DependOnWishlistQuery
        + DependOnEventPublisher
{
}

#[async_trait::async_trait]
pub trait SetBookingAvailabilityService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnItemQuery
    + DependOnItemModifier
    + DependOnWishlistQuery
{
    /// Disabling booking drops the current occupant without emitting a
    /// booking event.
    #[tracing::instrument(skip_all, fields(wishlist = %dto.wishlist_id, product = %dto.product_id, available = dto.available))]
    async fn set_booking_availability(
        &self,
        dto: SetBookingAvailabilityDto,
    ) -> error_stack::Result<ItemDto, KernelError> {
        let id = item_id(dto.wishlist_id, dto.product_id);
        let available = dto.available;
        let applied = apply(self, &id, |item, _| {
            Ok(item.set_booking_availability(available, OffsetDateTime::now_utc()))
        })
        .await?;
        match (&applied.old_booked_by, &applied.new_booked_by) {
            (Some(occupant), None) => info!("Booking disabled, cleared occupant {occupant:?}"),
            _ if applied.changed => info!("Booking availability changed"),
            _ => debug!("Booking availability unchanged"),
        }
        Ok(ItemDto::from(applied.item))
    }
}

impl<T> SetBookingAvailabilityService for T where
    T: DependOnDatabaseConnection + DependOnItemQuery + DependOnItemModifier + DependOnWishlistQuery
{
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use error_stack::Report;
    use rand::Rng;
    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    use driver::bus::InMemoryEventBus;
    use driver::database::{
        InMemoryDatabase, InMemoryItemRepository, InMemoryTransaction, InMemoryWishlistRepository,
    };
    use kernel::interface::bus::{BusConfig, DependOnEventPublisher, EventPublisher};
    use kernel::interface::database::DependOnDatabaseConnection;
    use kernel::interface::notify::{Notification, NotificationReason, NotificationSink};
    use kernel::interface::query::{DependOnItemQuery, DependOnWishlistQuery};
    use kernel::interface::update::{DependOnItemModifier, ItemModifier};
    use kernel::prelude::entity::{Item, ItemId, UserId};
    use kernel::KernelError;

    use crate::service::{
        AddItemService, BookItemService, CreateWishlistService, GetItemService,
        SetBookingAvailabilityService, UnbookItemService, MAX_BOOKING_ATTEMPTS,
    };
    use crate::subscriber::BookingNotifySubscriber;
    use crate::testing::{RecordingPublisher, TestModule};
    use crate::transfer::{
        AddItemDto, BookItemDto, CreateWishlistDto, GetItemsDto, ItemDto,
        SetBookingAvailabilityDto, UnbookItemDto,
    };

    struct Fixture {
        owner: Uuid,
        wishlist_id: Uuid,
        product_id: Uuid,
    }

    impl Fixture {
        async fn create<P: EventPublisher>(
            module: &TestModule<P>,
        ) -> error_stack::Result<Self, KernelError> {
            let owner = Uuid::new_v4();
            let wishlist = module
                .create_wishlist(CreateWishlistDto {
                    user_id: owner,
                    title: "birthday".to_string(),
                    description: None,
                })
                .await?;
            let product_id = Uuid::new_v4();
            module
                .add_item(AddItemDto {
                    wishlist_id: wishlist.id,
                    product_id,
                })
                .await?;
            Ok(Self {
                owner,
                wishlist_id: wishlist.id,
                product_id,
            })
        }

        fn book(&self, user_id: Uuid) -> BookItemDto {
            BookItemDto {
                wishlist_id: self.wishlist_id,
                product_id: self.product_id,
                user_id,
            }
        }

        fn unbook(&self, user_id: Uuid) -> UnbookItemDto {
            UnbookItemDto {
                wishlist_id: self.wishlist_id,
                product_id: self.product_id,
                user_id,
            }
        }

        fn availability(&self, available: bool) -> SetBookingAvailabilityDto {
            SetBookingAvailabilityDto {
                wishlist_id: self.wishlist_id,
                product_id: self.product_id,
                available,
            }
        }

        async fn item<P: EventPublisher>(
            &self,
            module: &TestModule<P>,
        ) -> error_stack::Result<ItemDto, KernelError> {
            let page = module
                .get_items(GetItemsDto {
                    wishlist_id: self.wishlist_id,
                    limit: None,
                    offset: None,
                })
                .await?;
            Ok(page.items.into_iter().next().expect("fixture item"))
        }
    }

    fn user(id: Uuid) -> Option<UserId> {
        Some(UserId::new(id))
    }

    #[tokio::test]
    async fn rebooking_is_idempotent() -> error_stack::Result<(), KernelError> {
        let module = TestModule::recording();
        let fixture = Fixture::create(&module).await?;
        let guest = Uuid::new_v4();

        let first = module.book_item(fixture.book(guest)).await?;
        let second = module.book_item(fixture.book(guest)).await?;
        assert_eq!(first.booked_by, Some(guest));
        assert_eq!(second, first);

        let events = module.publisher().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].old_booked_by(), &None);
        assert_eq!(events[0].new_booked_by(), &user(guest));
        assert_eq!(events[0].event_by(), &UserId::new(guest));
        assert_eq!(events[0].wish_owner(), &UserId::new(fixture.owner));
        Ok(())
    }

    #[tokio::test]
    async fn occupied_item_is_exclusive() -> error_stack::Result<(), KernelError> {
        let module = TestModule::recording();
        let fixture = Fixture::create(&module).await?;
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());

        module.book_item(fixture.book(first)).await?;
        let report = module
            .book_item(fixture.book(second))
            .await
            .expect_err("occupied");
        assert!(matches!(
            report.current_context(),
            KernelError::ItemAlreadyBooked
        ));
        assert_eq!(fixture.item(&module).await?.booked_by, Some(first));
        assert_eq!(module.publisher().events().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn disabled_item_cannot_be_booked() -> error_stack::Result<(), KernelError> {
        let module = TestModule::recording();
        let fixture = Fixture::create(&module).await?;
        module
            .set_booking_availability(fixture.availability(false))
            .await?;

        for actor in [fixture.owner, Uuid::new_v4()] {
            let report = module
                .book_item(fixture.book(actor))
                .await
                .expect_err("disabled");
            assert!(matches!(
                report.current_context(),
                KernelError::BookingNotAvailable
            ));
        }
        let item = fixture.item(&module).await?;
        assert!(!item.is_booking_available);
        assert!(item.booked_by.is_none());
        assert!(module.publisher().events().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unbooking_requires_owner_or_occupant() -> error_stack::Result<(), KernelError> {
        let module = TestModule::recording();
        let fixture = Fixture::create(&module).await?;
        let (guest, stranger) = (Uuid::new_v4(), Uuid::new_v4());
        module.book_item(fixture.book(guest)).await?;

        let report = module
            .unbook_item(fixture.unbook(stranger))
            .await
            .expect_err("stranger");
        assert!(matches!(
            report.current_context(),
            KernelError::ItemBookedByAnotherUser
        ));
        assert_eq!(fixture.item(&module).await?.booked_by, Some(guest));

        let item = module.unbook_item(fixture.unbook(fixture.owner)).await?;
        assert!(item.booked_by.is_none());

        // nothing left to clear
        module.unbook_item(fixture.unbook(stranger)).await?;

        let events = module.publisher().events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].old_booked_by(), &user(guest));
        assert_eq!(events[1].new_booked_by(), &None);
        assert_eq!(events[1].event_by(), &UserId::new(fixture.owner));
        Ok(())
    }

    #[tokio::test]
    async fn disabling_clears_occupant_silently() -> error_stack::Result<(), KernelError> {
        let module = TestModule::recording();
        let fixture = Fixture::create(&module).await?;
        module.book_item(fixture.book(Uuid::new_v4())).await?;

        let item = module
            .set_booking_availability(fixture.availability(false))
            .await?;
        assert!(!item.is_booking_available);
        assert!(item.booked_by.is_none());
        assert_eq!(module.publisher().events().len(), 1);

        let item = module
            .set_booking_availability(fixture.availability(true))
            .await?;
        assert!(item.is_booking_available);
        assert!(item.booked_by.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn missing_item_is_reported() -> error_stack::Result<(), KernelError> {
        let module = TestModule::recording();
        let fixture = Fixture::create(&module).await?;
        let mut dto = fixture.book(Uuid::new_v4());
        dto.product_id = Uuid::new_v4();

        let report = module.book_item(dto).await.expect_err("missing");
        assert!(matches!(report.current_context(), KernelError::ItemNotFound));
        let report = module
            .set_booking_availability(SetBookingAvailabilityDto {
                wishlist_id: fixture.wishlist_id,
                product_id: Uuid::new_v4(),
                available: false,
            })
            .await
            .expect_err("missing");
        assert!(matches!(report.current_context(), KernelError::ItemNotFound));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_bookers_have_one_winner() -> error_stack::Result<(), KernelError> {
        const BOOKERS: usize = 16;
        let module = Arc::new(TestModule::recording());
        let fixture = Arc::new(Fixture::create(module.as_ref()).await?);

        let tasks = (0..BOOKERS)
            .map(|_| {
                let module = Arc::clone(&module);
                let fixture = Arc::clone(&fixture);
                let jitter = rand::thread_rng().gen_range(0..3);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(jitter)).await;
                    let actor = Uuid::new_v4();
                    (actor, module.book_item(fixture.book(actor)).await)
                })
            })
            .collect::<Vec<_>>();

        let mut winners = Vec::new();
        let mut rejected = 0;
        for task in tasks {
            let (actor, result) = task.await.unwrap();
            match result {
                Ok(_) => winners.push(actor),
                Err(report) => {
                    assert!(matches!(
                        report.current_context(),
                        KernelError::ItemAlreadyBooked
                    ));
                    rejected += 1;
                }
            }
        }
        assert_eq!(winners.len(), 1);
        assert_eq!(rejected, BOOKERS - 1);
        assert_eq!(
            fixture.item(module.as_ref()).await?.booked_by,
            Some(winners[0])
        );
        assert_eq!(module.publisher().events().len(), 1);
        Ok(())
    }

    /// Loses every conditional write, as if another writer always got there first.
    #[derive(Default)]
    struct OutracedModifier {
        updates: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ItemModifier for OutracedModifier {
        type Transaction = InMemoryTransaction;

        async fn create(
            &self,
            con: &mut InMemoryTransaction,
            item: &Item,
        ) -> error_stack::Result<(), KernelError> {
            InMemoryItemRepository.create(con, item).await
        }

        async fn update(
            &self,
            _: &mut InMemoryTransaction,
            item: &Item,
        ) -> error_stack::Result<(), KernelError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("item: {:?}", item.id())))
        }

        async fn delete(
            &self,
            con: &mut InMemoryTransaction,
            id: &ItemId,
        ) -> error_stack::Result<(), KernelError> {
            InMemoryItemRepository.delete(con, id).await
        }
    }

    struct OutracedModule {
        inner: TestModule<RecordingPublisher>,
        modifier: OutracedModifier,
    }

    impl DependOnDatabaseConnection for OutracedModule {
        type DatabaseConnection = InMemoryDatabase;
        fn database_connection(&self) -> &Self::DatabaseConnection {
            self.inner.database_connection()
        }
    }

    impl DependOnItemQuery for OutracedModule {
        type ItemQuery = InMemoryItemRepository;
        fn item_query(&self) -> &Self::ItemQuery {
            &InMemoryItemRepository
        }
    }

    impl DependOnItemModifier for OutracedModule {
        type ItemModifier = OutracedModifier;
        fn item_modifier(&self) -> &Self::ItemModifier {
            &self.modifier
        }
    }

    impl DependOnWishlistQuery for OutracedModule {
        type WishlistQuery = InMemoryWishlistRepository;
        fn wishlist_query(&self) -> &Self::WishlistQuery {
            &InMemoryWishlistRepository
        }
    }

    impl DependOnEventPublisher for OutracedModule {
        type EventPublisher = RecordingPublisher;
        fn event_publisher(&self) -> &Self::EventPublisher {
            self.inner.publisher()
        }
    }

    #[tokio::test]
    async fn exhausted_retries_report_concurrency() -> error_stack::Result<(), KernelError> {
        let module = OutracedModule {
            inner: TestModule::recording(),
            modifier: OutracedModifier::default(),
        };
        let fixture = Fixture::create(&module.inner).await?;
        let guest = Uuid::new_v4();

        let report = module
            .book_item(fixture.book(guest))
            .await
            .expect_err("every write is outraced");
        assert!(matches!(report.current_context(), KernelError::Concurrency));
        assert_eq!(
            module.modifier.updates.load(Ordering::SeqCst),
            MAX_BOOKING_ATTEMPTS
        );
        assert!(module.inner.publisher().events().is_empty());
        assert_eq!(fixture.item(&module.inner).await?.booked_by, None);
        Ok(())
    }

    #[tokio::test]
    async fn closed_bus_does_not_fail_booking() -> error_stack::Result<(), KernelError> {
        let bus = Arc::new(InMemoryEventBus::new(&BusConfig::default()));
        bus.stop().await;
        let module = TestModule::new(Arc::clone(&bus));
        let fixture = Fixture::create(&module).await?;
        let guest = Uuid::new_v4();

        let item = module.book_item(fixture.book(guest)).await?;
        assert_eq!(item.booked_by, Some(guest));
        Ok(())
    }

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<(Uuid, NotificationReason)>>,
    }

    #[async_trait::async_trait]
    impl NotificationSink for RecordingSink {
        async fn notify(&self, notification: &Notification) -> error_stack::Result<(), KernelError> {
            self.delivered
                .lock()
                .unwrap()
                .push((*notification.recipient().as_ref(), *notification.reason()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn booking_flow_notifies_through_the_bus() -> error_stack::Result<(), KernelError> {
        let bus = Arc::new(InMemoryEventBus::new(&BusConfig::default()));
        let sink = Arc::new(RecordingSink::default());
        BookingNotifySubscriber::new(Arc::clone(&sink)).subscribe(bus.as_ref());
        let worker = tokio::spawn({
            let bus = Arc::clone(&bus);
            async move { bus.run(CancellationToken::new()).await }
        });

        let module = TestModule::new(Arc::clone(&bus));
        let fixture = Fixture::create(&module).await?;
        let (u1, u2, u3) = (fixture.owner, Uuid::new_v4(), Uuid::new_v4());

        module.book_item(fixture.book(u2)).await?;
        let report = module
            .book_item(fixture.book(u3))
            .await
            .expect_err("occupied");
        assert!(matches!(
            report.current_context(),
            KernelError::ItemAlreadyBooked
        ));
        module.unbook_item(fixture.unbook(u1)).await?;
        module.book_item(fixture.book(u2)).await?;
        module.unbook_item(fixture.unbook(u2)).await?;

        bus.stop().await;
        worker.await.unwrap()?;

        assert_eq!(
            *sink.delivered.lock().unwrap(),
            vec![
                (u2, NotificationReason::BookingConfirmed),
                (u1, NotificationReason::WishBooked),
                (u2, NotificationReason::BookingRemoved),
                (u2, NotificationReason::BookingConfirmed),
                (u1, NotificationReason::WishBooked),
            ]
        );
        Ok(())
    }
}
