use std::sync::Arc;

use tracing::{debug, warn};

use kernel::interface::bus::EventSubscriber;
use kernel::interface::event::{BookingChangedEvent, DomainEvent, EventEnvelope};
use kernel::interface::notify::{Notification, NotificationReason, NotificationSink};
use kernel::prelude::entity::UserId;
use kernel::KernelError;

/// Decides who hears about a booking change.
///
/// A booking notifies the new occupant and the wish owner, unless the owner
/// booked their own wish. A removal notifies the former occupant, unless
/// they removed it themselves.
pub fn recipients(event: &BookingChangedEvent) -> Vec<Notification> {
    let owner = event.wish_owner();
    let notify = |recipient: &UserId, reason| {
        Notification::new(recipient.clone(), reason, event.clone())
    };
    match (event.old_booked_by(), event.new_booked_by()) {
        (_, Some(booker)) if booker != owner => vec![
            notify(booker, NotificationReason::BookingConfirmed),
            notify(owner, NotificationReason::WishBooked),
        ],
        (Some(former), None) if former != owner && event.event_by() != former => {
            vec![notify(former, NotificationReason::BookingRemoved)]
        }
        _ => Vec::new(),
    }
}

/// Forwards [`BookingChangedEvent`]s to a [`NotificationSink`].
pub struct BookingNotifySubscriber<S: NotificationSink> {
    sink: Arc<S>,
}

impl<S: NotificationSink> BookingNotifySubscriber<S> {
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    pub fn subscribe<B: EventSubscriber>(self, bus: &B) {
        let sink = self.sink;
        bus.subscribe(
            BookingChangedEvent::name(),
            move |envelope: EventEnvelope| {
                let sink = Arc::clone(&sink);
                async move { handle(sink.as_ref(), &envelope).await }
            },
        );
    }
}

/// Every recipient is attempted; the first failure is reported.
async fn handle<S: NotificationSink>(
    sink: &S,
    envelope: &EventEnvelope,
) -> error_stack::Result<(), KernelError> {
    let event = envelope.decode::<BookingChangedEvent>()?;
    let notifications = recipients(&event);
    if notifications.is_empty() {
        debug!("No notification for event {}", envelope.id());
        return Ok(());
    }
    let mut failure = None;
    for notification in notifications {
        if let Err(report) = sink.notify(&notification).await {
            warn!("Failed to notify {:?}", notification.recipient());
            failure.get_or_insert(report);
        }
    }
    match failure {
        Some(report) => Err(report),
        None => Ok(()),
    }
}
