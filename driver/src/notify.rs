use tracing::info;

use kernel::interface::notify::{Notification, NotificationSink};
use kernel::KernelError;

/// Delivers notifications by writing them to the log.
#[derive(Debug, Clone, Default)]
pub struct TracingNotificationSink;

#[async_trait::async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify(&self, notification: &Notification) -> error_stack::Result<(), KernelError> {
        let event = notification.event();
        info!(
            recipient = %notification.recipient().as_ref(),
            reason = ?notification.reason(),
            wishlist = %event.item_id().wishlist_id().as_ref(),
            product = %event.item_id().product_id().as_ref(),
            "Notification delivered"
        );
        Ok(())
    }
}
