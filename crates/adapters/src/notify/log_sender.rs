use std::future::Future;
use std::pin::Pin;

use domain::common::error::DomainError;
use domain::notify::entity::{ChannelPolicy, NotificationMessage};
use ports::secondary::notification_sender::NotificationSender;

/// Notification sender that logs reports via tracing.
///
/// Used in place of the webhook sender for dry runs and local development.
pub struct LogNotificationSender;

impl NotificationSender for LogNotificationSender {
    fn send<'a>(
        &'a self,
        message: &'a NotificationMessage,
        channel: &'a ChannelPolicy,
    ) -> Pin<Box<dyn Future<Output = Result<(), DomainError>> + Send + 'a>> {
        Box::pin(async move {
            tracing::info!(
                channel = %channel.name,
                kind = ?channel.kind,
                body = %message.body,
                "notification sent to log"
            );
            Ok(())
        })
    }
}
