use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use domain::common::error::DomainError;
use domain::notify::entity::{ChannelPolicy, NotificationMessage};
use ports::secondary::notification_sender::NotificationSender;

/// Notification sender that POSTs the rendered block payload to a channel's
/// webhook URL.
///
/// Fire-and-forget by design: one attempt, bounded by the client timeout, no
/// retry and no delivery confirmation. Failures surface as `Err` for the
/// caller to log.
pub struct WebhookNotificationSender {
    client: reqwest::Client,
}

impl WebhookNotificationSender {
    /// Build a sender whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::InvalidConfig(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

impl NotificationSender for WebhookNotificationSender {
    fn send<'a>(
        &'a self,
        message: &'a NotificationMessage,
        channel: &'a ChannelPolicy,
    ) -> Pin<Box<dyn Future<Output = Result<(), DomainError>> + Send + 'a>> {
        Box::pin(async move {
            let Some(url) = channel.webhook_url.as_deref() else {
                return Err(DomainError::SendFailed(format!(
                    "channel '{}' has no webhook endpoint configured",
                    channel.name
                )));
            };

            let response = self
                .client
                .post(url)
                .json(&message.body)
                .send()
                .await
                .map_err(|e| DomainError::SendFailed(format!("webhook POST failed: {e}")))?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(DomainError::SendFailed(format!(
                    "webhook returned HTTP {}",
                    response.status()
                )))
            }
        })
    }
}
