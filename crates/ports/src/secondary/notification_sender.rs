use std::future::Future;
use std::pin::Pin;

use domain::common::error::DomainError;
use domain::notify::entity::{ChannelPolicy, NotificationMessage};

/// Secondary port for dispatching rendered notifications.
///
/// Delivery is best-effort and unacknowledged: implementations must bound
/// the send in time and report failure through the `Result` only — callers
/// log and move on, they never retry here.
///
/// Uses `Pin<Box<dyn Future>>` return type (instead of RPITIT) so the trait
/// is dyn-compatible and can be used as `Arc<dyn NotificationSender>`.
pub trait NotificationSender: Send + Sync {
    /// Send a message to the channel's configured endpoint.
    fn send<'a>(
        &'a self,
        message: &'a NotificationMessage,
        channel: &'a ChannelPolicy,
    ) -> Pin<Box<dyn Future<Output = Result<(), DomainError>> + Send + 'a>>;
}
