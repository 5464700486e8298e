//! Typed event channels.
//!
//! Progress and identity changes travel on separate channels so each carries
//! exactly one payload type. Anything that can accept an event implements
//! [`Sink`]; [`EventBus`] fans events out to every current subscriber.

use std::fmt;
use std::sync::{mpsc, Arc};

use tokio::sync::broadcast;

use super::progress::Progress;
use crate::auth::AuthenticationChanged;

pub const PROGRESS_CHANNEL: &str = "progress";
pub const AUTHENTICATION_CHANGED_CHANNEL: &str = "authenticationChanged";

const DEFAULT_CAPACITY: usize = 64;

/// Publish side of a channel carrying events of type `E`.
pub trait Sink<E>: Send + Sync {
    fn publish(&self, event: E);
}

/// Broadcast channel with a fixed name.
pub struct EventBus<E> {
    name: &'static str,
    tx: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { name, tx }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventBus<Progress> {
    pub fn progress() -> Self {
        Self::new(PROGRESS_CHANNEL, DEFAULT_CAPACITY)
    }
}

impl EventBus<AuthenticationChanged> {
    pub fn authentication_changed() -> Self {
        Self::new(AUTHENTICATION_CHANGED_CHANNEL, DEFAULT_CAPACITY)
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("name", &self.name)
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}

impl<E> Sink<E> for EventBus<E>
where
    E: Clone + fmt::Debug + Send,
{
    fn publish(&self, event: E) {
        tracing::debug!(channel = self.name, ?event, "publishing event");
        // A bus with no subscribers drops the event.
        let _ = self.tx.send(event);
    }
}

impl<E: Send> Sink<E> for mpsc::Sender<E> {
    fn publish(&self, event: E) {
        let _ = self.send(event);
    }
}

impl<E, S> Sink<E> for Arc<S>
where
    S: Sink<E> + ?Sized,
{
    fn publish(&self, event: E) {
        (**self).publish(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[tokio::test]
    async fn test_bus_fans_out_to_every_subscriber() {
        let bus = EventBus::progress();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(Progress::indeterminate("Authenticating..."));

        assert_eq!(
            first.recv().await.unwrap(),
            Progress::indeterminate("Authenticating...")
        );
        assert_eq!(
            second.recv().await.unwrap(),
            Progress::indeterminate("Authenticating...")
        );
    }

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let bus = EventBus::authentication_changed();
        bus.publish(AuthenticationChanged {
            authenticated: Role::Admin,
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(EventBus::progress().name(), "progress");
        assert_eq!(
            EventBus::authentication_changed().name(),
            "authenticationChanged"
        );
    }

    #[test]
    fn test_std_sender_and_arc_are_sinks() {
        let (tx, rx) = mpsc::channel();
        let shared = Arc::new(tx);
        shared.publish(Progress::failure("boom"));
        assert_eq!(rx.try_recv().unwrap(), Progress::failure("boom"));
    }
}
