use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, Weak},
};

use futures::{Stream, stream};
use tokio::sync::broadcast::{self, Receiver, Sender, error::RecvError};
use tracing::warn;
use tracking_core::{Topic, TrackingEvent};

#[derive(Debug)]
struct Registry {
    buffer_size: usize,
    topics: RwLock<HashMap<Topic, Sender<TrackingEvent>>>,
}

/// Topic based fan-out of [`TrackingEvent`]s to live subscribers.
///
/// Events are delivered at most once to the subscribers registered when they are
/// published, nothing is retained for late subscribers.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    registry: Arc<Registry>,
}

/// A live registration on one topic, dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    receiver: Option<Receiver<TrackingEvent>>,
    registry: Weak<Registry>,
}

impl EventPublisher {
    /// `buffer_size` bounds how many events a slow subscriber can fall behind before
    /// it starts losing the oldest ones.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            registry: Arc::new(Registry {
                buffer_size: buffer_size.max(1),
                topics: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Returns the number of subscribers the event was delivered to.
    pub fn publish(&self, topic: Topic, event: TrackingEvent) -> usize {
        let topics = self
            .registry
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        topics
            .get(&topic)
            .and_then(|sender| sender.send(event).ok())
            .unwrap_or(0)
    }

    pub fn publish_all(
        &self,
        topics: impl IntoIterator<Item = Topic>,
        event: &TrackingEvent,
    ) -> usize {
        topics
            .into_iter()
            .map(|topic| self.publish(topic, event.clone()))
            .sum()
    }

    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let mut topics = self
            .registry
            .topics
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let receiver = topics
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.registry.buffer_size).0)
            .subscribe();

        Subscription {
            topic,
            receiver: Some(receiver),
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        drop(subscription);
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.registry
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.registry
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Waits for the next event, returns `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<TrackingEvent> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        topic = %self.topic,
                        skipped,
                        "subscriber fell behind, dropped oldest events"
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = TrackingEvent> + Send + 'static {
        stream::unfold(self, |mut subscription| async move {
            subscription
                .recv()
                .await
                .map(|event| (event, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Our own receiver must be gone before the topic can be considered empty.
        drop(self.receiver.take());

        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut topics = registry
            .topics
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if topics
            .get(&self.topic)
            .is_some_and(|s| s.receiver_count() == 0)
        {
            topics.remove(&self.topic);
        }
    }
}
