//! The topic-keyed, cancellable, backpressured event bus (component G).
//!
//! Each topic is backed by a [`tokio::sync::broadcast`] channel: publish
//! never blocks on a slow consumer, and a consumer that falls behind
//! the channel's bounded capacity silently skips the oldest
//! unconsumed events rather than stalling the publisher (§4.G "slow
//! consumers must not block the publisher"; §5 drop-oldest
//! backpressure). Subscribing never replays events published before
//! the call, and ends the returned stream cleanly once its
//! [`Cancellation`] fires.

mod cancellation;
mod topic;

use std::collections::HashMap;

use futures::stream::{self, Stream};
use hexrealm_types::GameEvent;
use tokio::sync::{broadcast, Mutex};
use tracing::warn;
use uuid::Uuid;

pub use cancellation::{cancellation_pair, Cancellation, CancellationHandle};
pub use topic::Topic;

/// Per-topic channel capacity: how many unconsumed events a lagging
/// subscriber may fall behind by before the oldest are dropped.
const DEFAULT_CAPACITY: usize = 256;

/// The process-wide publish/subscribe registry. Independent of any
/// per-game [`tokio::sync::Mutex<GameState>`] (§5): publishing an
/// event never needs a game's own lock.
#[derive(Debug)]
pub struct EventBus {
    channels: Mutex<HashMap<Topic, broadcast::Sender<GameEvent>>>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    /// A bus whose per-topic channels hold up to `capacity` unconsumed
    /// events before a lagging subscriber starts skipping the oldest.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// `publish(topic, event)` (§4.G): deliver to every current
    /// subscriber of `topic`. A no-op if nobody has ever subscribed.
    pub async fn publish(&self, topic: &Topic, event: GameEvent) {
        let channels = self.channels.lock().await;
        if let Some(sender) = channels.get(topic) {
            // Err means no receivers are currently attached; that is
            // not a delivery failure, there is simply nobody to notify.
            let _ = sender.send(event);
        }
    }

    /// `subscribe(topic, cancellation)` (§4.G): a lazy sequence of
    /// events published to `topic` from this point on, ending cleanly
    /// once `cancellation` fires.
    pub async fn subscribe(&self, topic: Topic, cancellation: Cancellation) -> impl Stream<Item = GameEvent> {
        let mut channels = self.channels.lock().await;
        let sender = channels.entry(topic).or_insert_with(|| broadcast::channel(self.capacity).0);
        let receiver = sender.subscribe();
        drop(channels);
        subscription_stream(receiver, cancellation, Uuid::new_v4())
    }
}

/// `receiver.recv()`'s `Lagged` branch reports only a count, not which
/// subscriber fell behind; tagging each stream with a correlation id
/// at subscribe time lets the `warn!` below identify the culprit in a
/// process running many concurrent subscriptions.
fn subscription_stream(receiver: broadcast::Receiver<GameEvent>, cancellation: Cancellation, subscriber_id: Uuid) -> impl Stream<Item = GameEvent> {
    stream::unfold((receiver, cancellation), move |(mut receiver, mut cancellation)| async move {
        loop {
            tokio::select! {
                () = cancellation.cancelled() => return None,
                received = receiver.recv() => match received {
                    Ok(event) => return Some((event, (receiver, cancellation))),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(%subscriber_id, skipped, "bus subscriber lagged, dropping oldest events");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use hexrealm_types::{GameId, UserId};

    use super::*;

    #[tokio::test]
    async fn subscriber_receives_events_published_after_subscription() {
        let bus = EventBus::default();
        let topic = Topic::game(&GameId::from("g1"));
        let (_handle, cancellation) = cancellation_pair();

        let stream = bus.subscribe(topic.clone(), cancellation).await;
        tokio::pin!(stream);

        bus.publish(&topic, GameEvent::Paused).await;
        let received = stream.next().await;
        assert!(matches!(received, Some(GameEvent::Paused)));
    }

    #[tokio::test]
    async fn subscriber_does_not_see_events_published_before_it_subscribed() {
        let bus = EventBus::default();
        let topic = Topic::game(&GameId::from("g1"));

        bus.publish(&topic, GameEvent::Paused).await;

        let (_handle, cancellation) = cancellation_pair();
        let stream = bus.subscribe(topic.clone(), cancellation).await;
        tokio::pin!(stream);

        bus.publish(&topic, GameEvent::Resumed).await;
        let received = stream.next().await;
        assert!(matches!(received, Some(GameEvent::Resumed)));
    }

    #[tokio::test]
    async fn cancellation_ends_the_stream() {
        let bus = EventBus::default();
        let topic = Topic::game(&GameId::from("g1"));
        let (handle, cancellation) = cancellation_pair();

        let stream = bus.subscribe(topic, cancellation).await;
        tokio::pin!(stream);

        handle.cancel();
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn two_topics_for_the_same_game_are_independent() {
        let bus = EventBus::default();
        let game_id = GameId::from("g1");
        let broadcast_topic = Topic::game(&game_id);
        let player_topic = Topic::player(&game_id, &UserId::from("p0"));
        let (_handle, cancellation) = cancellation_pair();

        let stream = bus.subscribe(player_topic, cancellation).await;
        tokio::pin!(stream);

        bus.publish(&broadcast_topic, GameEvent::Paused).await;

        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(50), stream.next()).await;
        assert!(timed_out.is_err());
    }
}
