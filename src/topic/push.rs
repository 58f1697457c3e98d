//! Push-delivered topics: decode, then fan out.

use serde::de::DeserializeOwned;

use super::{Subscriber, Topic};

/// A topic fed by an external transport delivering raw JSON payloads.
///
/// Holds no state of its own; the payload type does the decoding.
pub struct PushTopic<T> {
    topic: Topic<T>,
}

impl<T: DeserializeOwned + Send + Sync + 'static> PushTopic<T> {
    pub fn new(name: &'static str) -> Self {
        PushTopic {
            topic: Topic::new(name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.topic.name()
    }

    pub fn subscribe(&self, subscriber: Subscriber<T>) {
        self.topic.subscribe(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.topic.subscriber_count()
    }

    /// Decodes a delivered payload and publishes it verbatim.
    ///
    /// # Errors
    ///
    /// A malformed payload aborts the publish before any subscriber
    /// runs; a subscriber error aborts the remaining dispatch. Both
    /// propagate to the transport.
    pub async fn publish_raw(&self, payload: &str) -> crate::Result<()> {
        let message: T = serde_json::from_str(payload)?;
        self.topic.publish(message).await
    }

    /// Publishes an already-decoded message (used by in-process tests).
    pub async fn publish(&self, message: T) -> crate::Result<()> {
        self.topic.publish(message).await
    }
}
