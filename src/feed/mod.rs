//! Change-notification feed for live refresh.
//!
//! One broadcast channel for the whole process: every committed mutation
//! publishes a coarse "this table changed" event, and subscribers (the SSE
//! endpoint, and through it the UI) refetch the named collection in full.
//! Events carry nothing beyond (table, op) and promise no ordering: last
//! refresh wins, and a lagged subscriber skips straight to the newest
//! event and refetches anyway.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Tables a client may need to refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedTable {
    #[serde(rename = "requests")]
    Requests,
    #[serde(rename = "request_comments")]
    Comments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: FeedTable,
    pub op: ChangeOp,
}

/// Cloneable handle to the process-wide change channel. Created once at
/// startup and carried in application state; never a global.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a change. Send errors mean nobody is subscribed, which is
    /// normal; events are invalidation hints, not deliverables.
    pub fn publish(&self, table: FeedTable, op: ChangeOp) {
        let event = ChangeEvent { table, op };
        if self.tx.send(event).is_err() {
            tracing::debug!(?event, "change event dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let feed = ChangeFeed::new(8);
        let mut rx = feed.subscribe();

        feed.publish(FeedTable::Requests, ChangeOp::Insert);
        feed.publish(FeedTable::Comments, ChangeOp::Insert);

        assert_eq!(
            rx.recv().await.unwrap(),
            ChangeEvent {
                table: FeedTable::Requests,
                op: ChangeOp::Insert
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            ChangeEvent {
                table: FeedTable::Comments,
                op: ChangeOp::Insert
            }
        );
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let feed = ChangeFeed::new(8);
        feed.publish(FeedTable::Requests, ChangeOp::Delete);
        // a late subscriber sees nothing from before it joined
        let mut rx = feed.subscribe();
        feed.publish(FeedTable::Requests, ChangeOp::Update);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.op, ChangeOp::Update);
    }

    #[test]
    fn events_serialize_with_table_names_clients_refetch() {
        let event = ChangeEvent {
            table: FeedTable::Comments,
            op: ChangeOp::Insert,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["table"], "request_comments");
        assert_eq!(json["op"], "insert");
    }
}
