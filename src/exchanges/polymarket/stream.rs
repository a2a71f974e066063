//! Market data stream stub.
//!
//! No websocket is opened. `connect` only reports the stream as connected so
//! host connectivity checks pass when Polymarket is used purely for order
//! entry and candles come from another venue.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::debug;

use crate::core::{MarketStream, Result, StreamEvent};

#[derive(Clone, Default)]
pub struct PolymarketStream {
    connected: Arc<RwLock<bool>>,
    subscribers: Arc<Mutex<Vec<flume::Sender<StreamEvent>>>>,
}

impl PolymarketStream {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&self, event: StreamEvent) {
        // drop subscribers whose receiver is gone
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event).is_ok());
    }
}

#[async_trait]
impl MarketStream for PolymarketStream {
    async fn connect(&self) -> Result<()> {
        *self.connected.write() = true;
        debug!("polymarket stream connected (no-op)");
        self.emit(StreamEvent::Connected);
        self.emit(StreamEvent::Started);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        *self.connected.write() = false;
        self.emit(StreamEvent::Disconnected);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        *self.connected.read()
    }

    fn subscribe(&self) -> flume::Receiver<StreamEvent> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_and_close() {
        let stream = PolymarketStream::new();
        let rx = stream.subscribe();
        assert!(!stream.is_connected());

        stream.connect().await.unwrap();
        assert!(stream.is_connected());
        assert_eq!(rx.try_recv().unwrap(), StreamEvent::Connected);
        assert_eq!(rx.try_recv().unwrap(), StreamEvent::Started);

        stream.close().await.unwrap();
        assert!(!stream.is_connected());
        assert_eq!(rx.try_recv().unwrap(), StreamEvent::Disconnected);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_pruned() {
        let stream = PolymarketStream::new();
        drop(stream.subscribe());
        stream.connect().await.unwrap();
        assert!(stream.subscribers.lock().is_empty());
    }
}
