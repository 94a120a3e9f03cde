use crate::{Error, Result, Sink};
use bytes::Bytes;
use tokio::sync::mpsc;

/// A [`Sink`] backed by a bounded Tokio channel.
///
/// The receiving half is typically wrapped in a stream and handed to the HTTP
/// layer as a response body. The channel capacity is the only buffering
/// between the session and the transport: once it fills, `write` waits,
/// which is how network backpressure throttles generation.
///
/// Dropping the receiver (the client disconnected and the body was dropped)
/// makes the next `write` fail. Closing drops the sender, which ends the
/// body stream.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Option<mpsc::Sender<Bytes>>,
}

impl ChannelSink {
    pub const fn new(tx: mpsc::Sender<Bytes>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Creates a sink together with the receiver that drains it.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Bytes>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    /// Returns `true` if the sink was closed or the receiver is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.as_ref().is_none_or(mpsc::Sender::is_closed)
    }
}

impl Sink for ChannelSink {
    async fn write(&mut self, chunk: Bytes) -> Result<()> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(Error::TransportWriteFailure {
                context: "sink already closed".to_string(),
            });
        };
        tx.send(chunk)
            .await
            .map_err(|e| Error::TransportWriteFailure {
                context: format!("receiver dropped ({} bytes unsent)", e.0.len()),
            })
    }

    async fn close(&mut self) {
        self.tx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_chunks_in_order() {
        let (mut sink, mut rx) = ChannelSink::channel(4);
        sink.write(Bytes::from_static(b"a")).await.unwrap();
        sink.write(Bytes::from_static(b"b")).await.unwrap();
        sink.close().await;
        assert_eq!(rx.recv().await.unwrap(), "a");
        assert_eq!(rx.recv().await.unwrap(), "b");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropped_receiver_fails_writes() {
        let (mut sink, rx) = ChannelSink::channel(1);
        drop(rx);
        assert!(sink.is_closed());
        let err = sink.write(Bytes::from_static(b"x")).await.unwrap_err();
        assert!(err.is_disconnect());
    }

    #[tokio::test]
    async fn write_after_close_fails() {
        let (mut sink, _rx) = ChannelSink::channel(1);
        sink.close().await;
        assert!(sink.write(Bytes::new()).await.is_err());
    }
}
