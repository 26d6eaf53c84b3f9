use crate::status::Status;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Creates a bounded message stream. The sink side may end the stream with a status.
pub fn channel<T>(buffer: usize) -> (StreamSink<T>, Streaming<T>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (StreamSink { tx }, Streaming { rx })
}

/// Sending half of a message stream.
pub struct StreamSink<T> {
    tx: mpsc::Sender<Result<T, Status>>,
}

impl<T> Clone for StreamSink<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> StreamSink<T> {
    pub async fn send(&self, message: T) -> Result<(), Status> {
        self.tx
            .send(Ok(message))
            .await
            .map_err(|_| Status::internal("cannot send stream message: peer is gone"))
    }

    /// Terminates the stream with `status`. Best effort when the peer is already gone.
    pub async fn fail(self, status: Status) {
        let _ = self.tx.send(Err(status)).await;
    }

    /// Like [`fail`](Self::fail) but never waits for buffer space. Returns whether the
    /// status was queued.
    pub fn try_fail(self, status: Status) -> bool {
        self.tx.try_send(Err(status)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of a message stream.
pub struct Streaming<T> {
    rx: mpsc::Receiver<Result<T, Status>>,
}

impl<T> Streaming<T> {
    /// Next message; `Ok(None)` once the sender has finished.
    pub async fn message(&mut self) -> Result<Option<T>, Status> {
        match self.rx.recv().await {
            Some(Ok(message)) => Ok(Some(message)),
            Some(Err(status)) => Err(status),
            None => Ok(None),
        }
    }

    /// Stream pre-filled with `messages` and already finished.
    pub fn from_iter<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let messages: Vec<T> = messages.into_iter().collect();
        let (tx, rx) = mpsc::channel(messages.len().max(1));
        for message in messages {
            // Capacity matches the message count.
            let _ = tx.try_send(Ok(message));
        }
        Streaming { rx }
    }

    /// Drains the stream, stopping at the first error.
    pub async fn collect(mut self) -> Result<Vec<T>, Status> {
        let mut out = Vec::new();
        while let Some(message) = self.message().await? {
            out.push(message);
        }
        Ok(out)
    }
}

impl<T> Stream for Streaming<T> {
    type Item = Result<T, Status>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
