use crate::Result;
use bytes::Bytes;

/// Destination for the bytes of a single streamed response.
///
/// Implementations push every chunk to the client as soon as it is written,
/// with no buffering beyond what the transport itself needs. A failed write
/// means the client is gone; callers stop producing and do not retry.
///
/// [`close`](Sink::close) is invoked exactly once per session, after the
/// final chunk or on the way out of a failed session.
///
/// Both futures are `Send` so a session can run on a multi-threaded runtime.
pub trait Sink {
    /// Pushes `chunk` to the connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportWriteFailure`] if the connection can no
    /// longer accept data.
    ///
    /// [`Error::TransportWriteFailure`]: crate::Error::TransportWriteFailure
    fn write(&mut self, chunk: Bytes) -> impl Future<Output = Result<()>> + Send;

    /// Signals the end of the response. Best-effort; never fails.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

impl<S: Sink + Send> Sink for &mut S {
    fn write(&mut self, chunk: Bytes) -> impl Future<Output = Result<()>> + Send {
        (**self).write(chunk)
    }

    fn close(&mut self) -> impl Future<Output = ()> + Send {
        (**self).close()
    }
}
