use core::time::Duration;

/// A trait that abstracts over how a session waits between emitted batches.
///
/// This allows the session to be generic over async runtimes, and lets tests
/// skip real delays entirely.
pub trait Pacer {
    /// Waits for `dur`. The future is `Send` so the session can move across
    /// worker threads while paused.
    fn pause(&self, dur: Duration) -> impl Future<Output = ()> + Send;
}

/// A [`Pacer`] that never waits.
#[derive(Default, Clone, Copy, Debug)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&self, _dur: Duration) -> impl Future<Output = ()> + Send {
        core::future::ready(())
    }
}
