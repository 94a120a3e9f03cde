use crate::Pacer;
use core::time::Duration;

/// An implementation of [`Pacer`] using Tokio's timer.
///
/// This is the default pacer for use in async applications built on Tokio.
#[derive(Default, Clone, Copy, Debug)]
pub struct TokioSleep;

impl Pacer for TokioSleep {
    async fn pause(&self, dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleeps_for_the_requested_duration() {
        let start = tokio::time::Instant::now();
        TokioSleep.pause(Duration::from_millis(500)).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
