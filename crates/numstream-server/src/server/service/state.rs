use crate::server::{
    config::ServerConfig,
    telemetry::{decrement_sessions_inflight, increment_sessions_inflight},
};
use core::time::Duration;
use portable_atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

/// Shared state handed to every request handler.
///
/// Sessions themselves share nothing; this only tracks whether the service
/// still accepts work and how many sessions are running.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    shutdown_token: CancellationToken,
    inflight: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown_token: CancellationToken::new(),
            inflight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Number of sessions currently streaming.
    pub fn inflight(&self) -> usize {
        self.inflight.load(Ordering::Acquire)
    }

    /// Registers a new session, or returns `None` once shutdown has begun.
    pub fn begin_session(&self) -> Option<InflightGuard> {
        if self.is_shutting_down() {
            return None;
        }
        self.inflight.fetch_add(1, Ordering::AcqRel);
        increment_sessions_inflight();
        Some(InflightGuard {
            inflight: Arc::clone(&self.inflight),
        })
    }

    /// Waits up to `limit` for in-flight sessions to finish. Returns `true`
    /// if every session completed in time.
    pub async fn drain(&self, limit: Duration) -> bool {
        tracing::info!("Draining in-flight streams ({} active)", self.inflight());
        let drained = timeout(limit, async {
            while self.inflight() > 0 {
                sleep(Duration::from_millis(100)).await;
            }
        })
        .await;

        match drained {
            Ok(()) => {
                tracing::debug!("All in-flight streams drained successfully");
                true
            }
            Err(_) => {
                tracing::warn!(
                    "Graceful drain timed out ({} streams still active)",
                    self.inflight()
                );
                false
            }
        }
    }
}

/// Keeps a session counted as in flight until dropped.
pub struct InflightGuard {
    inflight: Arc<AtomicUsize>,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.inflight.fetch_sub(1, Ordering::AcqRel);
        decrement_sessions_inflight();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::CliArgs;
    use clap::Parser;

    fn state() -> AppState {
        let args = CliArgs::try_parse_from(["numstream-server"]).unwrap();
        AppState::new(ServerConfig::try_from(args).unwrap())
    }

    #[test]
    fn guard_tracks_inflight_sessions() {
        let state = state();
        let a = state.begin_session().unwrap();
        let b = state.begin_session().unwrap();
        assert_eq!(state.inflight(), 2);
        drop(a);
        assert_eq!(state.inflight(), 1);
        drop(b);
        assert_eq!(state.inflight(), 0);
    }

    #[test]
    fn refuses_sessions_after_shutdown() {
        let state = state();
        state.shutdown_token().cancel();
        assert!(state.begin_session().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn drain_times_out_with_active_sessions() {
        let state = state();
        let _guard = state.begin_session().unwrap();
        assert!(!state.drain(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn drain_returns_immediately_when_idle() {
        assert!(state().drain(Duration::from_secs(1)).await);
    }
}
