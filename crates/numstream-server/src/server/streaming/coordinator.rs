use crate::server::{
    config::EntropyArg,
    service::state::{AppState, InflightGuard},
    telemetry::{
        increment_bytes_sent, increment_records_emitted, increment_session_errors,
        increment_sessions, record_session_duration,
    },
};
use bytes::Bytes;
use core::fmt;
use numstream::{
    ChannelSink, EntropySource, MonotonicClock, OsEntropy, Outcome, RecordGenerator,
    SessionConfig, StreamSession, ThreadEntropy, TokioSleep, take,
};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::Instrument;

/// The streaming endpoints exposed by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The deflate-compressed pretty JSON array download.
    Download,
    /// The paced newline-delimited feed.
    Live,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn entropy_source(kind: EntropyArg) -> Box<dyn EntropySource + Send> {
    match kind {
        EntropyArg::Thread => Box::new(ThreadEntropy),
        EntropyArg::Os => Box::new(OsEntropy),
    }
}

/// Spawns a session for `endpoint` and returns the receiver its chunks
/// arrive on.
///
/// The session owns its generator, encoder and compressor; nothing is shared
/// with other requests. The receiver is the response body: once the client
/// goes away it is dropped, the next write fails, and generation stops.
///
/// `guard` is held until the session task ends, so shutdown can wait for it.
pub fn start_session(
    state: &AppState,
    endpoint: Endpoint,
    guard: InflightGuard,
) -> mpsc::Receiver<Bytes> {
    let config = state.config();
    let (count, session_config): (usize, SessionConfig) = match endpoint {
        Endpoint::Download => (config.record_count, config.download),
        Endpoint::Live => (config.live_record_count, config.live),
    };

    let (sink, rx) = ChannelSink::channel(config.stream_buffer_size);
    let generator = RecordGenerator::new(entropy_source(config.entropy), MonotonicClock::new());
    let records = take(generator, count);

    increment_sessions(endpoint.as_str());
    let start = Instant::now();

    let fut = async move {
        let _guard = guard;
        let session = StreamSession::new(sink, session_config, TokioSleep);

        match session.run(records).await {
            Ok(report) => {
                increment_records_emitted(report.records);
                increment_bytes_sent(report.bytes_written);
                match report.outcome {
                    Outcome::Completed => {
                        tracing::info!(
                            records = report.records,
                            bytes = report.bytes_written,
                            chunks = report.chunks,
                            "Session completed"
                        );
                    }
                    Outcome::Disconnected => {
                        increment_session_errors(endpoint.as_str());
                        tracing::info!(
                            records = report.records,
                            "Session ended early, client disconnected"
                        );
                    }
                }
            }
            Err(e) => {
                // Headers are already out; the client sees a truncated body.
                increment_session_errors(endpoint.as_str());
                tracing::error!("Session aborted: {e}");
            }
        }

        record_session_duration(start.elapsed().as_millis() as f64);
    };

    let span = tracing::info_span!(
        "session",
        endpoint = %endpoint,
        framing = %session_config.framing,
        count
    );
    tokio::spawn(fut.instrument(span));

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::{CliArgs, ServerConfig};
    use clap::Parser;

    fn state(args: &[&str]) -> AppState {
        let mut argv = vec!["numstream-server"];
        argv.extend_from_slice(args);
        let args = CliArgs::try_parse_from(argv).unwrap();
        AppState::new(ServerConfig::try_from(args).unwrap())
    }

    #[tokio::test]
    async fn live_session_emits_one_chunk_per_record() {
        let state = state(&["--live-record-count", "4", "--pace-ms", "0"]);
        let guard = state.begin_session().unwrap();
        let mut rx = start_session(&state, Endpoint::Live, guard);

        let mut chunks = Vec::new();
        while let Some(chunk) = rx.recv().await {
            chunks.push(chunk);
        }

        assert_eq!(chunks.len(), 4);
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(chunk.ends_with(b"\n"));
            let value: serde_json::Value = serde_json::from_slice(chunk).unwrap();
            assert_eq!(value["index"], i as u64);
        }
    }

    #[tokio::test]
    async fn dropping_the_receiver_releases_the_session() {
        let state = state(&["--record-count", "1000000", "--flush-every", "1"]);
        let guard = state.begin_session().unwrap();
        let mut rx = start_session(&state, Endpoint::Download, guard);

        assert!(rx.recv().await.is_some());
        drop(rx);

        assert!(state.drain(core::time::Duration::from_secs(5)).await);
        assert_eq!(state.inflight(), 0);
    }
}
