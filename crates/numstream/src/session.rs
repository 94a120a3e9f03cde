//! Per-request streaming session.
//!
//! A [`StreamSession`] owns everything one response needs: the sink, the
//! encoder, the optional compressor and the current batch. It pulls records
//! one at a time, so memory stays bounded by a single batch no matter how
//! many records are streamed.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle -> Streaming -> Finishing -> Closed
//!   \________\______________\______/  (write failure)
//! ```
//!
//! - **Streaming**: records are encoded into the batch; every `flush_every`
//!   records (counting from the first, so record 0 is delivered on its own)
//!   the batch is handed to the compressor or written directly.
//! - **Finishing**: the document is closed, the remaining batch submitted,
//!   and the compressor finished exactly once.
//! - **Closed**: the sink has been closed. Reached on success and on every
//!   failure path.

use crate::{
    CompressionConfig, Error, Framing, JsonArrayEncoder, Pacer, Record, Result, Sink,
    StreamCompressor,
};
use bytes::Bytes;
use core::{fmt, mem, time::Duration};

/// Records per batch in the compressed array preset.
pub const DEFAULT_FLUSH_EVERY: usize = 2_000;

/// Record count of the compressed array preset.
pub const DEFAULT_RECORD_COUNT: usize = 1_000_000;

/// Record count of the paced line-delimited preset.
pub const DEFAULT_PACED_RECORD_COUNT: usize = 10;

/// Delay between records in the paced line-delimited preset.
pub const DEFAULT_PACE: Duration = Duration::from_millis(500);

/// How a session frames, compresses and paces its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub framing: Framing,
    /// `None` writes encoder output straight to the sink.
    pub compression: Option<CompressionConfig>,
    /// Records per batch. Zero is treated as one.
    pub flush_every: usize,
    /// Delay between emitted batches. Never applied after the last one.
    pub pace: Duration,
}

impl SessionConfig {
    /// Newline-delimited records, uncompressed, one per write, paced.
    pub const fn paced_lines() -> Self {
        Self {
            framing: Framing::LineDelimited,
            compression: None,
            flush_every: 1,
            pace: DEFAULT_PACE,
        }
    }

    /// A single pretty-printed array, deflate-compressed, written in batches.
    pub fn compressed_array() -> Self {
        Self {
            framing: Framing::PrettyArray,
            compression: Some(CompressionConfig::default()),
            flush_every: DEFAULT_FLUSH_EVERY,
            pace: Duration::ZERO,
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Streaming,
    Finishing,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Streaming => write!(f, "streaming"),
            Self::Finishing => write!(f, "finishing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every record was delivered and the document finalized.
    Completed,
    /// The client went away; remaining work was abandoned.
    Disconnected,
}

/// Summary returned by [`StreamSession::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionReport {
    /// Records pulled from the source and encoded.
    pub records: u64,
    /// Bytes accepted by the sink.
    pub bytes_written: u64,
    /// Chunks accepted by the sink.
    pub chunks: u64,
    pub outcome: Outcome,
}

/// A single forward-only streaming response.
#[derive(Debug)]
pub struct StreamSession<S, P> {
    sink: S,
    pacer: P,
    config: SessionConfig,
    state: SessionState,
    encoder: JsonArrayEncoder,
    compressor: Option<StreamCompressor>,
    batch: Vec<u8>,
    records: u64,
    bytes_written: u64,
    chunks: u64,
}

impl<S, P> StreamSession<S, P>
where
    S: Sink + Send,
    P: Pacer + Send + Sync,
{
    pub fn new(sink: S, config: SessionConfig, pacer: P) -> Self {
        Self {
            sink,
            pacer,
            config,
            state: SessionState::Idle,
            encoder: JsonArrayEncoder::new(config.framing),
            compressor: config.compression.map(StreamCompressor::new),
            batch: Vec::new(),
            records: 0,
            bytes_written: 0,
            chunks: 0,
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Streams `records` to the sink and closes it.
    ///
    /// The sink is closed exactly once whatever happens. A failed write is
    /// reported as [`Outcome::Disconnected`]; any other failure is returned
    /// as an error, leaving whatever was already delivered un-finalized.
    pub async fn run<I>(mut self, records: I) -> Result<SessionReport>
    where
        I: Iterator<Item = Result<Record>> + Send,
    {
        let res = self.stream(records).await;

        // Release the compressor before handing the connection back.
        self.compressor = None;
        self.sink.close().await;
        self.state = SessionState::Closed;

        let report = |outcome| SessionReport {
            records: self.records,
            bytes_written: self.bytes_written,
            chunks: self.chunks,
            outcome,
        };

        match res {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    records = self.records,
                    bytes = self.bytes_written,
                    "Stream completed"
                );
                Ok(report(Outcome::Completed))
            }
            Err(_e) if _e.is_disconnect() => {
                #[cfg(feature = "tracing")]
                tracing::debug!(records = self.records, "Client disconnected: {_e}");
                Ok(report(Outcome::Disconnected))
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(records = self.records, "Stream aborted: {e}");
                Err(e)
            }
        }
    }

    async fn stream<I>(&mut self, mut records: I) -> Result<()>
    where
        I: Iterator<Item = Result<Record>> + Send,
    {
        self.state = SessionState::Streaming;
        self.encoder.open(&mut self.batch)?;

        let every = self.config.flush_every.max(1) as u64;
        let mut emitted_batch = false;

        loop {
            if emitted_batch && !self.config.pace.is_zero() {
                // Skip the delay once the source reports that it is done.
                if records.size_hint().1 == Some(0) {
                    break;
                }
                self.pacer.pause(self.config.pace).await;
            }
            emitted_batch = false;

            let Some(record) = records.next() else {
                break;
            };
            let record = record?;
            self.encoder.encode(&record, &mut self.batch)?;
            let position = self.records;
            self.records += 1;

            if position % every == 0 {
                self.emit_batch().await?;
                emitted_batch = true;
            }
        }

        self.state = SessionState::Finishing;
        self.encoder.close(&mut self.batch)?;
        self.emit_batch().await?;

        if let Some(compressor) = self.compressor.take() {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                bytes_in = compressor.bytes_in(),
                bytes_out = compressor.bytes_out(),
                "Finishing compressed stream"
            );
            let tail = compressor.finish()?;
            self.write(tail).await?;
        } else if self.config.compression.is_some() {
            return Err(Error::CompressorMisuse);
        }

        Ok(())
    }

    /// Hands the current batch to the compressor, or straight to the sink.
    async fn emit_batch(&mut self) -> Result<()> {
        let chunk = match (self.config.compression, self.compressor.as_mut()) {
            (Some(_), Some(compressor)) => {
                let chunk = compressor.submit(&self.batch)?;
                self.batch.clear();
                chunk
            }
            (Some(_), None) => return Err(Error::CompressorMisuse),
            (None, _) => Bytes::from(mem::take(&mut self.batch)),
        };
        self.write(chunk).await
    }

    async fn write(&mut self, chunk: Bytes) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        let len = chunk.len() as u64;
        self.sink.write(chunk).await?;
        self.bytes_written += len;
        self.chunks += 1;
        Ok(())
    }
}
