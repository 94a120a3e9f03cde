//! # numstream
//!
//! Streams an unbounded, lazily generated sequence of timestamped random
//! numbers as incrementally encoded JSON, optionally deflate-compressed,
//! without ever buffering the whole payload.
//!
//! The pipeline is a single forward pass:
//!
//! ```text
//! EntropySource -> RecordGenerator -> take(n) -> JsonArrayEncoder
//!     -> [StreamCompressor] -> Sink
//! ```
//!
//! [`StreamSession`] drives it, pulling one record at a time and handing
//! output to the [`Sink`] in fixed-size batches, so memory stays bounded by
//! one batch regardless of how many records are streamed.
//!
//! ## Example
//!
//! ```
//! use numstream::{
//!     MemorySink, MonotonicClock, NoPause, RecordGenerator, SessionConfig, StreamSession,
//!     ThreadEntropy, take,
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let records = take(RecordGenerator::new(ThreadEntropy, MonotonicClock::new()), 3);
//! let mut sink = MemorySink::new();
//! let config = SessionConfig {
//!     compression: None,
//!     ..SessionConfig::compressed_array()
//! };
//! let report = StreamSession::new(&mut sink, config, NoPause)
//!     .run(records)
//!     .await
//!     .unwrap();
//!
//! assert_eq!(report.records, 3);
//! let doc: serde_json::Value = serde_json::from_slice(&sink.concat()).unwrap();
//! assert_eq!(doc.as_array().unwrap().len(), 3);
//! # });
//! ```

mod compress;
mod encoder;
mod entropy;
mod error;
mod pacer;
mod record;
mod sequence;
mod session;
mod sink;
mod time;

pub use crate::compress::*;
pub use crate::encoder::*;
pub use crate::entropy::*;
pub use crate::error::*;
pub use crate::pacer::*;
pub use crate::record::*;
pub use crate::sequence::*;
pub use crate::session::*;
pub use crate::sink::*;
pub use crate::time::*;
