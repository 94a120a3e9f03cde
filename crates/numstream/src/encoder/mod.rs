//! Incremental JSON encoding of record sequences.
//!
//! [`JsonArrayEncoder`] turns records into text fragments one at a time.
//! Concatenating every fragment it emits, in order, yields one complete
//! document regardless of how the caller batches the output.
//!
//! ## Framings
//!
//! - [`Framing::LineDelimited`]: one compact JSON object per line, no
//!   enclosing array.
//! - [`Framing::PrettyArray`]: a single pretty-printed array:
//!
//! ```text
//! [
//!   {
//!     "index": 0,
//!     "time": "2025-01-01T00:00:00.000Z",
//!     "number": 1
//!   },
//!   {
//!     ...
//!   }
//! ]
//! ```
//!
//! An empty pretty array is written as `[\n\n]\n`.

mod formatter;

pub use formatter::*;

use crate::{Error, Record, Result};
use core::fmt;
use serde::Serialize;

const ARRAY_OPEN: &[u8] = b"[\n";
const FIRST_PREFIX: &[u8] = b"  ";
const SEPARATOR: &[u8] = b",\n  ";
const ARRAY_CLOSE: &[u8] = b"\n]\n";

/// Document shape produced by a [`JsonArrayEncoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Framing {
    /// Newline-delimited JSON objects.
    LineDelimited,
    /// One pretty-printed JSON array.
    PrettyArray,
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineDelimited => write!(f, "ndjson"),
            Self::PrettyArray => write!(f, "pretty-array"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    /// Nothing written yet.
    Start,
    /// Opening written; records may follow.
    Body,
    /// Closing written; the document is complete.
    Done,
}

/// Session-scoped incremental encoder.
///
/// Separator placement depends only on how many records were encoded over
/// the encoder's whole lifetime, never on where the caller cut batches.
#[derive(Debug)]
pub struct JsonArrayEncoder {
    framing: Framing,
    position: Position,
    encoded: u64,
}

impl JsonArrayEncoder {
    pub const fn new(framing: Framing) -> Self {
        Self {
            framing,
            position: Position::Start,
            encoded: 0,
        }
    }

    pub const fn framing(&self) -> Framing {
        self.framing
    }

    /// Number of records encoded so far.
    pub const fn encoded(&self) -> u64 {
        self.encoded
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.position == Position::Done
    }

    /// Appends the document opening to `out`, if not already written.
    pub fn open(&mut self, out: &mut Vec<u8>) -> Result<()> {
        match self.position {
            Position::Start => {
                if self.framing == Framing::PrettyArray {
                    out.extend_from_slice(ARRAY_OPEN);
                }
                self.position = Position::Body;
                Ok(())
            }
            Position::Body => Ok(()),
            Position::Done => Err(Error::CompressorMisuse),
        }
    }

    /// Appends one record, including any separator it needs, to `out`.
    ///
    /// On failure `out` is left exactly as it was before the call.
    pub fn encode(&mut self, record: &Record, out: &mut Vec<u8>) -> Result<()> {
        let mark = out.len();
        let was_start = self.position == Position::Start;
        self.open(out)?;
        let res = match self.framing {
            Framing::LineDelimited => {
                let res = serde_json::to_writer(&mut *out, record);
                if res.is_ok() {
                    out.push(b'\n');
                }
                res
            }
            Framing::PrettyArray => {
                out.extend_from_slice(if self.encoded == 0 {
                    FIRST_PREFIX
                } else {
                    SEPARATOR
                });
                let mut ser = serde_json::Serializer::with_formatter(
                    &mut *out,
                    NestedPrettyFormatter::at_depth(1),
                );
                record.serialize(&mut ser)
            }
        };

        match res {
            Ok(()) => {
                self.encoded += 1;
                Ok(())
            }
            Err(e) => {
                out.truncate(mark);
                if was_start {
                    // The opening was truncated away with the record.
                    self.position = Position::Start;
                }
                Err(Error::UnencodableValue(e))
            }
        }
    }

    /// Appends the document closing to `out`. Only the first call writes
    /// anything.
    pub fn close(&mut self, out: &mut Vec<u8>) -> Result<()> {
        if self.position == Position::Done {
            return Ok(());
        }
        self.open(out)?;
        if self.framing == Framing::PrettyArray {
            out.extend_from_slice(ARRAY_CLOSE);
        }
        self.position = Position::Done;
        Ok(())
    }
}
