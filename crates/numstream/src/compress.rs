//! Stateful streaming deflate compression.
//!
//! A [`StreamCompressor`] accepts plain text in arbitrary slices via
//! [`submit`](StreamCompressor::submit) and hands back whatever compressed
//! bytes the encoder has ready, which may be none. The stream only becomes
//! decodable to EOF after [`finish`](StreamCompressor::finish), which consumes
//! the compressor: no data can be submitted once the end-of-stream marker has
//! been written.

use crate::Result;
use bytes::Bytes;
use core::{fmt, mem};
use flate2::{
    Compression,
    write::{DeflateEncoder, ZlibEncoder},
};
use std::io::Write;

/// Container format of the compressed stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeflateFormat {
    /// RFC 1950 zlib wrapper. This is what HTTP `Content-Encoding: deflate`
    /// denotes.
    #[default]
    Zlib,
    /// Bare RFC 1951 deflate blocks.
    Raw,
}

impl fmt::Display for DeflateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zlib => write!(f, "zlib"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// What the compressor does at the end of every submitted batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Let the encoder buffer freely; output appears as blocks fill.
    #[default]
    None,
    /// Sync-flush after each batch so everything submitted so far is
    /// decodable immediately, at some cost in ratio.
    Sync,
}

/// Tunables for a [`StreamCompressor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressionConfig {
    pub format: DeflateFormat,
    /// 0 (store) through 9 (best).
    pub level: u32,
    pub flush: FlushPolicy,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            format: DeflateFormat::Zlib,
            level: 6,
            flush: FlushPolicy::None,
        }
    }
}

enum Encoder {
    Zlib(ZlibEncoder<Vec<u8>>),
    Raw(DeflateEncoder<Vec<u8>>),
}

impl Encoder {
    fn write_all(&mut self, data: &[u8]) -> std::io::Result<()> {
        match self {
            Self::Zlib(e) => e.write_all(data),
            Self::Raw(e) => e.write_all(data),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Zlib(e) => e.flush(),
            Self::Raw(e) => e.flush(),
        }
    }

    fn output(&mut self) -> &mut Vec<u8> {
        match self {
            Self::Zlib(e) => e.get_mut(),
            Self::Raw(e) => e.get_mut(),
        }
    }

    fn finish(self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Zlib(e) => e.finish(),
            Self::Raw(e) => e.finish(),
        }
    }
}

/// Running deflate encoder owned by a single stream session.
pub struct StreamCompressor {
    encoder: Encoder,
    flush: FlushPolicy,
    bytes_in: u64,
    bytes_out: u64,
}

impl fmt::Debug for StreamCompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamCompressor")
            .field("flush", &self.flush)
            .field("bytes_in", &self.bytes_in)
            .field("bytes_out", &self.bytes_out)
            .finish_non_exhaustive()
    }
}

impl StreamCompressor {
    pub fn new(config: CompressionConfig) -> Self {
        let level = Compression::new(config.level.min(9));
        let encoder = match config.format {
            DeflateFormat::Zlib => Encoder::Zlib(ZlibEncoder::new(Vec::new(), level)),
            DeflateFormat::Raw => Encoder::Raw(DeflateEncoder::new(Vec::new(), level)),
        };
        Self {
            encoder,
            flush: config.flush,
            bytes_in: 0,
            bytes_out: 0,
        }
    }

    /// Plain bytes submitted so far.
    pub const fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Compressed bytes handed back so far.
    pub const fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    /// Feeds `data` to the encoder and returns the compressed bytes produced
    /// so far. The result is frequently empty while the encoder buffers.
    pub fn submit(&mut self, data: &[u8]) -> Result<Bytes> {
        self.encoder.write_all(data)?;
        if self.flush == FlushPolicy::Sync {
            self.encoder.flush()?;
        }
        self.bytes_in += data.len() as u64;
        Ok(self.drain())
    }

    /// Flushes all buffered state and appends the end-of-stream marker.
    pub fn finish(mut self) -> Result<Bytes> {
        let already = self.drain();
        let tail = self.encoder.finish()?;
        if already.is_empty() {
            return Ok(Bytes::from(tail));
        }
        let mut out = Vec::with_capacity(already.len() + tail.len());
        out.extend_from_slice(&already);
        out.extend_from_slice(&tail);
        Ok(Bytes::from(out))
    }

    fn drain(&mut self) -> Bytes {
        let out = mem::take(self.encoder.output());
        self.bytes_out += out.len() as u64;
        Bytes::from(out)
    }
}
