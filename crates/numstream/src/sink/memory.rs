use crate::{Result, Sink};
use bytes::Bytes;

/// A [`Sink`] that keeps every chunk in memory.
///
/// Handy for benchmarks, offline rendering, and inspecting exactly how a
/// session cut its output.
#[derive(Debug, Default)]
pub struct MemorySink {
    chunks: Vec<Bytes>,
    closes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunks in the order they were written.
    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// How many times [`Sink::close`] was called.
    pub const fn closes(&self) -> usize {
        self.closes
    }

    /// Concatenation of every chunk.
    pub fn concat(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}

impl Sink for MemorySink {
    async fn write(&mut self, chunk: Bytes) -> Result<()> {
        self.chunks.push(chunk);
        Ok(())
    }

    async fn close(&mut self) {
        self.closes += 1;
    }
}
