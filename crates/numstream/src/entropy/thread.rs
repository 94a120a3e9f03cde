use crate::{EntropySource, Result};
use rand::{Rng, rng};

/// An [`EntropySource`] that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, cryptographically secure (ChaCha-based), and automatically
/// reseeded periodically from the operating system.
///
/// This type does **not** store the RNG itself; it accesses the thread-local
/// generator on each call, so it stays `Send` and can move with a session
/// task across worker threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadEntropy;

impl EntropySource for ThreadEntropy {
    fn try_rand(&mut self) -> Result<u128> {
        Ok(rng().random())
    }
}
