use crate::{EntropySource, Error, Result};
use rand::{TryRngCore, rngs::OsRng};

/// An [`EntropySource`] that reads every number straight from the operating
/// system's entropy pool.
///
/// Slower than [`ThreadEntropy`](crate::ThreadEntropy), but it is the one
/// source that reports pool failures instead of masking them.
#[derive(Default, Clone, Copy, Debug)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn try_rand(&mut self) -> Result<u128> {
        let mut bytes = [0_u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| Error::EntropyUnavailable {
                context: e.to_string(),
            })?;
        Ok(u128::from_le_bytes(bytes))
    }
}
