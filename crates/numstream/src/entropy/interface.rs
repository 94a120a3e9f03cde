use crate::Result;

/// A trait for sources of 128-bit random integers.
///
/// This abstraction allows you to plug in a real entropy source or a mocked
/// source in tests. Each call is expected to be independent and uniformly
/// distributed over `[0, 2^128)`.
///
/// # Example
/// ```
/// use numstream::{EntropySource, Result};
///
/// struct FixedEntropy;
/// impl EntropySource for FixedEntropy {
///     fn try_rand(&mut self) -> Result<u128> {
///         Ok(1234)
///     }
/// }
///
/// let mut source = FixedEntropy;
/// assert_eq!(source.try_rand().unwrap(), 1234);
/// ```
pub trait EntropySource {
    /// Returns a random integer, or [`Error::EntropyUnavailable`] if the
    /// underlying pool cannot supply randomness.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    fn try_rand(&mut self) -> Result<u128>;
}

impl<E: EntropySource + ?Sized> EntropySource for Box<E> {
    fn try_rand(&mut self) -> Result<u128> {
        (**self).try_rand()
    }
}
