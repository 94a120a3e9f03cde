/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in a real clock, a monotonic timer, or
/// a mocked time source in tests.
///
/// The unit is **milliseconds since the Unix epoch** (1970-01-01 UTC).
///
/// # Example
///
/// ```
/// use numstream::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
