mod interface;
mod mono_clock;

pub use interface::*;
pub use mono_clock::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn clock_starts_at_offset() {
        let clock = MonotonicClock::with_offset(1_700_000_000_000);
        let now = clock.current_millis();
        assert!((1_700_000_000_000..1_700_000_001_000).contains(&now));
    }

    #[test]
    fn clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        for _ in 0..1000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn clock_advances_with_elapsed_time() {
        let clock = MonotonicClock::with_offset(0);
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.current_millis() >= 5);
    }
}
