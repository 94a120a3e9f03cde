use crate::{EntropySource, Record, Result, TimeSource};
use core::iter::FusedIterator;

/// An unbounded, lazy sequence of [`Record`]s.
///
/// Each call to [`Iterator::next`] pulls exactly one number from the entropy
/// source and stamps it with the current time, so timestamps reflect the
/// moment each record is materialized rather than when the generator was
/// built. Timestamps never decrease across successive records, even if the
/// underlying [`TimeSource`] steps backwards.
///
/// The sequence never ends on its own: `next` always returns `Some`. Bound it
/// with [`take`](crate::take).
///
/// Once the entropy source fails, the error is yielded once and the generator
/// is exhausted.
#[derive(Debug)]
pub struct RecordGenerator<E, T> {
    entropy: E,
    clock: T,
    next_index: u64,
    last_millis: u64,
    failed: bool,
}

impl<E, T> RecordGenerator<E, T>
where
    E: EntropySource,
    T: TimeSource,
{
    pub const fn new(entropy: E, clock: T) -> Self {
        Self {
            entropy,
            clock,
            next_index: 0,
            last_millis: 0,
            failed: false,
        }
    }

    /// Number of records materialized so far.
    pub const fn generated(&self) -> u64 {
        self.next_index
    }

    /// Materializes the next record.
    pub fn next_record(&mut self) -> Result<Record> {
        let number = self.entropy.try_rand()?;
        let time = self.clock.current_millis().max(self.last_millis);
        let record = Record {
            index: self.next_index,
            time,
            number,
        };
        self.last_millis = time;
        self.next_index += 1;
        Ok(record)
    }
}

impl<E, T> Iterator for RecordGenerator<E, T>
where
    E: EntropySource,
    T: TimeSource,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_record();
        self.failed = item.is_err();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (usize::MAX, None)
        }
    }
}

impl<E, T> FusedIterator for RecordGenerator<E, T>
where
    E: EntropySource,
    T: TimeSource,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::Cell;

    struct CountingEntropy {
        next: u128,
    }

    impl EntropySource for CountingEntropy {
        fn try_rand(&mut self) -> Result<u128> {
            self.next += 1;
            Ok(self.next)
        }
    }

    struct FailingEntropy {
        remaining: usize,
    }

    impl EntropySource for FailingEntropy {
        fn try_rand(&mut self) -> Result<u128> {
            if self.remaining == 0 {
                return Err(Error::EntropyUnavailable {
                    context: "pool drained".to_string(),
                });
            }
            self.remaining -= 1;
            Ok(0)
        }
    }

    struct MockStepTime {
        values: Vec<u64>,
        index: Cell<usize>,
    }

    impl TimeSource for MockStepTime {
        fn current_millis(&self) -> u64 {
            let i = self.index.get();
            self.index.set(i + 1);
            self.values[i.min(self.values.len() - 1)]
        }
    }

    #[test]
    fn indices_are_zero_based_and_contiguous() {
        let generator = RecordGenerator::new(CountingEntropy { next: 0 }, MockStepTime {
            values: vec![42],
            index: Cell::new(0),
        });
        let records: Vec<_> = generator.take(5).map(Result::unwrap).collect();
        let indices: Vec<_> = records.iter().map(|r| r.index).collect();
        let numbers: Vec<_> = records.iter().map(|r| r.number).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
        assert_eq!(numbers, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn time_is_captured_per_record() {
        let clock = MockStepTime {
            values: vec![10, 11, 11, 15],
            index: Cell::new(0),
        };
        let mut generator = RecordGenerator::new(CountingEntropy { next: 0 }, &clock);
        // Nothing is read from the clock until a record is pulled.
        assert_eq!(clock.index.get(), 0);
        let times: Vec<_> = (0..4).map(|_| generator.next_record().unwrap().time).collect();
        assert_eq!(times, [10, 11, 11, 15]);
    }

    #[test]
    fn time_never_decreases() {
        let clock = MockStepTime {
            values: vec![100, 90, 120, 110],
            index: Cell::new(0),
        };
        let generator = RecordGenerator::new(CountingEntropy { next: 0 }, clock);
        let times: Vec<_> = generator.take(4).map(|r| r.unwrap().time).collect();
        assert_eq!(times, [100, 100, 120, 120]);
    }

    #[test]
    fn entropy_failure_is_yielded_once_then_fused() {
        let mut generator = RecordGenerator::new(
            FailingEntropy { remaining: 2 },
            MockStepTime {
                values: vec![0],
                index: Cell::new(0),
            },
        );
        assert!(generator.next().unwrap().is_ok());
        assert!(generator.next().unwrap().is_ok());
        assert!(matches!(
            generator.next(),
            Some(Err(Error::EntropyUnavailable { .. }))
        ));
        assert!(generator.next().is_none());
        assert_eq!(generator.generated(), 2);
    }
}
