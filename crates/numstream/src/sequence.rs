use core::iter::FusedIterator;

/// Truncates a (possibly unbounded) lazy sequence to its first `n` elements.
///
/// The inner iterator is pulled at most `n` times: once the limit is reached
/// the element at position `n` is never evaluated. With `n == 0` the source
/// is not touched at all.
///
/// # Example
/// ```
/// use numstream::take;
///
/// let evens = take((0..).step_by(2), 3);
/// assert_eq!(evens.collect::<Vec<_>>(), [0, 2, 4]);
/// ```
pub const fn take<I: Iterator>(inner: I, n: usize) -> Bounded<I> {
    Bounded {
        inner,
        remaining: n,
        pulled: 0,
    }
}

/// Iterator returned by [`take`].
#[derive(Debug, Clone)]
pub struct Bounded<I> {
    inner: I,
    remaining: usize,
    pulled: usize,
}

impl<I> Bounded<I> {
    /// Elements pulled from the inner sequence so far.
    pub const fn pulled(&self) -> usize {
        self.pulled
    }

    /// Elements still allowed before the bound is reached.
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns `true` if no further element will be yielded.
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

impl<I: Iterator> Iterator for Bounded<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.inner.next() {
            Some(item) => {
                self.remaining -= 1;
                self.pulled += 1;
                Some(item)
            }
            None => {
                // Inner sequence ended early; stop asking it.
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining == 0 {
            return (0, Some(0));
        }
        let (lower, upper) = self.inner.size_hint();
        let lower = lower.min(self.remaining);
        let upper = Some(upper.map_or(self.remaining, |u| u.min(self.remaining)));
        (lower, upper)
    }
}

impl<I: Iterator> FusedIterator for Bounded<I> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Infinite sequence that records how many elements were evaluated.
    fn counted<'a>(evaluated: &'a Cell<usize>) -> impl Iterator<Item = usize> + 'a {
        (0..).map(move |i| {
            evaluated.set(evaluated.get() + 1);
            i
        })
    }

    #[test]
    fn yields_exactly_n_in_order() {
        for n in [0, 1, 2, 10, 1_000] {
            let evaluated = Cell::new(0);
            let items: Vec<_> = take(counted(&evaluated), n).collect();
            assert_eq!(items, (0..n).collect::<Vec<_>>());
            assert_eq!(evaluated.get(), n, "element {n} must not be evaluated");
        }
    }

    #[test]
    fn zero_never_touches_the_source() {
        let evaluated = Cell::new(0);
        let mut bounded = take(counted(&evaluated), 0);
        assert!(bounded.is_exhausted());
        assert!(bounded.next().is_none());
        assert!(bounded.next().is_none());
        assert_eq!(evaluated.get(), 0);
    }

    #[test]
    fn stays_exhausted_after_bound() {
        let evaluated = Cell::new(0);
        let mut bounded = take(counted(&evaluated), 2);
        bounded.next();
        bounded.next();
        for _ in 0..5 {
            assert!(bounded.next().is_none());
        }
        assert_eq!(evaluated.get(), 2);
        assert_eq!(bounded.pulled(), 2);
    }

    #[test]
    fn short_source_ends_early() {
        let mut bounded = take(0..3, 10);
        assert_eq!(bounded.size_hint(), (3, Some(3)));
        assert_eq!(bounded.by_ref().count(), 3);
        assert_eq!(bounded.pulled(), 3);
        assert!(bounded.is_exhausted());
    }

    #[test]
    fn size_hint_of_unbounded_source_is_the_bound() {
        let bounded = take(0_u64.., 1_000_000);
        assert_eq!(bounded.size_hint(), (1_000_000, Some(1_000_000)));
    }
}
