mod interface;
mod os;
mod thread;

pub use interface::*;
pub use os::*;
pub use thread::*;

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: usize = 64_000;
    const BUCKETS: usize = 16;

    /// Pearson chi-square over the top four bits of each sample.
    fn chi_square<E: EntropySource>(source: &mut E) -> f64 {
        let mut counts = [0_usize; BUCKETS];
        for _ in 0..SAMPLES {
            let n = source.try_rand().unwrap();
            counts[(n >> 124) as usize] += 1;
        }
        let expected = SAMPLES as f64 / BUCKETS as f64;
        counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum()
    }

    #[test]
    fn thread_entropy_has_no_obvious_bias() {
        // 15 degrees of freedom; p = 0.0001 is roughly 44.3.
        let stat = chi_square(&mut ThreadEntropy);
        assert!(stat < 60.0, "chi-square too large: {stat}");
    }

    #[test]
    fn os_entropy_has_no_obvious_bias() {
        let stat = chi_square(&mut OsEntropy);
        assert!(stat < 60.0, "chi-square too large: {stat}");
    }

    #[test]
    fn sources_reach_the_upper_half_of_the_range() {
        let mut source = ThreadEntropy;
        let high = (0..256)
            .map(|_| source.try_rand().unwrap())
            .any(|n| n > u128::MAX / 2);
        assert!(high);
    }

    #[test]
    fn successive_draws_differ() {
        let mut source = OsEntropy;
        let a = source.try_rand().unwrap();
        let b = source.try_rand().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn boxed_source_delegates() {
        let mut source: Box<dyn EntropySource + Send> = Box::new(ThreadEntropy);
        source.try_rand().unwrap();
    }
}
