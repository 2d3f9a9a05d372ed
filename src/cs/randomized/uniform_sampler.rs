//! Uniform sampling of arbitrary-precision integers from a secure byte source.
//!
//! Candidates are assembled big-endian from the minimal number of bytes able
//! to hold the range and rejected when they fall in the biased tail, so every
//! value of `[min, max]` is equally likely.

use log::debug;
use num_bigint_dig::BigUint;
use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};

/// Rejected draws tolerated before the source is considered stuck.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// Rejection sampler over a cryptographically secure random source.
///
/// The source is read afresh for every candidate; no random bytes are cached
/// between calls.
#[derive(Debug)]
pub struct UniformSampler<R> {
    rng: R,
    max_attempts: usize,
}

impl UniformSampler<OsRng> {
    /// Sampler backed by the operating system's CSPRNG.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for UniformSampler<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> UniformSampler<R> {
    pub fn with_rng(rng: R) -> Self {
        UniformSampler {
            rng,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the retry ceiling.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Draws an integer uniformly from the closed interval `[min, max]`.
    ///
    /// A degenerate interval (`max <= min`) yields `min` without touching the
    /// random source.
    ///
    /// # Errors
    /// - [`Error::RandomSource`] if the byte source reports a failure.
    /// - [`Error::RandomSourceExhausted`] if every draw within the retry
    ///   ceiling landed in the rejected tail.
    pub fn sample(&mut self, min: &BigUint, max: &BigUint) -> Result<BigUint> {
        if max <= min {
            return Ok(min.clone());
        }

        let range = max - min + BigUint::one();
        let byte_len = (range.bits() + 7) / 8;
        let span = BigUint::one() << (byte_len * 8);
        // largest multiple of `range` that fits in `span`
        let limit = &span - (&span % &range);

        let mut buf = vec![0u8; byte_len];
        for attempt in 1..=self.max_attempts {
            self.rng
                .try_fill_bytes(&mut buf)
                .map_err(|e| Error::RandomSource(e.to_string()))?;
            let candidate = BigUint::from_bytes_be(&buf);
            if candidate < limit {
                if attempt > 1 {
                    debug!("uniform sample accepted after {} draws", attempt);
                }
                return Ok(min + (candidate % &range));
            }
        }

        Err(Error::RandomSourceExhausted {
            attempts: self.max_attempts,
        })
    }
}

/// Draws an integer uniformly from `[min, max]` using the OS random source.
pub fn uniform(min: &BigUint, max: &BigUint) -> Result<BigUint> {
    UniformSampler::new().sample(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Always yields 0xFF bytes.
    struct StuckRng;

    impl RngCore for StuckRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.iter_mut().for_each(|b| *b = 0xFF);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for StuckRng {}

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {}
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy unavailable",
            )))
        }
    }

    impl CryptoRng for BrokenRng {}

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut sampler = UniformSampler::with_rng(BrokenRng);
        assert_eq!(sampler.sample(&big(7), &big(7)).unwrap(), big(7));
        assert_eq!(sampler.sample(&big(9), &big(3)).unwrap(), big(9));
    }

    #[test]
    fn test_values_stay_in_bounds() {
        let mut sampler = UniformSampler::with_rng(ChaCha20Rng::seed_from_u64(42));
        for &(min, max) in &[(0u64, 1u64), (2, 21), (5, 260), (1000, 70_000), (2, 65535)] {
            for _ in 0..500 {
                let v = sampler.sample(&big(min), &big(max)).unwrap();
                assert!(v >= big(min) && v <= big(max), "{} not in [{}, {}]", v, min, max);
            }
        }
    }

    #[test]
    fn test_every_value_is_reachable() {
        let mut sampler = UniformSampler::with_rng(ChaCha20Rng::seed_from_u64(7));
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let v = sampler.sample(&big(2), &big(6)).unwrap();
            seen[(v.to_u64().unwrap() - 2) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_distribution_is_uniform_chi_square() {
        let mut sampler = UniformSampler::with_rng(ChaCha20Rng::seed_from_u64(2024));
        let buckets = 10usize;
        let trials = 20_000usize;
        let mut counts = vec![0usize; buckets];
        for _ in 0..trials {
            let v = sampler.sample(&big(5), &big(14)).unwrap();
            counts[(v.to_u64().unwrap() - 5) as usize] += 1;
        }

        let expected = trials as f64 / buckets as f64;
        let chi_square: f64 = counts
            .iter()
            .map(|&c| {
                let diff = c as f64 - expected;
                diff * diff / expected
            })
            .sum();
        // 9 degrees of freedom, p = 0.0001
        assert!(chi_square < 33.72, "chi-square {} too large: {:?}", chi_square, counts);
    }

    #[test]
    fn test_stuck_source_is_reported() {
        // range 3 in one byte: 0xFF sits in the rejected tail
        let mut sampler = UniformSampler::with_rng(StuckRng).with_max_attempts(50);
        match sampler.sample(&big(0), &big(2)) {
            Err(Error::RandomSourceExhausted { attempts }) => assert_eq!(attempts, 50),
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_failing_source_is_reported() {
        let mut sampler = UniformSampler::with_rng(BrokenRng);
        assert!(matches!(
            sampler.sample(&big(0), &big(100)),
            Err(Error::RandomSource(_))
        ));
    }

    #[test]
    fn test_os_backed_uniform() {
        let p = big(10_000_019);
        for _ in 0..100 {
            let v = uniform(&big(2), &(&p - big(2))).unwrap();
            assert!(v >= big(2) && v <= &p - big(2));
        }
    }
}
