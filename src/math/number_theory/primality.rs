//! Miller–Rabin probable-prime test with a fixed witness set.
//!
//! The bases `{2, 3, 5, 7, 11}` make the test exact for every `n` below
//! 2,152,302,898,747. Above that bound it is probabilistic and offers no
//! guarantee against composites crafted to fool these particular bases, which
//! is acceptable for operator-chosen moduli but not for adversarial input.

use log::trace;
use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use super::mod_pow;

/// Small primes checked by equality and trial division before Miller–Rabin.
pub const SMALL_PRIMES: [u32; 9] = [2, 3, 5, 7, 11, 13, 17, 19, 23];

/// Witness bases used by the Miller–Rabin rounds.
pub const MILLER_RABIN_BASES: [u32; 5] = [2, 3, 5, 7, 11];

/// Returns `true` if `n` is (probably) prime.
///
/// Deterministic for a given `n`: values below 2 are rejected, small primes
/// are matched exactly, multiples of small primes are rejected, and the rest
/// must pass a Miller–Rabin round for every base in [`MILLER_RABIN_BASES`].
pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        if *n == BigUint::from(p) {
            return true;
        }
    }
    for &p in SMALL_PRIMES.iter() {
        if (n % BigUint::from(p)).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one = n - BigUint::one();
    let mut d = n_minus_one.clone();
    let mut s = 0usize;
    while d.is_even() {
        d = d >> 1usize;
        s += 1;
    }

    let n_minus_two = n - &two;
    for &base in MILLER_RABIN_BASES.iter() {
        let a = BigUint::from(base);
        if a >= n_minus_two {
            continue;
        }
        if !passes_round(&a, &d, s, n, &n_minus_one) {
            trace!("base {} witnesses that {} is composite", base, n);
            return false;
        }
    }

    true
}

/// One Miller–Rabin round: `a^d` must be `1` or `n-1`, or reach `n-1` within
/// `s-1` further squarings.
fn passes_round(a: &BigUint, d: &BigUint, s: usize, n: &BigUint, n_minus_one: &BigUint) -> bool {
    let mut x = mod_pow(a, d, n);
    if x.is_one() || x == *n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = (&x * &x) % n;
        if x == *n_minus_one {
            return true;
        }
    }
    false
}
