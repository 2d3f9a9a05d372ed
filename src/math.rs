pub mod number_theory;

pub use number_theory::{
    extended_gcd, is_probable_prime, mod_inverse, mod_pow, MILLER_RABIN_BASES, SMALL_PRIMES,
};
