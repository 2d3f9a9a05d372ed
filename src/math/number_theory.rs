//! Arbitrary-precision number theory used by the public-key schemes.
//!
//! - Modular exponentiation (square-and-multiply)
//! - Extended Euclidean algorithm and modular inverse
//! - Miller–Rabin probable-prime test

pub mod extended_euclid;
pub mod modular_exponentiation;
pub mod primality;

pub use extended_euclid::{extended_gcd, mod_inverse};
pub use modular_exponentiation::mod_pow;
pub use primality::{is_probable_prime, MILLER_RABIN_BASES, SMALL_PRIMES};
