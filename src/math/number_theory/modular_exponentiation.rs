use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Computes `base^exponent mod modulus` by right-to-left square-and-multiply.
///
/// The base is reduced modulo `modulus` before the loop so intermediate
/// products stay below `modulus^2`. A modulus of one always yields zero.
///
/// # Panics
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_zero() {
        panic!("mod_pow with modulus=0");
    }

    let mut result = BigUint::one() % modulus;
    let mut base = base % modulus;
    let mut exponent = exponent.clone();

    while !exponent.is_zero() {
        if exponent.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exponent = exponent >> 1usize;
    }

    result
}
