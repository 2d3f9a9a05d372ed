use num_bigint_dig::{BigInt, BigUint, Sign, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Extended Euclidean Algorithm in BigInts.
/// Returns `(g, x, y)` such that `a*x + b*y = g = gcd(a, b)`, with `g >= 0`.
///
/// Runs as an explicit loop over co-factor accumulators, so operand size never
/// turns into recursion depth.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let mut old_r = a.clone();
    let mut r = b.clone();
    let mut old_x = BigInt::one();
    let mut x = BigInt::zero();
    let mut old_y = BigInt::zero();
    let mut y = BigInt::one();

    while !r.is_zero() {
        let (q, rem) = old_r.div_rem(&r);
        old_r = std::mem::replace(&mut r, rem);

        let next_x = &old_x - &q * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &q * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    // truncated division leaves the sign of the inputs on the gcd
    if old_r.sign() == Sign::Minus {
        (-old_r, -old_x, -old_y)
    } else {
        (old_r, old_x, old_y)
    }
}

/// Finds the modular inverse of `a` modulo `m`.
///
/// Returns `Some(inv)` with `inv` in `[0, m)` and `(a * inv) mod m == 1`, or
/// `None` when `gcd(a, m) != 1` (including `m == 0`).
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    let a_int = a.to_bigint()?;
    let m_int = m.to_bigint()?;
    let (g, x, _) = extended_gcd(&a_int, &m_int);
    if !g.is_one() {
        return None;
    }

    let mut result = x % &m_int;
    if result.sign() == Sign::Minus {
        result += &m_int;
    }
    result.to_biguint()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> BigInt {
        BigInt::from(n)
    }

    fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
        while b != 0 {
            let t = a % b;
            a = b;
            b = t;
        }
        a
    }

    #[test]
    fn test_bezout_identity_holds() {
        for a in 0..60i64 {
            for b in 0..60i64 {
                let (g, x, y) = extended_gcd(&int(a), &int(b));
                assert_eq!(&int(a) * &x + &int(b) * &y, g, "a={} b={}", a, b);
                assert_eq!(g, int(gcd_u64(a as u64, b as u64) as i64), "a={} b={}", a, b);
            }
        }
    }

    #[test]
    fn test_base_case() {
        let (g, x, y) = extended_gcd(&int(17), &int(0));
        assert_eq!((g, x, y), (int(17), int(1), int(0)));
    }

    #[test]
    fn test_negative_operands_give_non_negative_gcd() {
        for &(a, b) in &[(-12i64, 18i64), (12, -18), (-7, -21), (-5, 0)] {
            let (g, x, y) = extended_gcd(&int(a), &int(b));
            assert!(g.sign() != Sign::Minus);
            assert_eq!(&int(a) * &x + &int(b) * &y, g);
        }
    }

    #[test]
    fn test_large_operands() {
        let a = BigInt::parse_bytes(b"340282366920938463463374607431768211457", 10).unwrap();
        let b = BigInt::parse_bytes(b"18446744073709551629", 10).unwrap();
        let (g, x, y) = extended_gcd(&a, &b);
        assert_eq!(&a * &x + &b * &y, g);
    }

    #[test]
    fn test_known_inverses() {
        assert_eq!(
            mod_inverse(&BigUint::from(3u32), &BigUint::from(11u32)),
            Some(BigUint::from(4u32))
        );
        assert_eq!(
            mod_inverse(&BigUint::from(6u32), &BigUint::from(23u32)),
            Some(BigUint::from(4u32))
        );
        assert_eq!(mod_inverse(&BigUint::from(4u32), &BigUint::from(8u32)), None);
    }

    #[test]
    fn test_inverse_property_for_coprime_pairs() {
        for m in 2..80u32 {
            for a in 0..(2 * m) {
                let inv = mod_inverse(&BigUint::from(a), &BigUint::from(m));
                if gcd_u64(a as u64, m as u64) == 1 {
                    let inv = inv.expect("coprime pair must have an inverse");
                    assert!(inv < BigUint::from(m));
                    assert_eq!(
                        (BigUint::from(a) * inv) % BigUint::from(m),
                        BigUint::one() % BigUint::from(m)
                    );
                } else {
                    assert!(inv.is_none(), "a={} m={} share a factor", a, m);
                }
            }
        }
    }

    #[test]
    fn test_zero_modulus_has_no_inverse() {
        assert_eq!(mod_inverse(&BigUint::from(1u32), &BigUint::zero()), None);
    }
}
