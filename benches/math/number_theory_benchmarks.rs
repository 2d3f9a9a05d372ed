use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use elgamal_toolkit::math::{is_probable_prime, mod_inverse, mod_pow};
use num_bigint_dig::BigUint;

fn mersenne_127() -> BigUint {
    BigUint::parse_bytes(b"170141183460469231731687303715884105727", 10).unwrap()
}

fn bench_mod_pow(c: &mut Criterion) {
    let mut group = c.benchmark_group("mod_pow");
    let modulus = mersenne_127();
    let base = BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap();

    for &bits in &[16usize, 64, 126] {
        let exponent = (BigUint::from(1u32) << bits) - BigUint::from(1u32);
        group.bench_with_input(BenchmarkId::new("exponent_bits", bits), &exponent, |b, e| {
            b.iter(|| mod_pow(black_box(&base), black_box(e), black_box(&modulus)))
        });
    }

    group.finish();
}

fn bench_primality(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_probable_prime");
    let cases = [
        ("65537", BigUint::from(65537u32)),
        ("10000019", BigUint::from(10_000_019u32)),
        ("carmichael_825265", BigUint::from(825_265u32)),
        ("mersenne_127", mersenne_127()),
    ];

    for (name, n) in cases.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), n, |b, n| {
            b.iter(|| is_probable_prime(black_box(n)))
        });
    }

    group.finish();
}

fn bench_mod_inverse(c: &mut Criterion) {
    let modulus = mersenne_127();
    let a = BigUint::parse_bytes(b"98765432109876543210987654321", 10).unwrap();
    c.bench_function("mod_inverse_127_bit", |b| {
        b.iter(|| mod_inverse(black_box(&a), black_box(&modulus)))
    });
}

criterion_group!(benches, bench_mod_pow, bench_primality, bench_mod_inverse);
criterion_main!(benches);
