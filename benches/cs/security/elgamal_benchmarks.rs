use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use elgamal_toolkit::cs::security::elgamal::{
    decrypt, text_to_symbols, DomainParameters, ElGamalCipher,
};
use num_bigint_dig::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("elgamal_text");
    let params = DomainParameters::with_default_generator(BigUint::from(1_000_003u32)).unwrap();
    let mut cipher = ElGamalCipher::with_rng(ChaCha20Rng::seed_from_u64(42));
    let keys = cipher.generate_keypair(&params).unwrap();

    for &len in &[16usize, 256, 4096] {
        let text: String = "Привіт, світ! ".chars().cycle().take(len).collect();
        let symbols = text_to_symbols(&text);

        group.bench_with_input(BenchmarkId::new("encrypt", len), &symbols, |b, symbols| {
            b.iter(|| {
                cipher
                    .encrypt(
                        &params.p,
                        &params.g,
                        Some(keys.public_key()),
                        None,
                        black_box(symbols),
                    )
                    .unwrap()
            })
        });

        let ciphertext = cipher
            .encrypt(&params.p, &params.g, Some(keys.public_key()), None, &symbols)
            .unwrap();
        group.bench_with_input(BenchmarkId::new("decrypt", len), &ciphertext, |b, ct| {
            b.iter(|| decrypt(&params.p, keys.private_key(), black_box(ct)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_round_trip);
criterion_main!(benches);
