//! DISCLAIMER: This module is a toy example of ElGamal encryption over the
//! multiplicative group modulo a prime, applied symbol by symbol to text.
//! It is *EXCLUSIVELY* for demonstration and educational purposes: arithmetic is
//! not constant-time, the generator's order is never checked, and one ephemeral
//! scalar is shared by every symbol of a message.
//!
//! If you need ElGamal or any cryptographic operations in production, please use a
//! vetted, well-reviewed cryptography library.
//!
//! Each character's Unicode scalar value `m < p` becomes a pair
//! `(a, b) = (g^k mod p, m * y^k mod p)`; decryption recovers
//! `m = b * (a^x)^-1 mod p`.

pub mod ciphertext;
pub mod session;

pub use ciphertext::{parse_biguint, Ciphertext, CiphertextPair};
pub use session::{ElGamalSession, SessionState};

use log::{debug, warn};
use num_bigint_dig::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::cs::randomized::UniformSampler;
use crate::error::{Error, Result};
use crate::math::number_theory::{is_probable_prime, mod_inverse, mod_pow};

/// Moduli offered for a text, smallest first. All are prime and every Unicode
/// scalar value is below the last one.
pub const SUGGESTED_MODULI: [u64; 5] = [65537, 131071, 262139, 1000003, 10000019];

/// Distance above the largest symbol where the fallback prime search starts.
pub const FALLBACK_SEARCH_OFFSET: u64 = 101;

/// Generator candidates, tried in order.
pub const GENERATOR_CANDIDATES: [u32; 5] = [2, 3, 5, 7, 11];

/// Domain parameters: a prime modulus `p` and a generator `g` in `[2, p-2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParameters {
    pub p: BigUint,
    pub g: BigUint,
}

impl DomainParameters {
    /// Validates and wraps `(p, g)`.
    pub fn new(p: BigUint, g: BigUint) -> Result<Self> {
        validate_parameters(&p, &g)?;
        Ok(DomainParameters { p, g })
    }

    /// Builds parameters for prime `p` with the generator from [`select_generator`].
    pub fn with_default_generator(p: BigUint) -> Result<Self> {
        let g = select_generator(&p);
        Self::new(p, g)
    }
}

/// Private scalar `x` and the public value `y = g^x mod p` derived from it.
///
/// `y` cannot be set on its own; a new `x` always means a new pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    x: BigUint,
    y: BigUint,
}

impl KeyPair {
    /// Derives the public half for a caller-chosen private scalar.
    pub fn from_private(params: &DomainParameters, x: BigUint) -> Result<Self> {
        let y = generate_public_key(&params.p, &params.g, &x)?;
        Ok(KeyPair { x, y })
    }

    pub fn private_key(&self) -> &BigUint {
        &self.x
    }

    pub fn public_key(&self) -> &BigUint {
        &self.y
    }
}

/// Result of analysing a text for a usable modulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedParameters {
    /// Largest Unicode scalar value in the text.
    pub max_code_point: u32,
    /// Acceptable moduli in ascending order; never empty.
    pub candidates: Vec<BigUint>,
}

impl SuggestedParameters {
    /// The smallest acceptable modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.candidates[0]
    }
}

/// Key material drawn in one go by [`ElGamalCipher::generate_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMaterial {
    pub g: BigUint,
    pub x: BigUint,
    pub k: BigUint,
}

/// Suggests moduli large enough to encrypt every character of `text`.
///
/// Returns every entry of [`SUGGESTED_MODULI`] strictly greater than the
/// largest code point. Empty text is rejected since there is nothing to size
/// the modulus against.
pub fn suggest_domain_parameters(text: &str) -> Result<SuggestedParameters> {
    let max_code_point = text
        .chars()
        .map(u32::from)
        .max()
        .ok_or_else(|| Error::InvalidInput("text is empty".to_string()))?;

    let candidates = suggest_moduli(&BigUint::from(max_code_point));
    debug!(
        "max code point {} -> suggested moduli {:?}",
        max_code_point,
        candidates.iter().map(|p| p.to_string()).collect::<Vec<_>>()
    );

    Ok(SuggestedParameters {
        max_code_point,
        candidates,
    })
}

/// Moduli strictly greater than `max_symbol`, smallest first.
///
/// When no entry of [`SUGGESTED_MODULI`] qualifies, searches odd numbers
/// upward from `max_symbol + FALLBACK_SEARCH_OFFSET` for the first probable
/// prime and returns that alone.
pub fn suggest_moduli(max_symbol: &BigUint) -> Vec<BigUint> {
    let suitable: Vec<BigUint> = SUGGESTED_MODULI
        .iter()
        .map(|&p| BigUint::from(p))
        .filter(|p| p > max_symbol)
        .collect();
    if !suitable.is_empty() {
        return suitable;
    }

    let two = BigUint::from(2u32);
    let mut candidate = max_symbol + BigUint::from(FALLBACK_SEARCH_OFFSET);
    if (&candidate % &two).is_zero() {
        candidate += BigUint::one();
    }
    while !is_probable_prime(&candidate) {
        candidate += &two;
    }
    debug!("no listed modulus fits, searched up to {}", candidate);
    vec![candidate]
}

/// Picks a generator for `p`: the first of [`GENERATOR_CANDIDATES`] below
/// `p - 1`, or 2.
///
/// The 2 fallback is not re-checked against `[2, p-2]`, and no candidate is
/// checked for large multiplicative order. [`validate_parameters`] catches
/// the out-of-range case for tiny `p`.
pub fn select_generator(p: &BigUint) -> BigUint {
    let fallback = BigUint::from(2u32);
    if *p <= BigUint::from(3u32) {
        return fallback;
    }
    let p_minus_one = p - BigUint::one();
    let g = GENERATOR_CANDIDATES
        .iter()
        .map(|&c| BigUint::from(c))
        .find(|c| *c < p_minus_one)
        .unwrap_or(fallback);
    debug!("selected generator g = {} for p = {}", g, p);
    g
}

/// Checks that `p` is a probable prime and `g` lies in `[2, p-2]`.
pub fn validate_parameters(p: &BigUint, g: &BigUint) -> Result<()> {
    if !is_probable_prime(p) {
        return Err(Error::NotPrime(p.clone()));
    }
    check_range("g", g, &BigUint::from(2u32), &upper_bound(p))
}

/// Computes `y = g^x mod p` after checking `x` is in `[1, p-2]`.
///
/// `p` and `g` are expected to have passed [`validate_parameters`].
pub fn generate_public_key(p: &BigUint, g: &BigUint, x: &BigUint) -> Result<BigUint> {
    check_range("x", x, &BigUint::one(), &upper_bound(p))?;
    Ok(mod_pow(g, x, p))
}

/// Draws a private scalar from `[2, p-2]` using the OS random source.
pub fn generate_private_key(p: &BigUint) -> Result<BigUint> {
    ElGamalCipher::new().generate_private_key(p)
}

/// Encrypts `symbols` with the OS random source backing any ephemeral repair.
///
/// See [`ElGamalCipher::encrypt`].
pub fn encrypt(
    p: &BigUint,
    g: &BigUint,
    y: Option<&BigUint>,
    k: Option<&BigUint>,
    symbols: &[BigUint],
) -> Result<Ciphertext> {
    ElGamalCipher::new().encrypt(p, g, y, k, symbols)
}

/// Encrypts every character of `text` as its Unicode scalar value.
pub fn encrypt_text(
    p: &BigUint,
    g: &BigUint,
    y: Option<&BigUint>,
    k: Option<&BigUint>,
    text: &str,
) -> Result<Ciphertext> {
    ElGamalCipher::new().encrypt(p, g, y, k, &text_to_symbols(text))
}

/// Recovers the symbol sequence from `ciphertext` with private scalar `x`.
///
/// Pairs are processed in order and the output is all-or-nothing: a failing
/// pair discards everything decrypted before it.
///
/// # Errors
/// - [`Error::NotPrime`] if `p < 2`.
/// - [`Error::NoInverse`] if some `a^x mod p` shares a factor with `p`.
pub fn decrypt(p: &BigUint, x: &BigUint, ciphertext: &Ciphertext) -> Result<Vec<BigUint>> {
    if *p < BigUint::from(2u32) {
        return Err(Error::NotPrime(p.clone()));
    }

    let mut symbols = Vec::with_capacity(ciphertext.len());
    for pair in ciphertext {
        // s = a^x mod p
        let s = mod_pow(&pair.a, x, p);
        let s_inv = mod_inverse(&s, p).ok_or_else(|| Error::NoInverse {
            value: s.clone(),
            modulus: p.clone(),
        })?;
        // m = b * s^-1 mod p
        symbols.push((&pair.b * &s_inv) % p);
    }
    Ok(symbols)
}

/// Decrypts `ciphertext` and converts each symbol back into a character.
pub fn decrypt_text(p: &BigUint, x: &BigUint, ciphertext: &Ciphertext) -> Result<String> {
    symbols_to_text(&decrypt(p, x, ciphertext)?)
}

/// Parses the JSON ciphertext form and decrypts it to text.
///
/// Parsing completes before any pair is decrypted.
pub fn decrypt_json(p: &BigUint, x: &BigUint, json: &str) -> Result<String> {
    let ciphertext = Ciphertext::from_json(json)?;
    decrypt_text(p, x, &ciphertext)
}

/// Unicode scalar values of `text`, in order.
pub fn text_to_symbols(text: &str) -> Vec<BigUint> {
    text.chars().map(|c| BigUint::from(u32::from(c))).collect()
}

/// Inverse of [`text_to_symbols`]; fails on the first value that is not a
/// Unicode scalar value.
pub fn symbols_to_text(symbols: &[BigUint]) -> Result<String> {
    symbols
        .iter()
        .map(|m| {
            m.to_u32()
                .and_then(std::char::from_u32)
                .ok_or_else(|| Error::InvalidCodePoint(m.clone()))
        })
        .collect()
}

/// The ElGamal operations that need randomness, bound to one random source.
#[derive(Debug)]
pub struct ElGamalCipher<R> {
    sampler: UniformSampler<R>,
}

impl ElGamalCipher<OsRng> {
    pub fn new() -> Self {
        Self::with_sampler(UniformSampler::new())
    }
}

impl Default for ElGamalCipher<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> ElGamalCipher<R> {
    pub fn with_rng(rng: R) -> Self {
        Self::with_sampler(UniformSampler::with_rng(rng))
    }

    pub fn with_sampler(sampler: UniformSampler<R>) -> Self {
        ElGamalCipher { sampler }
    }

    /// Validates `p`, picks `g` and draws fresh `x` and `k`.
    pub fn generate_all(&mut self, p: &BigUint) -> Result<GeneratedMaterial> {
        if !is_probable_prime(p) {
            return Err(Error::NotPrime(p.clone()));
        }
        let g = select_generator(p);
        let x = self.generate_private_key(p)?;
        let k = self.generate_ephemeral(p)?;
        Ok(GeneratedMaterial { g, x, k })
    }

    /// `x = uniform(2, p-2)`.
    pub fn generate_private_key(&mut self, p: &BigUint) -> Result<BigUint> {
        self.draw_scalar(p)
    }

    /// `k = uniform(2, p-2)`.
    pub fn generate_ephemeral(&mut self, p: &BigUint) -> Result<BigUint> {
        self.draw_scalar(p)
    }

    /// Draws a private scalar and derives its public value.
    pub fn generate_keypair(&mut self, params: &DomainParameters) -> Result<KeyPair> {
        let x = self.generate_private_key(&params.p)?;
        KeyPair::from_private(params, x)
    }

    /// Returns `k` if it lies in `[2, p-2]`, otherwise a freshly drawn scalar.
    ///
    /// Replacing a missing or out-of-range `k` instead of rejecting it is a
    /// convenience carried over for compatibility.
    pub fn resolve_ephemeral(&mut self, p: &BigUint, k: Option<&BigUint>) -> Result<BigUint> {
        match k {
            Some(k) if in_range(k, &BigUint::from(2u32), &upper_bound(p)) => Ok(k.clone()),
            Some(_) => {
                warn!("ephemeral scalar outside [2, p-2]; drawing a fresh one");
                self.generate_ephemeral(p)
            }
            None => {
                debug!("no ephemeral scalar supplied; drawing one");
                self.generate_ephemeral(p)
            }
        }
    }

    /// Encrypts each symbol as `(g^k mod p, m * y^k mod p)`.
    ///
    /// Checks run before any exponentiation, in this order: `p` prime and `g`
    /// in range, `y` present, `k` repaired if needed, every symbol below `p`.
    /// All pairs share the same `a`.
    ///
    /// # Errors
    /// [`Error::NotPrime`], [`Error::OutOfRange`], [`Error::MissingKey`],
    /// [`Error::SymbolOutOfRange`], or a sampler error while drawing `k`.
    pub fn encrypt(
        &mut self,
        p: &BigUint,
        g: &BigUint,
        y: Option<&BigUint>,
        k: Option<&BigUint>,
        symbols: &[BigUint],
    ) -> Result<Ciphertext> {
        validate_parameters(p, g)?;
        let y = y.ok_or(Error::MissingKey)?;
        let k = self.resolve_ephemeral(p, k)?;
        if let Some((index, symbol)) = symbols.iter().enumerate().find(|(_, m)| *m >= p) {
            return Err(Error::SymbolOutOfRange {
                index,
                symbol: symbol.clone(),
                modulus: p.clone(),
            });
        }

        let a = mod_pow(g, &k, p);
        let yk = mod_pow(y, &k, p);
        let pairs = symbols
            .iter()
            .map(|m| CiphertextPair {
                a: a.clone(),
                b: (m * &yk) % p,
            })
            .collect::<Vec<_>>();
        Ok(Ciphertext::new(pairs))
    }

    fn draw_scalar(&mut self, p: &BigUint) -> Result<BigUint> {
        self.sampler.sample(&BigUint::from(2u32), &upper_bound(p))
    }
}

/// `p - 2`, saturating at zero.
fn upper_bound(p: &BigUint) -> BigUint {
    let two = BigUint::from(2u32);
    if *p < two {
        BigUint::zero()
    } else {
        p - two
    }
}

fn in_range(value: &BigUint, min: &BigUint, max: &BigUint) -> bool {
    value >= min && value <= max
}

fn check_range(name: &'static str, value: &BigUint, min: &BigUint, max: &BigUint) -> Result<()> {
    if in_range(value, min, max) {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            name,
            value: value.clone(),
            min: min.clone(),
            max: max.clone(),
        })
    }
}
