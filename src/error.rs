use num_bigint_dig::BigUint;
use thiserror::Error;

/// Errors produced by the number-theory helpers and the ElGamal operations.
///
/// Every variant is recoverable: callers are expected to match on the kind
/// and report it, nothing here aborts the process.
#[derive(Debug, Error)]
pub enum Error {
    /// The modulus failed the primality test.
    #[error("modulus {0} is not prime")]
    NotPrime(BigUint),

    /// A generator, private key or ephemeral scalar is outside its bound.
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: BigUint,
        min: BigUint,
        max: BigUint,
    },

    /// Encryption was attempted before a public key was derived.
    #[error("public key is missing; generate it before encrypting")]
    MissingKey,

    /// A plain symbol is not strictly below the modulus.
    #[error("symbol {symbol} at position {index} is not below modulus {modulus}")]
    SymbolOutOfRange {
        index: usize,
        symbol: BigUint,
        modulus: BigUint,
    },

    /// The shared secret of a ciphertext pair has no inverse modulo `p`.
    #[error("no modular inverse for {value} modulo {modulus}")]
    NoInverse { value: BigUint, modulus: BigUint },

    /// The ciphertext does not parse into well-formed integer pairs.
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// Rejection sampling did not accept a candidate within the retry budget.
    #[error("random source exhausted after {attempts} rejected draws")]
    RandomSourceExhausted { attempts: usize },

    /// The random byte source itself reported a failure.
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// A decrypted value is not a Unicode scalar value.
    #[error("decrypted value {0} is not a valid character")]
    InvalidCodePoint(BigUint),

    /// A session step ran before the value it depends on was set.
    #[error("{0} is not set")]
    MissingParameter(&'static str),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
