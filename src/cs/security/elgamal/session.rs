//! A single encryption session: the values a user fills in step by step
//! (`p`, `g`, `x`, `k`), the derived public key `y`, and the last outputs.
//!
//! Every transition is an explicit call. A failing call leaves the session
//! exactly as it was.

use log::debug;
use num_bigint_dig::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use super::{
    decrypt_text, generate_public_key, suggest_domain_parameters, text_to_symbols,
    validate_parameters, Ciphertext, ElGamalCipher, SuggestedParameters,
};
use crate::error::{Error, Result};

/// How far a session has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `p` or `g` is missing.
    NoParameters,
    /// `p` and `g` are set, no private key yet.
    ParametersSet,
    /// A private key is set but the public key has not been derived from it.
    KeyPairReady,
    /// The public key matches the current `p`, `g` and `x`; encryption and
    /// decryption are both possible.
    PublicKeyReady,
}

#[derive(Debug)]
pub struct ElGamalSession<R> {
    cipher: ElGamalCipher<R>,
    p: Option<BigUint>,
    g: Option<BigUint>,
    x: Option<BigUint>,
    y: Option<BigUint>,
    k: Option<BigUint>,
    ciphertext: Option<Ciphertext>,
    decrypted: Option<String>,
}

impl ElGamalSession<OsRng> {
    pub fn new() -> Self {
        Self::with_cipher(ElGamalCipher::new())
    }
}

impl Default for ElGamalSession<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> ElGamalSession<R> {
    pub fn with_rng(rng: R) -> Self {
        Self::with_cipher(ElGamalCipher::with_rng(rng))
    }

    pub fn with_cipher(cipher: ElGamalCipher<R>) -> Self {
        ElGamalSession {
            cipher,
            p: None,
            g: None,
            x: None,
            y: None,
            k: None,
            ciphertext: None,
            decrypted: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.p, &self.g, &self.x, &self.y) {
            (Some(_), Some(_), Some(_), Some(_)) => SessionState::PublicKeyReady,
            (Some(_), Some(_), Some(_), None) => SessionState::KeyPairReady,
            (Some(_), Some(_), None, _) => SessionState::ParametersSet,
            _ => SessionState::NoParameters,
        }
    }

    pub fn p(&self) -> Option<&BigUint> {
        self.p.as_ref()
    }

    pub fn g(&self) -> Option<&BigUint> {
        self.g.as_ref()
    }

    pub fn x(&self) -> Option<&BigUint> {
        self.x.as_ref()
    }

    pub fn y(&self) -> Option<&BigUint> {
        self.y.as_ref()
    }

    pub fn k(&self) -> Option<&BigUint> {
        self.k.as_ref()
    }

    pub fn ciphertext(&self) -> Option<&Ciphertext> {
        self.ciphertext.as_ref()
    }

    pub fn decrypted(&self) -> Option<&str> {
        self.decrypted.as_deref()
    }

    /// Sets the modulus. The public key no longer matches and is dropped.
    pub fn set_modulus(&mut self, p: BigUint) {
        self.p = Some(p);
        self.y = None;
    }

    /// Sets the generator. The public key no longer matches and is dropped.
    pub fn set_generator(&mut self, g: BigUint) {
        self.g = Some(g);
        self.y = None;
    }

    /// Sets the private key. The public key no longer matches and is dropped.
    pub fn set_private_key(&mut self, x: BigUint) {
        self.x = Some(x);
        self.y = None;
    }

    /// Sets (or clears) the ephemeral scalar used by the next encryption.
    pub fn set_ephemeral(&mut self, k: Option<BigUint>) {
        self.k = k;
    }

    /// Analyses `text` and adopts the smallest suggested modulus.
    pub fn analyze_text(&mut self, text: &str) -> Result<SuggestedParameters> {
        let suggestion = suggest_domain_parameters(text)?;
        self.set_modulus(suggestion.modulus().clone());
        Ok(suggestion)
    }

    /// Picks `g` and draws fresh `x` and `k` for the current modulus.
    pub fn generate_all(&mut self) -> Result<()> {
        let p = self.p.as_ref().ok_or(Error::MissingParameter("modulus p"))?;
        let material = self.cipher.generate_all(p)?;
        self.g = Some(material.g);
        self.x = Some(material.x);
        self.k = Some(material.k);
        self.y = None;
        debug!("session key material regenerated");
        Ok(())
    }

    /// Derives `y = g^x mod p` from the current values.
    pub fn generate_public_key(&mut self) -> Result<&BigUint> {
        let (p, g) = self.parameters()?;
        let x = self.x.as_ref().ok_or(Error::MissingParameter("private key x"))?;
        validate_parameters(p, g)?;
        let y = generate_public_key(p, g, x)?;
        Ok(self.y.insert(y))
    }

    /// Encrypts `text`, keeping the ephemeral scalar actually used (which is
    /// freshly drawn when the current one is missing or out of range).
    pub fn encrypt_text(&mut self, text: &str) -> Result<&Ciphertext> {
        let (p, g) = match (&self.p, &self.g) {
            (Some(p), Some(g)) => (p, g),
            (None, _) => return Err(Error::MissingParameter("modulus p")),
            (_, None) => return Err(Error::MissingParameter("generator g")),
        };
        validate_parameters(p, g)?;
        let y = self.y.as_ref().ok_or(Error::MissingKey)?;
        let k = self.cipher.resolve_ephemeral(p, self.k.as_ref())?;
        let ciphertext = self
            .cipher
            .encrypt(p, g, Some(y), Some(&k), &text_to_symbols(text))?;

        self.k = Some(k);
        Ok(self.ciphertext.insert(ciphertext))
    }

    /// Parses a JSON ciphertext and decrypts it with the current `p` and `x`.
    pub fn decrypt_json(&mut self, json: &str) -> Result<&str> {
        let ciphertext = Ciphertext::from_json(json)?;
        self.decrypt(&ciphertext)
    }

    /// Decrypts the ciphertext produced by the last [`encrypt_text`](Self::encrypt_text).
    pub fn decrypt_last(&mut self) -> Result<&str> {
        let ciphertext = self
            .ciphertext
            .clone()
            .ok_or(Error::MissingParameter("ciphertext"))?;
        self.decrypt(&ciphertext)
    }

    /// Drops the last ciphertext and decrypted text; keys stay.
    pub fn clear(&mut self) {
        self.ciphertext = None;
        self.decrypted = None;
    }

    fn decrypt(&mut self, ciphertext: &Ciphertext) -> Result<&str> {
        let p = self.p.as_ref().ok_or(Error::MissingParameter("modulus p"))?;
        let x = self.x.as_ref().ok_or(Error::MissingParameter("private key x"))?;
        let text = decrypt_text(p, x, ciphertext)?;
        Ok(self.decrypted.insert(text).as_str())
    }

    fn parameters(&self) -> Result<(&BigUint, &BigUint)> {
        let p = self.p.as_ref().ok_or(Error::MissingParameter("modulus p"))?;
        let g = self.g.as_ref().ok_or(Error::MissingParameter("generator g"))?;
        Ok((p, g))
    }
}
