//! Ciphertext pairs and their JSON form, `[["a","b"], ["a","b"], ...]`.

use num_bigint_dig::BigUint;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// One encrypted symbol: `a = g^k mod p`, `b = m * y^k mod p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiphertextPair {
    pub a: BigUint,
    pub b: BigUint,
}

/// Ordered sequence of pairs, one per plain symbol.
///
/// Order is significant: decryption walks the pairs front to back to rebuild
/// the symbol sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ciphertext {
    pairs: Vec<CiphertextPair>,
}

impl Ciphertext {
    pub fn new(pairs: Vec<CiphertextPair>) -> Self {
        Ciphertext { pairs }
    }

    pub fn pairs(&self) -> &[CiphertextPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CiphertextPair> {
        self.pairs.iter()
    }

    /// Encodes as a JSON array of two-element arrays of decimal strings.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses the JSON form. The whole input is validated before anything is
    /// returned, so a bad pair anywhere yields no pairs at all.
    ///
    /// # Errors
    /// [`Error::MalformedCiphertext`] if the text is not JSON, is not an array,
    /// or holds an element that is not exactly two non-negative integers
    /// (decimal strings or JSON integers).
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::MalformedCiphertext(format!("not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Result<Self> {
        let items = value.as_array().ok_or_else(|| {
            Error::MalformedCiphertext("expected an array of pairs".to_string())
        })?;

        let mut pairs = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let pair = match item.as_array() {
                Some(pair) if pair.len() == 2 => pair,
                Some(pair) => {
                    return Err(Error::MalformedCiphertext(format!(
                        "pair {} has {} elements, expected 2",
                        index,
                        pair.len()
                    )))
                }
                None => {
                    return Err(Error::MalformedCiphertext(format!(
                        "pair {} is not an array",
                        index
                    )))
                }
            };
            let a = integer_element(&pair[0], index)?;
            let b = integer_element(&pair[1], index)?;
            pairs.push(CiphertextPair { a, b });
        }

        Ok(Ciphertext { pairs })
    }
}

impl From<Vec<CiphertextPair>> for Ciphertext {
    fn from(pairs: Vec<CiphertextPair>) -> Self {
        Ciphertext::new(pairs)
    }
}

impl<'a> IntoIterator for &'a Ciphertext {
    type Item = &'a CiphertextPair;
    type IntoIter = std::slice::Iter<'a, CiphertextPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl Serialize for Ciphertext {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.pairs.len()))?;
        for pair in &self.pairs {
            seq.serialize_element(&[pair.a.to_str_radix(10), pair.b.to_str_radix(10)])?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Ciphertext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ciphertext::from_value(&value).map_err(<D::Error as de::Error>::custom)
    }
}

fn integer_element(value: &Value, index: usize) -> Result<BigUint> {
    let parsed = match value {
        Value::String(s) => parse_digits(s.trim()),
        Value::Number(n) => n.as_u64().map(BigUint::from),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::MalformedCiphertext(format!(
            "pair {} holds {} which is not a non-negative integer",
            index, value
        ))
    })
}

fn parse_digits(s: &str) -> Option<BigUint> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(s.as_bytes(), 10)
}

/// Parses a decimal, non-negative integer supplied at the boundary.
///
/// Surrounding whitespace is ignored; signs, separators and other radices are
/// rejected with [`Error::InvalidInput`] naming `label`.
pub fn parse_biguint(label: &str, text: &str) -> Result<BigUint> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} is empty", label)));
    }
    parse_digits(trimmed).ok_or_else(|| {
        Error::InvalidInput(format!(
            "{} must be a non-negative decimal integer, got {:?}",
            label, trimmed
        ))
    })
}
