pub mod elgamal;

// Re-export ElGamal functionality
pub use elgamal::{
    decrypt, decrypt_json, decrypt_text, encrypt, encrypt_text, generate_private_key,
    generate_public_key, parse_biguint, select_generator, suggest_domain_parameters,
    suggest_moduli, symbols_to_text, text_to_symbols, validate_parameters, Ciphertext,
    CiphertextPair, DomainParameters, ElGamalCipher, ElGamalSession, GeneratedMaterial, KeyPair,
    SessionState, SuggestedParameters, GENERATOR_CANDIDATES, SUGGESTED_MODULI,
};
