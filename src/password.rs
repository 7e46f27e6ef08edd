use rand::RngCore;

use crate::{error::AuthError, types::HashedPassword};

const SALT_LEN: usize = 16;

pub trait PasswordHasher: Send + Sync + 'static {
    /// Hash with a fresh random salt. Two calls on the same plaintext give different, equally valid, hashes.
    fn hash(&self, plaintext: &str) -> Result<HashedPassword, AuthError>;

    /// Returns false for a wrong password and for a hash that cannot be decoded.
    fn verify(&self, hashed: &HashedPassword, plaintext: &str) -> bool;
}

/// Argon2 with the salt and parameters embedded in the encoded hash.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    config: argon2::Config<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<HashedPassword, AuthError> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let encoded = argon2::hash_encoded(plaintext.as_bytes(), &salt, &self.config)?;

        Ok(HashedPassword(encoded))
    }

    fn verify(&self, hashed: &HashedPassword, plaintext: &str) -> bool {
        argon2::verify_encoded(&hashed.0, plaintext.as_bytes()).unwrap_or(false)
    }
}
