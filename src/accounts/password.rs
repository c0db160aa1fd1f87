use sha2::{Digest, Sha256};

/// Salt used by databases written before the salt became configurable.
pub const LEGACY_SALT: &str = "yazgi2025happynewyearpleaseacceptmyinternship";

/// Process-wide salt appended to every secret before hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt(String);

impl Salt {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Salt {
    fn default() -> Self {
        Self::new(LEGACY_SALT)
    }
}

/// Unsalted-per-record SHA-256 digests, kept for compatibility with
/// existing rows. Not a password-storage KDF.
#[derive(Debug, Clone, Default)]
pub struct CredentialHasher {
    salt: Salt,
}

impl CredentialHasher {
    pub fn new(salt: Salt) -> Self {
        Self { salt }
    }

    /// Lowercase hex SHA-256 of `secret ++ salt`.
    pub fn digest(&self, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.update(self.salt.as_str().as_bytes());
        hex::encode(hasher.finalize())
    }
}
