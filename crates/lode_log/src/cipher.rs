//! Cipher settings for encrypted logs.
//!
//! The log layer never encrypts anything itself. It only carries the
//! engine's choice of stream cipher, the secret key, and the basic IV so
//! the components that do encrypt can pick them up.

use std::fmt;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A stream cipher implementation supplied by the engine.
pub trait StreamCipherProvider: Send + Sync {
    /// Stable identifier of the cipher (for example `"chacha20"`).
    fn id(&self) -> &str;
}

impl fmt::Debug for dyn StreamCipherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamCipherProvider")
            .field("id", &self.id())
            .finish()
    }
}

/// Secret key bytes, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey(Vec<u8>);

impl CipherKey {
    /// Wraps raw key bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the key has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for CipherKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for CipherKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Complete cipher configuration of an encrypted log.
#[derive(Debug, Clone)]
pub struct CipherSettings {
    provider: Arc<dyn StreamCipherProvider>,
    key: CipherKey,
    basic_iv: u64,
}

impl CipherSettings {
    /// Bundles a cipher, its key and the basic IV.
    #[must_use]
    pub fn new(provider: Arc<dyn StreamCipherProvider>, key: CipherKey, basic_iv: u64) -> Self {
        Self {
            provider,
            key,
            basic_iv,
        }
    }

    /// Returns the cipher.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn StreamCipherProvider> {
        &self.provider
    }

    /// Returns the secret key.
    #[must_use]
    pub fn key(&self) -> &CipherKey {
        &self.key
    }

    /// Returns the basic IV.
    #[must_use]
    pub fn basic_iv(&self) -> u64 {
        self.basic_iv
    }
}
