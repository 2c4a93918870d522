//! Session token encoding and decoding.
//!
//! A session token is the tenant's username encrypted with AES-256-GCM under
//! a process-wide key. The wire form is three standard-base64 parts joined
//! with `-` (a character the base64 alphabet cannot produce):
//!
//! ```text
//! base64(ciphertext) - base64(nonce) - base64(tag)
//! ```
//!
//! A fresh 96-bit nonce is drawn for every issued token and carried inside
//! the token itself, so tokens remain valid across concurrent logins and the
//! codec keeps no per-token state. Tampering with any part fails GCM tag
//! verification and resolves to an opaque unauthenticated error.

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};
use base64::prelude::*;

use vitalsync_core::Username;

use crate::error::{AuthError, Result};

/// Required session key length in bytes (AES-256).
pub const SESSION_KEY_LEN: usize = 32;

/// Nonce length in bytes (AES-GCM standard).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Separator between the base64 parts of a token.
const PART_SEPARATOR: char = '-';

/// Trait for issuing and resolving session tokens.
pub trait SessionCodec: Send + Sync {
    /// Encrypt a username into an opaque bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if encryption fails.
    fn issue(&self, username: &Username) -> Result<String>;

    /// Decrypt and verify a bearer token, recovering the username.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] for every failure mode; the
    /// cause is not revealed to the caller.
    fn resolve(&self, token: &str) -> Result<Username>;
}

/// AES-256-GCM session token codec.
pub struct AesGcmCodec {
    cipher: Aes256Gcm,
}

impl AesGcmCodec {
    /// Create a codec from a raw 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidKeyLength`] if the key is not exactly
    /// [`SESSION_KEY_LEN`] bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != SESSION_KEY_LEN {
            return Err(AuthError::InvalidKeyLength {
                expected: SESSION_KEY_LEN,
                got: key.len(),
            });
        }
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
        Ok(Self { cipher })
    }

    fn reject(reason: &str) -> AuthError {
        tracing::debug!(reason, "session token rejected");
        AuthError::Unauthenticated
    }
}

impl SessionCodec for AesGcmCodec {
    fn issue(&self, username: &Username) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, username.as_str().as_bytes())
            .map_err(|_| AuthError::Internal("encryption failed".to_owned()))?;

        // aes-gcm appends the tag to the ciphertext; the token carries them
        // as separate parts.
        let split = sealed.len().saturating_sub(TAG_LEN);
        let (ciphertext, tag) = sealed.split_at(split);

        Ok(format!(
            "{}{PART_SEPARATOR}{}{PART_SEPARATOR}{}",
            BASE64_STANDARD.encode(ciphertext),
            BASE64_STANDARD.encode(nonce),
            BASE64_STANDARD.encode(tag),
        ))
    }

    fn resolve(&self, token: &str) -> Result<Username> {
        if token.is_empty() {
            return Err(Self::reject("empty token"));
        }

        let parts: Vec<&str> = token.split(PART_SEPARATOR).collect();
        let [ciphertext, nonce, tag] = parts.as_slice() else {
            return Err(Self::reject("wrong part count"));
        };

        let ciphertext = BASE64_STANDARD
            .decode(ciphertext)
            .map_err(|_| Self::reject("ciphertext not base64"))?;
        let nonce = BASE64_STANDARD
            .decode(nonce)
            .map_err(|_| Self::reject("nonce not base64"))?;
        let tag = BASE64_STANDARD
            .decode(tag)
            .map_err(|_| Self::reject("tag not base64"))?;

        if nonce.len() != NONCE_LEN {
            return Err(Self::reject("bad nonce length"));
        }
        if tag.len() != TAG_LEN {
            return Err(Self::reject("bad tag length"));
        }

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), sealed.as_slice())
            .map_err(|_| Self::reject("tag verification failed"))?;

        let name =
            String::from_utf8(plaintext).map_err(|_| Self::reject("plaintext not utf-8"))?;
        Username::new(&name).map_err(|_| Self::reject("plaintext not a valid username"))
    }
}

/// A deterministic codec for testing.
///
/// Issues tokens of the form `plain:<username>` with no encryption. Only
/// available in tests and behind the `test-utils` feature.
#[cfg(any(test, feature = "test-utils"))]
pub struct PlainCodec;

#[cfg(any(test, feature = "test-utils"))]
impl SessionCodec for PlainCodec {
    fn issue(&self, username: &Username) -> Result<String> {
        Ok(format!("plain:{username}"))
    }

    fn resolve(&self, token: &str) -> Result<Username> {
        let name = token
            .strip_prefix("plain:")
            .ok_or(AuthError::Unauthenticated)?;
        Username::new(name).map_err(|_| AuthError::Unauthenticated)
    }
}
