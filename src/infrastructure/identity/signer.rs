//! Detached message signing.
//!
//! A [`MessageSigner`] produces a transport-encoded signature over the
//! serialized bytes of a protocol message. The default implementation,
//! [`HmacSigner`], computes HMAC-SHA256 over the payload and encodes
//! the tag as standard base64.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::infrastructure::identity::error::IdentityResult;
use crate::infrastructure::identity::IdentityError;

type HmacSha256 = Hmac<Sha256>;

/// Produces detached signatures over message payloads.
///
/// Implementations must be cheap to call repeatedly: the submission
/// path signs every outbound message individually.
pub trait MessageSigner: Send + Sync {
    /// Signs `payload` and returns the transport-encoded signature.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Signing`] if the signature cannot be
    /// produced, for example when the key material is unusable.
    fn sign(&self, payload: &[u8]) -> IdentityResult<String>;
}

/// HMAC-SHA256 signer over a shared secret.
#[derive(Clone)]
pub struct HmacSigner {
    key: Vec<u8>,
}

impl HmacSigner {
    /// Creates a signer from raw key bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
        }
    }
}

impl MessageSigner for HmacSigner {
    fn sign(&self, payload: &[u8]) -> IdentityResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| IdentityError::signing(format!("HMAC init failed: {e}")))?;
        mac.update(payload);
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}
