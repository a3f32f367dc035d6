//! Resolved signing credentials for one protocol participant.

use std::sync::Arc;

use crate::domain::messages::{Message, SignedMessage};
use crate::infrastructure::identity::error::IdentityResult;
use crate::infrastructure::identity::signer::MessageSigner;
use crate::infrastructure::identity::IdentityError;

/// Key material resolved for a single participant.
///
/// Holds the participant identifier the credentials belong to, the key
/// identifier stamped onto outbound messages, and the signer that
/// produces detached signatures. Cloning is cheap: the signer is held
/// behind an [`Arc`].
#[derive(Clone)]
pub struct SigningCredentials {
    subject: String,
    key_id: String,
    signer: Arc<dyn MessageSigner>,
}

impl SigningCredentials {
    /// Creates credentials for `subject` signing with `signer`.
    pub fn new(
        subject: impl Into<String>,
        key_id: impl Into<String>,
        signer: Arc<dyn MessageSigner>,
    ) -> Self {
        Self {
            subject: subject.into(),
            key_id: key_id.into(),
            signer,
        }
    }

    /// Returns the participant these credentials belong to.
    #[inline]
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the key identifier stamped onto signed messages.
    #[inline]
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signs a protocol message for transport.
    ///
    /// The message is serialized to its canonical JSON form, signed,
    /// and wrapped together with the key identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Signing`] if serialization or signature
    /// production fails.
    pub fn sign(&self, message: &Message) -> IdentityResult<SignedMessage> {
        let payload = serde_json::to_vec(message)
            .map_err(|e| IdentityError::signing(format!("serialize message: {e}")))?;
        let signature = self.signer.sign(&payload)?;
        Ok(SignedMessage::new(
            message.clone(),
            self.key_id.clone(),
            signature,
        ))
    }

    /// Signs an arbitrary payload, used for request authentication.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Signing`] if signature production fails.
    pub fn sign_payload(&self, payload: &[u8]) -> IdentityResult<String> {
        self.signer.sign(payload)
    }
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("subject", &self.subject)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}
