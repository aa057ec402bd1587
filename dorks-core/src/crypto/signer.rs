// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential Signer
//!
//! Produces device identifiers, body signatures and transaction identifiers.
//!
//! Device identifier layout (hex, uppercase):
//!   `prefix (1 byte) || SHA-1(hex(random 20 bytes)) || HMAC-SHA1(device key, prefix || sha1)`
//!
//! Body signature layout (base64):
//!   `prefix (1 byte) || HMAC-SHA1(signature key, body)`

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY};
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;

use super::keys::{KeyMaterial, DEVICE_ENTROPY_LEN, DEVICE_ID_LEN};
use super::CryptoError;

/// Source of random bytes.
///
/// Substituted in tests to make transaction identifiers reproducible.
pub trait EntropySource: Send + Sync {
    /// Fills `dest` with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError>;
}

/// Operating system entropy via `ring`.
pub struct SystemEntropy {
    rng: SystemRandom,
}

impl SystemEntropy {
    pub fn new() -> Self {
        SystemEntropy {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for SystemEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        self.rng
            .fill(dest)
            .map_err(|_| CryptoError::EntropyUnavailable)
    }
}

/// Stateless signer over fixed key material.
#[derive(Clone)]
pub struct CredentialSigner {
    keys: KeyMaterial,
    entropy: Arc<dyn EntropySource>,
}

impl CredentialSigner {
    /// Creates a signer with the given keys and system entropy.
    pub fn new(keys: KeyMaterial) -> Self {
        CredentialSigner {
            keys,
            entropy: Arc::new(SystemEntropy::new()),
        }
    }

    /// Replaces the entropy source.
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    /// Generates a fresh random device identifier.
    pub fn derive_device_id(&self) -> Result<String, CryptoError> {
        let mut seed = [0u8; DEVICE_ENTROPY_LEN];
        self.entropy.fill(&mut seed)?;

        let content_hash = digest(&SHA1_FOR_LEGACY_USE_ONLY, hex::encode(seed).as_bytes());

        let mut data = Vec::with_capacity(1 + content_hash.as_ref().len());
        data.push(self.keys.prefix());
        data.extend_from_slice(content_hash.as_ref());

        let key = hmac::Key::new(
            hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            self.keys.device_id_key(),
        );
        let tag = hmac::sign(&key, &data);

        let mut device_id = hex::encode(&data);
        device_id.push_str(&hex::encode(tag.as_ref()));
        Ok(device_id.to_uppercase())
    }

    /// Checks that `device_id` has the expected layout and a valid trailing HMAC.
    pub fn verify_device_id(&self, device_id: &str) -> bool {
        if device_id.len() != DEVICE_ID_LEN {
            return false;
        }
        let Ok(raw) = hex::decode(device_id) else {
            return false;
        };
        let (data, tag) = raw.split_at(21);
        if data[0] != self.keys.prefix() {
            return false;
        }

        let key = hmac::Key::new(
            hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            self.keys.device_id_key(),
        );
        hmac::verify(&key, data, tag).is_ok()
    }

    /// Signs the exact bytes that will be sent on the wire.
    pub fn sign_body(&self, body: &[u8]) -> String {
        let key = hmac::Key::new(
            hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            self.keys.signature_key(),
        );
        let tag = hmac::sign(&key, body);

        let mut signature = Vec::with_capacity(1 + tag.as_ref().len());
        signature.push(self.keys.prefix());
        signature.extend_from_slice(tag.as_ref());
        STANDARD.encode(signature)
    }

    /// Generates a random UUID used to de-duplicate coin transactions.
    pub fn new_transaction_id(&self) -> Result<Uuid, CryptoError> {
        let mut bytes = [0u8; 16];
        self.entropy.fill(&mut bytes)?;
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl Default for CredentialSigner {
    fn default() -> Self {
        CredentialSigner::new(KeyMaterial::default())
    }
}

impl std::fmt::Debug for CredentialSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSigner")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
