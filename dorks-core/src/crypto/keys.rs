// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fixed key material shared by every client build.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Prefix byte placed in front of device identifiers and body signatures.
pub const SIGNATURE_PREFIX: u8 = 0x52;

/// Number of random bytes hashed into a fresh device identifier.
pub const DEVICE_ENTROPY_LEN: usize = 20;

/// Length of a hex-encoded device identifier (prefix + SHA-1 + HMAC-SHA1).
pub const DEVICE_ID_LEN: usize = 2 * (1 + 20 + 20);

const SIGNATURE_KEY: [u8; 20] = [
    0xEA, 0xB4, 0xF1, 0xB9, 0xE3, 0x34, 0x0C, 0xD1, 0x63, 0x1E, 0xDE, 0x3B, 0x58, 0x7C, 0xC3,
    0xEB, 0xED, 0xF1, 0xAF, 0xA9,
];

const DEVICE_ID_KEY: [u8; 20] = [
    0xAE, 0x49, 0x55, 0x04, 0x58, 0xD8, 0xE7, 0xC5, 0x1D, 0x56, 0x69, 0x16, 0xB0, 0x48, 0x88,
    0xBF, 0xB8, 0xB3, 0xCA, 0x7D,
];

/// Secret keys used by [`CredentialSigner`](super::CredentialSigner).
///
/// Immutable for the lifetime of the process; wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    prefix: u8,
    signature_key: Vec<u8>,
    device_id_key: Vec<u8>,
}

impl KeyMaterial {
    /// Creates key material from explicit keys.
    pub fn new(prefix: u8, signature_key: &[u8], device_id_key: &[u8]) -> Self {
        KeyMaterial {
            prefix,
            signature_key: signature_key.to_vec(),
            device_id_key: device_id_key.to_vec(),
        }
    }

    /// Returns the prefix byte.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub(crate) fn signature_key(&self) -> &[u8] {
        &self.signature_key
    }

    pub(crate) fn device_id_key(&self) -> &[u8] {
        &self.device_id_key
    }
}

impl Default for KeyMaterial {
    fn default() -> Self {
        KeyMaterial::new(SIGNATURE_PREFIX, &SIGNATURE_KEY, &DEVICE_ID_KEY)
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("prefix", &self.prefix)
            .field("signature_key", &"[REDACTED]")
            .field("device_id_key", &"[REDACTED]")
            .finish()
    }
}
