// SPDX-FileCopyrightText: 2026 Dorks Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Request Credentials
//!
//! Local half of the request authentication scheme: device identities,
//! body signatures, transaction identifiers and session token decoding.
//! All digests use the audited `ring` crate.

pub mod keys;
pub mod session;
pub mod signer;

use thiserror::Error;

pub use keys::{KeyMaterial, DEVICE_ENTROPY_LEN, DEVICE_ID_LEN, SIGNATURE_PREFIX};
pub use session::{decode_session, SessionData};
pub use signer::{CredentialSigner, EntropySource, SystemEntropy};

/// Errors raised while producing or decoding credentials.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The entropy source could not provide random bytes.
    #[error("entropy source unavailable")]
    EntropyUnavailable,

    /// A session token could not be decoded.
    #[error("invalid session token: {0}")]
    InvalidSession(String),
}
