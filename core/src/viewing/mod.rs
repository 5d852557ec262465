//! Viewing keys and selective disclosure
//!
//! A viewing key pair lets a recipient (or a delegated auditor) read
//! confidential payment metadata without spending authority:
//! - [`encryption`]: ECDH + XChaCha20-Poly1305 payloads for a viewing key
//! - [`threshold`]: Shamir t-of-n splitting with Feldman verification
//! - [`disclosure`]: trigger-gated reveal of encrypted payloads

pub mod disclosure;
pub mod encryption;
pub mod threshold;

pub use disclosure::{is_revealable, reveal, ConditionalDisclosure, DisclosureContext, Trigger};
pub use encryption::{decrypt_with_viewing, encrypt_for_viewing, EncryptedPayload};
pub use threshold::{reconstruct_key, reconstruct_verified, split_key, Share, ShareVerifier, ThresholdShareSet};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::curve::{Curve, Point};
use crate::error::{Error, Result};
use crate::secret::SecretScalar;

// ============================================================================
// Viewing Keys
// ============================================================================

/// Selective-disclosure credential
///
/// The private half never leaves the recipient or their delegate; Clone is
/// not derived.
pub struct ViewingKeyPair {
    private_key: SecretScalar,
    public_key: Point,
    label: Option<String>,
}

impl ViewingKeyPair {
    /// Wrap an existing viewing secret (for example from [`crate::StealthKeys`])
    pub fn from_private_key(private_key: SecretScalar) -> Self {
        let public_key = private_key.public_point();
        Self {
            private_key,
            public_key,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn curve(&self) -> Curve {
        self.public_key.curve()
    }

    pub fn public_key(&self) -> &Point {
        &self.public_key
    }

    pub fn private_key(&self) -> &SecretScalar {
        &self.private_key
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// SHA-256 of the compressed public key, for indexing without exposing the key
    pub fn key_hash(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(self.public_key.to_compressed()));
        out
    }
}

impl fmt::Debug for ViewingKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewingKeyPair")
            .field("public_key", &self.public_key.to_hex())
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Generate a fresh viewing key pair
pub fn generate_viewing_keypair(curve: Curve) -> ViewingKeyPair {
    let pair = ViewingKeyPair::from_private_key(SecretScalar::generate(curve));
    tracing::debug!(%curve, "generated viewing key pair");
    pair
}

// ============================================================================
// Privacy Levels
// ============================================================================

/// How much of a transaction is hidden
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// No privacy, all data public
    Transparent,
    /// Sender, amount and recipient hidden
    #[default]
    Shielded,
    /// Shielded, with a viewing key for auditors
    Compliant,
}

impl PrivacyLevel {
    /// Whether metadata is encrypted at this level
    pub fn should_encrypt(self) -> bool {
        matches!(self, PrivacyLevel::Shielded | PrivacyLevel::Compliant)
    }

    /// Whether an auditor viewing key is attached at this level
    pub fn should_include_viewing_key(self) -> bool {
        matches!(self, PrivacyLevel::Compliant)
    }
}

impl fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrivacyLevel::Transparent => "transparent",
            PrivacyLevel::Shielded => "shielded",
            PrivacyLevel::Compliant => "compliant",
        })
    }
}

impl FromStr for PrivacyLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "transparent" => Ok(PrivacyLevel::Transparent),
            "shielded" => Ok(PrivacyLevel::Shielded),
            "compliant" => Ok(PrivacyLevel::Compliant),
            _ => Err(Error::InvalidEncoding("unknown privacy level")),
        }
    }
}
