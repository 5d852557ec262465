//! Stealth address engine
//!
//! Dual-key stealth addresses over either supported curve:
//!
//! ```text
//! recipient:  SK = sk·G, VK = vk·G          (published as a meta-address)
//! sender:     R = r·G, S = r·VK
//!             P = SK + H(S)·G                (one-time stealth public key)
//!             view_tag = SHA-256(S)[0]       (optional)
//! recipient:  S' = vk·R, p = sk + H(S')      (one-time private key, p·G = P)
//! ```
//!
//! Chain identity only enters through [`AddressEncoder`], which turns the
//! one-time public key into a chain-specific address string.

mod address;
mod derive;
mod meta;
mod scan;

pub use address::{
    encoder_for_chain, to_checksum_address, AddressEncoder, AptosEncoder, EthereumEncoder,
    NearEncoder, RawEncoder, SolanaEncoder, SuiEncoder,
};
pub use derive::{
    derive_encoded_stealth_address, derive_stealth_address, derive_stealth_address_with, EncodedStealthAddress,
};
pub use meta::{generate_meta_address, StealthKeys, StealthMetaAddress};
pub use scan::{recover_stealth_key, scan_batch, FoundPayment, ScanReport, ScanStats, ViewingScanner};

use std::fmt;

use sha2::{digest::Output, Digest, Sha256};

use crate::curve::{Curve, Point, Scalar};
use crate::error::{Error, Result};
use crate::secret::{SecretBuffer, SecretBytes};

/// Domain separator for the shared-secret tweak H(S)
pub const STEALTH_TWEAK_DOMAIN: &[u8] = b"SIP-STEALTH-TWEAK-v1";

/// A one-time stealth address as announced by the sender
///
/// Also the scan candidate on the recipient side: a transaction's output key,
/// its published ephemeral key and optional view tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StealthAddress {
    stealth_public_key: Point,
    ephemeral_public_key: Point,
    view_tag: Option<u8>,
}

impl StealthAddress {
    /// Assemble an announcement from its parts
    pub fn new(stealth_public_key: Point, ephemeral_public_key: Point, view_tag: Option<u8>) -> Result<Self> {
        if stealth_public_key.curve() != ephemeral_public_key.curve() {
            return Err(Error::CurveMismatch {
                expected: stealth_public_key.curve(),
                found: ephemeral_public_key.curve(),
            });
        }
        if stealth_public_key.is_identity() || ephemeral_public_key.is_identity() {
            return Err(Error::DegenerateKey);
        }
        Ok(Self {
            stealth_public_key,
            ephemeral_public_key,
            view_tag,
        })
    }

    /// Parse an on-chain announcement
    pub fn from_announcement(
        curve: Curve,
        stealth_public_key: &[u8],
        ephemeral_public_key: &[u8],
        view_tag: Option<u8>,
    ) -> Result<Self> {
        Self::new(
            curve.bytes_to_point(stealth_public_key)?,
            curve.bytes_to_point(ephemeral_public_key)?,
            view_tag,
        )
    }

    pub fn curve(&self) -> Curve {
        self.stealth_public_key.curve()
    }

    /// One-time public key P
    pub fn stealth_public_key(&self) -> &Point {
        &self.stealth_public_key
    }

    /// Ephemeral public key R
    pub fn ephemeral_public_key(&self) -> &Point {
        &self.ephemeral_public_key
    }

    pub fn view_tag(&self) -> Option<u8> {
        self.view_tag
    }

    /// Compressed encoding of P
    pub fn to_bytes(&self) -> Vec<u8> {
        self.stealth_public_key.to_compressed()
    }

    /// Chain-specific address string for P
    pub fn encode(&self, encoder: &dyn AddressEncoder) -> Result<String> {
        encoder.encode(&self.stealth_public_key)
    }
}

impl fmt::Debug for StealthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StealthAddress")
            .field("curve", &self.curve())
            .field("stealth_public_key", &self.stealth_public_key.to_hex())
            .field("ephemeral_public_key", &self.ephemeral_public_key.to_hex())
            .field("view_tag", &self.view_tag)
            .finish()
    }
}

// ============================================================================
// Shared-Secret Helpers
// ============================================================================

/// Encode the ECDH point S; the identity is a degenerate result
fn shared_secret_bytes(shared: &Point) -> Result<SecretBuffer> {
    if shared.is_identity() {
        return Err(Error::DegenerateKey);
    }
    Ok(SecretBuffer::new(shared.to_compressed()))
}

/// First byte of SHA-256(S)
fn view_tag(shared_secret: &SecretBuffer) -> u8 {
    let mut digest = SecretBytes::new([0u8; 32]);
    Sha256::new()
        .chain_update(shared_secret.as_bytes())
        .finalize_into(Output::<Sha256>::from_mut_slice(digest.expose_mut()));
    digest.expose()[0]
}

/// H(S) as a scalar on the given curve
fn tweak(curve: Curve, shared_secret: &SecretBuffer) -> Scalar {
    curve.hash_to_scalar(STEALTH_TWEAK_DOMAIN, shared_secret.as_bytes())
}

/// P = SK + tweak·G
fn one_time_public_key(spending_key: &Point, tweak: &Scalar) -> Result<Point> {
    let point = spending_key.add(&tweak.mul_base())?;
    if point.is_identity() {
        return Err(Error::DegenerateKey);
    }
    Ok(point)
}
