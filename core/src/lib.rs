//! SIP core - privacy primitives for cross-chain transactions
//!
//! - Curve abstraction over secp256k1 and ed25519
//! - Pedersen commitments for hidden amounts
//! - Stealth addresses (dual-key, with optional view tags)
//! - Viewing keys: encryption, threshold sharing, conditional disclosure
//!
//! Everything here is synchronous and stateless. Randomness comes from the
//! OS CSPRNG only; secrets live in wrappers that wipe on drop.

pub mod commitment;
pub mod config;
pub mod curve;
pub mod error;
pub mod secret;
pub mod stealth;
pub mod viewing;


#[cfg(test)]
mod test_vectors;

#[cfg(test)]
mod fuzz_tests;


pub use commitment::{
    add_commitments, blinding_difference, blinding_sum, commit, commit_bounded, commit_zero,
    generate_blinding, generator_h, generators, subtract_commitments, verify_generator_h,
    verify_opening, Commitment, Opening, MAX_AMOUNT,
};
pub use config::{PrivacyConfig, ScanConfig};
pub use curve::{bytes_to_point, bytes_to_scalar, hash_to_scalar, point_add, point_sub, point_to_bytes, scalar_mul};
pub use curve::{Curve, Point, Scalar};
pub use error::{DecryptError, Error, Result, ThresholdError};
pub use secret::{SecretBuffer, SecretBytes, SecretScalar};
pub use stealth::{
    derive_encoded_stealth_address, derive_stealth_address, derive_stealth_address_with, generate_meta_address,
    recover_stealth_key, scan_batch, AddressEncoder, EncodedStealthAddress, StealthAddress, StealthKeys,
    StealthMetaAddress, ViewingScanner,
};
pub use viewing::{
    decrypt_with_viewing, encrypt_for_viewing, generate_viewing_keypair, is_revealable,
    reconstruct_key, reconstruct_verified, reveal, split_key, ConditionalDisclosure, DisclosureContext,
    EncryptedPayload, PrivacyLevel, Share, ShareVerifier, ThresholdShareSet, Trigger, ViewingKeyPair,
};

/// String-based helpers kept for callers of the previous API
///
/// Scheduled for removal; use [`StealthMetaAddress`]'s `Display`/`FromStr`.
pub mod compat {
    use crate::error::Result;
    use crate::stealth::StealthMetaAddress;

    #[deprecated(since = "0.1.0", note = "use `StealthMetaAddress::to_string` instead")]
    pub fn encode_stealth_meta_address(meta: &StealthMetaAddress) -> String {
        meta.to_string()
    }

    #[deprecated(since = "0.1.0", note = "use `str::parse::<StealthMetaAddress>` instead")]
    pub fn decode_stealth_meta_address(encoded: &str) -> Result<StealthMetaAddress> {
        encoded.parse()
    }
}
