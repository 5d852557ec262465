//! Stealth address computation (sender side)

use super::{
    encoder_for_chain, one_time_public_key, shared_secret_bytes, tweak, view_tag, AddressEncoder, RawEncoder,
    StealthAddress, StealthMetaAddress,
};
use crate::curve::Scalar;
use crate::error::{Error, Result};
use crate::secret::SecretScalar;

/// Derive a fresh one-time address for a payment to `meta`
///
/// The ephemeral scalar is drawn from OS entropy and wiped before returning.
pub fn derive_stealth_address(meta: &StealthMetaAddress) -> Result<StealthAddress> {
    let ephemeral = SecretScalar::generate(meta.curve());
    derive_stealth_address_with(meta, &ephemeral.expose())
}

/// Derive a one-time address with a caller-supplied ephemeral scalar
///
/// Reusing an ephemeral scalar across payments links them; only use this for
/// fixed test vectors or when the scalar comes from a CSPRNG.
pub fn derive_stealth_address_with(meta: &StealthMetaAddress, ephemeral: &Scalar) -> Result<StealthAddress> {
    let curve = meta.curve();
    if ephemeral.curve() != curve {
        return Err(Error::CurveMismatch {
            expected: curve,
            found: ephemeral.curve(),
        });
    }
    if ephemeral.is_zero() {
        return Err(Error::DegenerateKey);
    }

    // R = r·G
    let ephemeral_public_key = ephemeral.mul_base();

    // S = r·VK
    let shared = shared_secret_bytes(&meta.viewing_key().mul(ephemeral)?)?;

    // P = SK + H(S)·G
    let tweak = tweak(curve, &shared);
    let stealth_public_key = one_time_public_key(meta.spending_key(), &tweak)?;

    let tag = meta.view_tags().then(|| view_tag(&shared));

    tracing::trace!(%curve, chain = meta.chain(), view_tag = tag.is_some(), "derived stealth address");
    StealthAddress::new(stealth_public_key, ephemeral_public_key, tag)
}

/// A one-time address plus its chain-specific encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedStealthAddress {
    stealth: StealthAddress,
    address: String,
}

impl EncodedStealthAddress {
    pub fn stealth(&self) -> &StealthAddress {
        &self.stealth
    }

    /// The address string the payment is sent to
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Derive a one-time address and encode it for the payment's chain
///
/// With `encoder` unset, the meta-address chain's default encoder is used
/// when it matches the curve, otherwise the raw point hex.
pub fn derive_encoded_stealth_address(
    meta: &StealthMetaAddress,
    encoder: Option<&dyn AddressEncoder>,
) -> Result<EncodedStealthAddress> {
    let curve = meta.curve();
    let chain_default = encoder_for_chain(meta.chain()).filter(|e| e.curve() == curve);
    let raw = RawEncoder { curve };
    let encoder: &dyn AddressEncoder = match (encoder, &chain_default) {
        (Some(encoder), _) => encoder,
        (None, Some(default)) => default.as_ref(),
        (None, None) => &raw,
    };
    if encoder.curve() != curve {
        return Err(Error::CurveMismatch {
            expected: curve,
            found: encoder.curve(),
        });
    }

    let stealth = derive_stealth_address(meta)?;
    let address = stealth.encode(encoder)?;
    Ok(EncodedStealthAddress { stealth, address })
}
