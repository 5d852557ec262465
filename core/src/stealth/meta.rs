//! Meta-addresses and recipient key material

use std::fmt;
use std::str::FromStr;

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::curve::{Curve, Point};
use crate::error::{Error, Result};
use crate::secret::SecretScalar;

/// Prefix of the human-readable meta-address format
const META_ADDRESS_PREFIX: &str = "sip";

/// Derivation labels for mnemonic-based keys
const SPENDING_LABEL: &[u8] = b"sip/spending";
const VIEWING_LABEL: &[u8] = b"sip/viewing";

// ============================================================================
// Stealth Meta-Address
// ============================================================================

/// A recipient's reusable public identity: `sip:<chain>:<spendingKey>:<viewingKey>`
#[derive(Clone, PartialEq, Eq)]
pub struct StealthMetaAddress {
    spending_key: Point,
    viewing_key: Point,
    chain: String,
    view_tags: bool,
    label: Option<String>,
}

impl StealthMetaAddress {
    /// Build a meta-address; both keys must be on the same curve
    pub fn new(spending_key: Point, viewing_key: Point, chain: &str) -> Result<Self> {
        if spending_key.curve() != viewing_key.curve() {
            return Err(Error::InvalidMetaAddress(format!(
                "spending key is {} but viewing key is {}",
                spending_key.curve(),
                viewing_key.curve()
            )));
        }
        if spending_key.is_identity() || viewing_key.is_identity() {
            return Err(Error::InvalidMetaAddress("identity public key".into()));
        }
        validate_chain(chain)?;

        Ok(Self {
            spending_key,
            viewing_key,
            chain: chain.to_string(),
            view_tags: true,
            label: None,
        })
    }

    /// Opt in or out of publishing view tags for payments to this address
    pub fn with_view_tags(mut self, enabled: bool) -> Self {
        self.view_tags = enabled;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn curve(&self) -> Curve {
        self.spending_key.curve()
    }

    pub fn spending_key(&self) -> &Point {
        &self.spending_key
    }

    pub fn viewing_key(&self) -> &Point {
        &self.viewing_key
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// Whether senders publish a 1-byte view tag
    ///
    /// Tags let scanners skip ~255/256 of non-matching candidates before the
    /// full check, at the cost of leaking one byte of SHA-256(S) per payment.
    pub fn view_tags(&self) -> bool {
        self.view_tags
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Chain identifiers are non-empty lowercase ASCII words
fn validate_chain(chain: &str) -> Result<()> {
    let valid = !chain.is_empty()
        && chain
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
    if !valid {
        return Err(Error::InvalidMetaAddress(format!("invalid chain identifier: {:?}", chain)));
    }
    Ok(())
}

fn parse_key(hex_str: &str, role: &str) -> Result<Vec<u8>> {
    let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(digits).map_err(|_| Error::InvalidMetaAddress(format!("{} key is not valid hex", role)))
}

impl fmt::Display for StealthMetaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            META_ADDRESS_PREFIX,
            self.chain,
            self.spending_key.to_hex(),
            self.viewing_key.to_hex()
        )
    }
}

impl fmt::Debug for StealthMetaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StealthMetaAddress")
            .field("address", &self.to_string())
            .field("view_tags", &self.view_tags)
            .field("label", &self.label)
            .finish()
    }
}

impl FromStr for StealthMetaAddress {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(':').collect();
        let [prefix, chain, spending_hex, viewing_hex] = parts[..] else {
            return Err(Error::InvalidMetaAddress(format!(
                "expected 4 ':'-separated fields, got {}",
                parts.len()
            )));
        };
        if prefix != META_ADDRESS_PREFIX {
            return Err(Error::InvalidMetaAddress(format!("unknown prefix {:?}", prefix)));
        }

        let spending = parse_key(spending_hex, "spending")?;
        let viewing = parse_key(viewing_hex, "viewing")?;
        if spending.len() != viewing.len() {
            return Err(Error::InvalidMetaAddress("key lengths differ".into()));
        }
        let curve = Curve::from_point_len(spending.len()).ok_or_else(|| {
            Error::InvalidMetaAddress(format!("unsupported key length {}", spending.len()))
        })?;

        let spending_key = curve
            .bytes_to_point(&spending)
            .map_err(|e| Error::InvalidMetaAddress(format!("spending key: {}", e)))?;
        let viewing_key = curve
            .bytes_to_point(&viewing)
            .map_err(|e| Error::InvalidMetaAddress(format!("viewing key: {}", e)))?;

        Self::new(spending_key, viewing_key, chain)
    }
}

// ============================================================================
// Recipient Keys
// ============================================================================

/// Complete stealth key set for a recipient
///
/// Security:
/// - Secret keys are wiped on drop
/// - Clone is NOT derived to prevent accidental copies
pub struct StealthKeys {
    spending_secret: SecretScalar,
    viewing_secret: SecretScalar,
    spending_key: Point,
    viewing_key: Point,
}

impl StealthKeys {
    /// Generate new random stealth keys from OS entropy
    pub fn generate(curve: Curve) -> Self {
        Self::from_secret_scalars(SecretScalar::generate(curve), SecretScalar::generate(curve))
    }

    fn from_secret_scalars(spending_secret: SecretScalar, viewing_secret: SecretScalar) -> Self {
        let spending_key = spending_secret.public_point();
        let viewing_key = viewing_secret.public_point();
        Self {
            spending_secret,
            viewing_secret,
            spending_key,
            viewing_key,
        }
    }

    /// Reconstruct keys from stored secrets (canonical, non-zero scalars)
    pub fn from_secrets(curve: Curve, spending_secret: &[u8], viewing_secret: &[u8]) -> Result<Self> {
        Ok(Self::from_secret_scalars(
            SecretScalar::from_private_key_bytes(curve, spending_secret)?,
            SecretScalar::from_private_key_bytes(curve, viewing_secret)?,
        ))
    }

    /// Derive keys from a BIP-39 mnemonic phrase
    ///
    /// Derivation:
    /// - spending_secret = SHA-512("sip/spending" || seed) mod order
    /// - viewing_secret = SHA-512("sip/viewing" || seed) mod order
    pub fn from_mnemonic(curve: Curve, phrase: &str, passphrase: &str) -> Result<Self> {
        let mnemonic: Zeroizing<Mnemonic> = phrase
            .parse()
            .map(Zeroizing::new)
            .map_err(|_| Error::InvalidEncoding("invalid BIP-39 mnemonic"))?;

        let mut seed = mnemonic.to_seed(passphrase);
        let spending = curve.hash_to_scalar(SPENDING_LABEL, &seed);
        let viewing = curve.hash_to_scalar(VIEWING_LABEL, &seed);
        seed.zeroize();

        if spending.is_zero() || viewing.is_zero() {
            return Err(Error::DegenerateKey);
        }

        Ok(Self::from_secret_scalars(
            SecretScalar::from_scalar(&spending),
            SecretScalar::from_scalar(&viewing),
        ))
    }

    /// Generate a fresh 24-word mnemonic and derive keys from it
    pub fn generate_with_mnemonic(curve: Curve) -> Result<(Self, Zeroizing<String>)> {
        let mut entropy = [0u8; 32];
        OsRng.fill_bytes(&mut entropy);
        let mnemonic = Mnemonic::from_entropy(&entropy);
        entropy.zeroize();

        let mnemonic = Zeroizing::new(
            mnemonic.map_err(|_| Error::InvalidEncoding("mnemonic entropy rejected"))?,
        );
        let phrase = Zeroizing::new(mnemonic.to_string());
        let keys = Self::from_mnemonic(curve, &phrase, "")?;
        Ok((keys, phrase))
    }

    pub fn curve(&self) -> Curve {
        self.spending_key.curve()
    }

    /// Spending public key SK = sk·G
    pub fn spending_key(&self) -> &Point {
        &self.spending_key
    }

    /// Viewing public key VK = vk·G
    pub fn viewing_key(&self) -> &Point {
        &self.viewing_key
    }

    pub fn spending_secret(&self) -> &SecretScalar {
        &self.spending_secret
    }

    pub fn viewing_secret(&self) -> &SecretScalar {
        &self.viewing_secret
    }

    /// The public meta-address for these keys
    pub fn meta_address(&self, chain: &str) -> Result<StealthMetaAddress> {
        StealthMetaAddress::new(self.spending_key, self.viewing_key, chain)
    }
}

impl fmt::Debug for StealthKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StealthKeys")
            .field("spending_key", &self.spending_key.to_hex())
            .field("viewing_key", &self.viewing_key.to_hex())
            .finish_non_exhaustive()
    }
}

/// Generate recipient keys and their meta-address for `chain`
pub fn generate_meta_address(curve: Curve, chain: &str) -> Result<(StealthMetaAddress, StealthKeys)> {
    let keys = StealthKeys::generate(curve);
    let meta = keys.meta_address(chain)?;
    tracing::debug!(%curve, chain, "generated stealth meta-address");
    Ok((meta, keys))
}
