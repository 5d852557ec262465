//! Chain address encoders
//!
//! Turning a one-time public key into an address is the only chain-specific
//! step in stealth derivation. Callers inject an [`AddressEncoder`]; the
//! engine itself never branches on chain names.

use blake2b_simd::Params;
use sha3::{Digest, Keccak256, Sha3_256};

use crate::curve::{Curve, Point};
use crate::error::{Error, Result};

/// Sui signature-scheme flag for ed25519
const SUI_ED25519_FLAG: u8 = 0x00;

/// Aptos single-key ed25519 authentication scheme
const APTOS_ED25519_SCHEME: u8 = 0x00;

/// Maps a one-time public key to a chain address string
pub trait AddressEncoder: Send + Sync {
    /// Curve the chain's keys live on
    fn curve(&self) -> Curve;

    /// Encode `public_key`; keys on the wrong curve fail with `CurveMismatch`
    fn encode(&self, public_key: &Point) -> Result<String>;
}

fn require_curve(expected: Curve, public_key: &Point) -> Result<()> {
    if public_key.curve() != expected {
        return Err(Error::CurveMismatch {
            expected,
            found: public_key.curve(),
        });
    }
    Ok(())
}

/// EIP-55 mixed-case checksum of a 20-byte address
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (4 * (1 - i % 2))) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Ethereum and EVM chains: last 20 bytes of Keccak-256(uncompressed x || y)
#[derive(Clone, Copy, Debug, Default)]
pub struct EthereumEncoder;

impl AddressEncoder for EthereumEncoder {
    fn curve(&self) -> Curve {
        Curve::Secp256k1
    }

    fn encode(&self, public_key: &Point) -> Result<String> {
        require_curve(Curve::Secp256k1, public_key)?;
        let uncompressed = public_key.to_bytes(false);
        let hash = Keccak256::digest(&uncompressed[1..]);

        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Ok(to_checksum_address(&address))
    }
}

/// Solana: base58 of the 32-byte ed25519 key
#[derive(Clone, Copy, Debug, Default)]
pub struct SolanaEncoder;

impl AddressEncoder for SolanaEncoder {
    fn curve(&self) -> Curve {
        Curve::Ed25519
    }

    fn encode(&self, public_key: &Point) -> Result<String> {
        require_curve(Curve::Ed25519, public_key)?;
        Ok(bs58::encode(public_key.to_compressed()).into_string())
    }
}

/// NEAR implicit account: lowercase hex of the ed25519 key
#[derive(Clone, Copy, Debug, Default)]
pub struct NearEncoder;

impl AddressEncoder for NearEncoder {
    fn curve(&self) -> Curve {
        Curve::Ed25519
    }

    fn encode(&self, public_key: &Point) -> Result<String> {
        require_curve(Curve::Ed25519, public_key)?;
        Ok(hex::encode(public_key.to_compressed()))
    }
}

/// Sui: BLAKE2b-256(flag || key)
#[derive(Clone, Copy, Debug, Default)]
pub struct SuiEncoder;

impl AddressEncoder for SuiEncoder {
    fn curve(&self) -> Curve {
        Curve::Ed25519
    }

    fn encode(&self, public_key: &Point) -> Result<String> {
        require_curve(Curve::Ed25519, public_key)?;
        let hash = Params::new()
            .hash_length(32)
            .to_state()
            .update(&[SUI_ED25519_FLAG])
            .update(&public_key.to_compressed())
            .finalize();
        Ok(format!("0x{}", hash.to_hex()))
    }
}

/// Aptos: SHA3-256(key || scheme)
#[derive(Clone, Copy, Debug, Default)]
pub struct AptosEncoder;

impl AddressEncoder for AptosEncoder {
    fn curve(&self) -> Curve {
        Curve::Ed25519
    }

    fn encode(&self, public_key: &Point) -> Result<String> {
        require_curve(Curve::Ed25519, public_key)?;
        let mut hasher = Sha3_256::new();
        hasher.update(public_key.to_compressed());
        hasher.update([APTOS_ED25519_SCHEME]);
        Ok(format!("0x{}", hex::encode(hasher.finalize())))
    }
}

/// Compressed point hex, for chains that address by raw public key
#[derive(Clone, Copy, Debug)]
pub struct RawEncoder {
    pub curve: Curve,
}

impl AddressEncoder for RawEncoder {
    fn curve(&self) -> Curve {
        self.curve
    }

    fn encode(&self, public_key: &Point) -> Result<String> {
        require_curve(self.curve, public_key)?;
        Ok(public_key.to_hex())
    }
}

/// Default encoder for a well-known chain identifier
pub fn encoder_for_chain(chain: &str) -> Option<Box<dyn AddressEncoder>> {
    let encoder: Box<dyn AddressEncoder> = match chain {
        "ethereum" | "polygon" | "arbitrum" | "optimism" | "base" | "bsc" | "avalanche" => {
            Box::new(EthereumEncoder)
        }
        "solana" => Box::new(SolanaEncoder),
        "near" => Box::new(NearEncoder),
        "sui" => Box::new(SuiEncoder),
        "aptos" => Box::new(AptosEncoder),
        _ => return None,
    };
    Some(encoder)
}
