//! Authenticated encryption to a viewing public key
//!
//! Per message:
//! 1. Ephemeral e, E = e·G
//! 2. key = SHA-256("SIP-VIEWING-KDF-v1" || e·VK || E || VK)
//! 3. XChaCha20-Poly1305 under a fresh random 24-byte nonce, with E as
//!    associated data
//!
//! Nonces are always generated here and never accepted from callers.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    Key, XChaCha20Poly1305, XNonce,
};
use rand::{rngs::OsRng, RngCore};
use sha2::{digest::Output, Digest, Sha256};

use crate::curve::{Curve, Point};
use crate::error::{DecryptError, Error, Result};
use crate::secret::{SecretBuffer, SecretBytes, SecretScalar};

/// KDF label; bumping it is a breaking protocol change
pub const VIEWING_KDF_DOMAIN: &[u8] = b"SIP-VIEWING-KDF-v1";

pub const NONCE_LEN: usize = 24;
pub const TAG_LEN: usize = 16;

/// Largest plaintext accepted for encryption (1 MiB)
pub const MAX_PLAINTEXT_LEN: usize = 1 << 20;

const CURVE_TAG_SECP256K1: u8 = 0x01;
const CURVE_TAG_ED25519: u8 = 0x02;

/// Confidential metadata for a viewing-key holder
///
/// `body` bytes are `nonce || ciphertext || tag`; the full envelope prefixes a
/// curve tag and the ephemeral public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedPayload {
    ephemeral_public_key: Point,
    nonce: [u8; NONCE_LEN],
    /// Ciphertext with the Poly1305 tag appended
    ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    pub fn curve(&self) -> Curve {
        self.ephemeral_public_key.curve()
    }

    pub fn ephemeral_public_key(&self) -> &Point {
        &self.ephemeral_public_key
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext followed by the 16-byte tag
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// `nonce || ciphertext || tag`
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Reassemble from a transmitted ephemeral key and body
    pub fn from_parts(ephemeral_public_key: Point, body: &[u8]) -> Result<Self> {
        if body.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::InvalidEncoding("encrypted payload shorter than nonce and tag"));
        }
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&body[..NONCE_LEN]);
        Ok(Self {
            ephemeral_public_key,
            nonce,
            ciphertext: body[NONCE_LEN..].to_vec(),
        })
    }

    /// `curve_tag || ephemeral_public_key || nonce || ciphertext || tag`
    pub fn to_bytes(&self) -> Vec<u8> {
        let tag = match self.curve() {
            Curve::Secp256k1 => CURVE_TAG_SECP256K1,
            Curve::Ed25519 => CURVE_TAG_ED25519,
        };
        let mut out = vec![tag];
        out.extend_from_slice(&self.ephemeral_public_key.to_compressed());
        out.extend_from_slice(&self.body_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&tag, rest) = bytes
            .split_first()
            .ok_or(Error::InvalidEncoding("empty encrypted payload"))?;
        let curve = match tag {
            CURVE_TAG_SECP256K1 => Curve::Secp256k1,
            CURVE_TAG_ED25519 => Curve::Ed25519,
            _ => return Err(Error::InvalidEncoding("unknown payload curve tag")),
        };
        if rest.len() < curve.point_len() {
            return Err(Error::InvalidEncoding("truncated ephemeral public key"));
        }
        let (ephemeral, body) = rest.split_at(curve.point_len());
        Self::from_parts(curve.bytes_to_point(ephemeral)?, body)
    }
}

/// Per-message symmetric key
fn derive_key(shared: &Point, ephemeral_public_key: &Point, viewing_public_key: &Point) -> SecretBytes<32> {
    let shared_bytes = SecretBuffer::new(shared.to_compressed());

    let mut hasher = Sha256::new();
    hasher.update(VIEWING_KDF_DOMAIN);
    hasher.update(shared_bytes.as_bytes());
    hasher.update(ephemeral_public_key.to_compressed());
    hasher.update(viewing_public_key.to_compressed());

    let mut key = SecretBytes::new([0u8; 32]);
    hasher.finalize_into(Output::<Sha256>::from_mut_slice(key.expose_mut()));
    key
}

/// Encrypt `plaintext` so only the holder of the viewing private key can read it
pub fn encrypt_for_viewing(plaintext: &[u8], viewing_public_key: &Point) -> Result<EncryptedPayload> {
    if plaintext.len() > MAX_PLAINTEXT_LEN {
        return Err(Error::ValueOutOfRange {
            value: plaintext.len() as u128,
            max: MAX_PLAINTEXT_LEN as u128,
        });
    }
    if viewing_public_key.is_identity() {
        return Err(Error::DegenerateKey);
    }

    let curve = viewing_public_key.curve();
    let ephemeral = SecretScalar::generate(curve);
    let ephemeral_public_key = ephemeral.public_point();

    let shared = viewing_public_key.mul(&ephemeral.expose())?;
    if shared.is_identity() {
        return Err(Error::DegenerateKey);
    }
    let key = derive_key(&shared, &ephemeral_public_key, viewing_public_key);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let aad = ephemeral_public_key.to_compressed();
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.expose()));
    let ciphertext = cipher
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|_| Error::InvalidEncoding("AEAD encryption failed"))?;

    tracing::trace!(%curve, len = plaintext.len(), "encrypted payload for viewing key");
    Ok(EncryptedPayload {
        ephemeral_public_key,
        nonce,
        ciphertext,
    })
}

/// Decrypt a payload with the viewing private key
///
/// Every failure (wrong key, wrong curve, tampered bytes) is the same opaque
/// [`DecryptError`]; no partial plaintext is ever returned.
pub fn decrypt_with_viewing(
    payload: &EncryptedPayload,
    viewing_private_key: &SecretScalar,
) -> std::result::Result<SecretBuffer, DecryptError> {
    if payload.curve() != viewing_private_key.curve() {
        return Err(DecryptError);
    }

    let vk = viewing_private_key.expose();
    let viewing_public_key = vk.mul_base();
    let shared = payload.ephemeral_public_key.mul(&vk).map_err(|_| DecryptError)?;
    if shared.is_identity() {
        return Err(DecryptError);
    }
    let key = derive_key(&shared, &payload.ephemeral_public_key, &viewing_public_key);

    let aad = payload.ephemeral_public_key.to_compressed();
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.expose()));
    let plaintext = cipher
        .decrypt(
            XNonce::from_slice(&payload.nonce),
            Payload {
                msg: &payload.ciphertext,
                aad: &aad,
            },
        )
        .map_err(|_| {
            tracing::debug!(curve = %payload.curve(), "viewing payload failed authentication");
            DecryptError
        })?;

    Ok(SecretBuffer::new(plaintext))
}
