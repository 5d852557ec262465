//! Secure secret handling
//!
//! Every buffer holding a private scalar, symmetric key, shared secret or
//! decrypted plaintext lives in one of these wrappers. Teardown overwrites the
//! bytes twice: a pass of OS randomness, then a volatile zero pass through
//! `zeroize`, so the wipe runs on every exit path including `?` early returns.
//!
//! Security:
//! - Debug output is redacted; secrets never reach logs or error messages
//! - Comparisons are constant-time
//! - Raw bytes are only reachable through explicitly named accessors

use std::fmt;

use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::curve::{Curve, Point, Scalar, SCALAR_LEN};
use crate::error::{Error, Result};

/// Overwrite with randomness, then zeros
pub(crate) fn wipe(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
    buf.zeroize();
}

/// Constant-time byte comparison; lengths are not secret
pub(crate) fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

// ============================================================================
// Fixed-Size Secrets
// ============================================================================

/// A fixed-size secret buffer (symmetric keys, shared-secret hashes)
pub struct SecretBytes<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> SecretBytes<N> {
    /// Take ownership of the bytes; the caller's copy should be wiped
    pub fn new(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    /// Fill from the OS CSPRNG
    pub fn random() -> Self {
        let mut bytes = [0u8; N];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Get the raw bytes (use carefully)
    pub fn expose(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Fill in place, e.g. as a digest output buffer
    pub(crate) fn expose_mut(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }
}

impl<const N: usize> Clone for SecretBytes<N> {
    fn clone(&self) -> Self {
        Self { bytes: self.bytes }
    }
}

impl<const N: usize> PartialEq for SecretBytes<N> {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.bytes, &other.bytes)
    }
}

impl<const N: usize> Eq for SecretBytes<N> {}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{}>([REDACTED])", N)
    }
}

impl<const N: usize> Drop for SecretBytes<N> {
    fn drop(&mut self) {
        wipe(&mut self.bytes);
    }
}

// ============================================================================
// Variable-Size Secrets
// ============================================================================

/// A heap secret buffer (decrypted plaintext, serialized key material)
pub struct SecretBuffer {
    bytes: Vec<u8>,
}

impl SecretBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Copy a slice into a new secret buffer
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for SecretBuffer {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.bytes, &other.bytes)
    }
}

impl Eq for SecretBuffer {}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuffer({} bytes, [REDACTED])", self.bytes.len())
    }
}

impl Drop for SecretBuffer {
    fn drop(&mut self) {
        // Spare capacity may hold bytes from earlier reallocations
        let capacity = self.bytes.capacity();
        self.bytes.resize(capacity, 0);
        wipe(&mut self.bytes);
    }
}

// ============================================================================
// Secret Scalars
// ============================================================================

/// A private scalar that wipes its contents on drop
///
/// Stores the canonical encoding rather than the library scalar type so the
/// two-pass wipe covers the actual bytes, not just a copy.
#[derive(Clone)]
pub struct SecretScalar {
    curve: Curve,
    bytes: SecretBytes<SCALAR_LEN>,
}

impl SecretScalar {
    /// Sample a fresh non-zero scalar from OS entropy
    pub fn generate(curve: Curve) -> Self {
        Self::from_scalar(&curve.random_nonzero_scalar())
    }

    /// Wrap an existing scalar
    pub fn from_scalar(scalar: &Scalar) -> Self {
        Self {
            curve: scalar.curve(),
            bytes: SecretBytes::new(scalar.to_bytes()),
        }
    }

    /// Decode a canonical scalar encoding
    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<Self> {
        let scalar = curve.bytes_to_scalar(bytes)?;
        Ok(Self::from_scalar(&scalar))
    }

    /// Decode a canonical, non-zero private key encoding
    pub fn from_private_key_bytes(curve: Curve, bytes: &[u8]) -> Result<Self> {
        let secret = Self::from_bytes(curve, bytes)?;
        if secret.expose().is_zero() {
            return Err(Error::DegenerateKey);
        }
        Ok(secret)
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Get as an arithmetic scalar (zeroized when the copy drops)
    pub fn expose(&self) -> Scalar {
        match self.curve.bytes_to_scalar(self.bytes.expose()) {
            Ok(scalar) => scalar,
            // Bytes were produced by `Scalar::to_bytes`, so they are canonical
            Err(_) => unreachable!("SecretScalar holds a canonical encoding"),
        }
    }

    /// Get the raw bytes (use carefully)
    pub fn expose_bytes(&self) -> &[u8; SCALAR_LEN] {
        self.bytes.expose()
    }

    /// The public point k·G
    pub fn public_point(&self) -> Point {
        self.expose().mul_base()
    }
}

impl PartialEq for SecretScalar {
    fn eq(&self, other: &Self) -> bool {
        self.curve == other.curve && self.bytes == other.bytes
    }
}

impl Eq for SecretScalar {}

impl fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretScalar({}, [REDACTED])", self.curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wipe_clears_buffer() {
        let mut buf = [0x42u8; 64];
        wipe(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SecretScalar::from_scalar(&Curve::Secp256k1.scalar_from_u128(7));
        let rendered = format!("{:?}", secret);
        assert_eq!(rendered, "SecretScalar(secp256k1, [REDACTED])");

        let buffer = SecretBuffer::from_slice(b"invoice#42");
        assert_eq!(format!("{:?}", buffer), "SecretBuffer(10 bytes, [REDACTED])");

        let key = SecretBytes::new([9u8; 32]);
        assert!(!format!("{:?}", key).contains('9'));
    }

    #[test]
    fn test_secret_scalar_roundtrip() {
        for curve in [Curve::Secp256k1, Curve::Ed25519] {
            let secret = SecretScalar::generate(curve);
            let decoded = SecretScalar::from_bytes(curve, secret.expose_bytes()).unwrap();
            assert_eq!(secret, decoded);
            assert_eq!(secret.public_point(), decoded.public_point());
        }
    }

    #[test]
    fn test_private_key_rejects_zero() {
        let zero = [0u8; 32];
        assert_eq!(
            SecretScalar::from_private_key_bytes(Curve::Ed25519, &zero),
            Err(Error::DegenerateKey)
        );
    }

    #[test]
    fn test_secret_bytes_constant_time_eq() {
        let a = SecretBytes::new([1u8; 32]);
        let b = SecretBytes::new([1u8; 32]);
        let c = SecretBytes::new([2u8; 32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!ct_eq(b"short", b"longer"));
    }
}
