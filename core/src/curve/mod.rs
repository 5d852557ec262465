//! Curve abstraction layer
//!
//! Uniform scalar/point arithmetic over secp256k1 and ed25519. Every other
//! module is curve-generic and selects a curve through the closed [`Curve`]
//! enum; the per-curve arithmetic lives behind [`CurveBackend`], implemented
//! once for `k256` and once for `curve25519-dalek`.
//!
//! Encodings:
//! - secp256k1 points: SEC1, 33 bytes compressed (0x02/0x03) or 65 uncompressed
//! - ed25519 points: 32-byte compressed Edwards Y, prime-order subgroup only
//! - scalars: 32 bytes, canonical (< group order), big-endian for secp256k1
//!   and little-endian for ed25519 (each curve's native convention)
//!
//! Decoding never wraps: out-of-range scalars, off-curve points, identity
//! and (on ed25519) torsion components are rejected with `InvalidEncoding`.

mod ed25519;
mod secp256k1;

pub(crate) use ed25519::Ed25519Backend;
pub(crate) use secp256k1::Secp256k1Backend;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{digest::Output, Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::secret::SecretBytes;

/// Domain separator used by [`hash_to_scalar`] when callers do not supply one
pub const SCALAR_HASH_DOMAIN: &[u8] = b"SIP-HASH-TO-SCALAR-v1";

/// Length of an encoded scalar on either curve
pub const SCALAR_LEN: usize = 32;

// ============================================================================
// Curve Selection
// ============================================================================

/// Supported curves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    /// secp256k1 (EVM chains, Bitcoin, Zcash transparent)
    Secp256k1,
    /// ed25519 (Solana, NEAR, Sui, Aptos)
    Ed25519,
}

impl Curve {
    /// Length of a compressed point encoding
    pub const fn point_len(self) -> usize {
        match self {
            Curve::Secp256k1 => 33,
            Curve::Ed25519 => 32,
        }
    }

    /// Length of an encoded scalar
    pub const fn scalar_len(self) -> usize {
        SCALAR_LEN
    }

    /// Lowercase curve name
    pub const fn name(self) -> &'static str {
        match self {
            Curve::Secp256k1 => "secp256k1",
            Curve::Ed25519 => "ed25519",
        }
    }

    /// Infer the curve from a compressed public key length
    pub fn from_point_len(len: usize) -> Option<Self> {
        match len {
            33 => Some(Curve::Secp256k1),
            32 => Some(Curve::Ed25519),
            _ => None,
        }
    }

    /// The standard base point G
    pub fn generator(self) -> Point {
        match self {
            Curve::Secp256k1 => Point::Secp256k1(Secp256k1Backend::generator()),
            Curve::Ed25519 => Point::Ed25519(Ed25519Backend::generator()),
        }
    }

    /// The group identity
    pub fn identity(self) -> Point {
        match self {
            Curve::Secp256k1 => Point::Secp256k1(Secp256k1Backend::identity()),
            Curve::Ed25519 => Point::Ed25519(Ed25519Backend::identity()),
        }
    }

    /// The additive identity scalar
    pub fn zero_scalar(self) -> Scalar {
        self.scalar_from_u128(0)
    }

    /// Uniform scalar from the OS CSPRNG (64 bytes reduced mod the group order)
    pub fn random_scalar(self) -> Scalar {
        match self {
            Curve::Secp256k1 => Scalar::Secp256k1(random_scalar::<Secp256k1Backend>()),
            Curve::Ed25519 => Scalar::Ed25519(random_scalar::<Ed25519Backend>()),
        }
    }

    /// Uniform non-zero scalar; resamples on the negligible zero draw
    pub fn random_nonzero_scalar(self) -> Scalar {
        loop {
            let scalar = self.random_scalar();
            if !scalar.is_zero() {
                return scalar;
            }
        }
    }

    /// Domain-separated hash to a scalar: SHA-512(domain || data) mod order
    pub fn hash_to_scalar(self, domain: &[u8], data: &[u8]) -> Scalar {
        match self {
            Curve::Secp256k1 => Scalar::Secp256k1(hash_to_scalar_with::<Secp256k1Backend>(domain, data)),
            Curve::Ed25519 => Scalar::Ed25519(hash_to_scalar_with::<Ed25519Backend>(domain, data)),
        }
    }

    /// Embed a small integer as a scalar
    pub fn scalar_from_u128(self, value: u128) -> Scalar {
        match self {
            Curve::Secp256k1 => Scalar::Secp256k1(Secp256k1Backend::scalar_from_u128(value)),
            Curve::Ed25519 => Scalar::Ed25519(Ed25519Backend::scalar_from_u128(value)),
        }
    }

    /// Nothing-up-my-sleeve generator derived from `domain` by try-and-increment
    pub fn nums_generator(self, domain: &[u8]) -> Option<Point> {
        match self {
            Curve::Secp256k1 => nums_generator::<Secp256k1Backend>(domain).map(Point::Secp256k1),
            Curve::Ed25519 => nums_generator::<Ed25519Backend>(domain).map(Point::Ed25519),
        }
    }

    /// Decode a canonical 32-byte scalar
    pub fn bytes_to_scalar(self, bytes: &[u8]) -> Result<Scalar> {
        let array: [u8; SCALAR_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidEncoding("scalar must be 32 bytes"))?;
        let scalar = match self {
            Curve::Secp256k1 => Secp256k1Backend::scalar_from_canonical(&array).map(Scalar::Secp256k1),
            Curve::Ed25519 => Ed25519Backend::scalar_from_canonical(&array).map(Scalar::Ed25519),
        };
        scalar.ok_or(Error::InvalidEncoding("scalar not below group order"))
    }

    /// Decode a point, rejecting off-curve, identity and non-canonical input
    pub fn bytes_to_point(self, bytes: &[u8]) -> Result<Point> {
        match self {
            Curve::Secp256k1 => Secp256k1Backend::decode_point(bytes).map(Point::Secp256k1),
            Curve::Ed25519 => Ed25519Backend::decode_point(bytes).map(Point::Ed25519),
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(Curve::Secp256k1),
            "ed25519" => Ok(Curve::Ed25519),
            _ => Err(Error::InvalidEncoding("unknown curve name")),
        }
    }
}

// ============================================================================
// Backend Interface
// ============================================================================

/// Per-curve arithmetic, delegated to constant-time library primitives
pub(crate) trait CurveBackend {
    type Scalar: Copy + Zeroize;
    type Point: Copy;

    const CURVE: Curve;

    fn generator() -> Self::Point;
    fn identity() -> Self::Point;
    fn mul(point: &Self::Point, scalar: &Self::Scalar) -> Self::Point;
    fn mul_base(scalar: &Self::Scalar) -> Self::Point;
    fn add(a: &Self::Point, b: &Self::Point) -> Self::Point;
    fn sub(a: &Self::Point, b: &Self::Point) -> Self::Point;
    fn is_identity(point: &Self::Point) -> bool;
    fn encode_point(point: &Self::Point, compressed: bool) -> Vec<u8>;
    fn decode_point(bytes: &[u8]) -> Result<Self::Point>;

    /// Map 32 hash bytes to a prime-order point, if they encode one
    fn candidate_point(bytes: &[u8; 32]) -> Option<Self::Point>;

    fn scalar_to_bytes(scalar: &Self::Scalar) -> [u8; SCALAR_LEN];
    fn scalar_from_canonical(bytes: &[u8; SCALAR_LEN]) -> Option<Self::Scalar>;
    fn scalar_from_wide(bytes: &[u8; 64]) -> Self::Scalar;
    fn scalar_from_u128(value: u128) -> Self::Scalar;
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn scalar_mul(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;
    fn scalar_neg(a: &Self::Scalar) -> Self::Scalar;
    fn scalar_invert(a: &Self::Scalar) -> Option<Self::Scalar>;
    fn scalar_is_zero(a: &Self::Scalar) -> bool;
}

/// Generate a uniform scalar using OS entropy
fn random_scalar<B: CurveBackend>() -> B::Scalar {
    let wide = SecretBytes::<64>::random();
    B::scalar_from_wide(wide.expose())
}

/// Hash to scalar with a domain separator and wide reduction
///
/// The digest lands directly in a buffer that is wiped on drop.
fn hash_to_scalar_with<B: CurveBackend>(domain: &[u8], data: &[u8]) -> B::Scalar {
    let mut hasher = Sha512::new();
    hasher.update(domain);
    hasher.update(data);
    let mut wide = SecretBytes::new([0u8; 64]);
    hasher.finalize_into(Output::<Sha512>::from_mut_slice(wide.expose_mut()));
    B::scalar_from_wide(wide.expose())
}

/// Random pass, then a volatile zero pass
fn scrub<B: CurveBackend>(scalar: &mut B::Scalar) {
    let mut noise = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut noise);
    *scalar = B::scalar_from_wide(&noise);
    std::hint::black_box(&*scalar);
    noise.zeroize();
    scalar.zeroize();
}

/// Nothing-up-my-sleeve generator search
///
/// candidate_i = SHA-256(domain || encode(G) || i) for i in 0..=255, taking the
/// first candidate that maps to a non-identity prime-order point distinct from G.
pub(crate) fn nums_generator<B: CurveBackend>(domain: &[u8]) -> Option<B::Point> {
    let g_bytes = B::encode_point(&B::generator(), true);

    for counter in 0..=u8::MAX {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        hasher.update(&g_bytes);
        hasher.update([counter]);
        let mut candidate = [0u8; 32];
        candidate.copy_from_slice(&hasher.finalize());

        if let Some(point) = B::candidate_point(&candidate) {
            if B::encode_point(&point, true) != g_bytes {
                tracing::trace!(curve = %B::CURVE, counter, "NUMS generator candidate accepted");
                return Some(point);
            }
        }
    }

    tracing::warn!(curve = %B::CURVE, "NUMS generator search exhausted");
    None
}

// ============================================================================
// Curve-Tagged Scalars
// ============================================================================

/// A scalar tagged with its curve
///
/// Dropping a scalar overwrites it with a random value, then zeroizes it.
/// Long-lived secrets should still be held in [`crate::secret::SecretScalar`].
#[derive(Clone)]
pub enum Scalar {
    Secp256k1(k256::Scalar),
    Ed25519(curve25519_dalek::scalar::Scalar),
}

macro_rules! scalar_binop {
    ($a:expr, $b:expr, $op:ident) => {
        match ($a, $b) {
            (Scalar::Secp256k1(x), Scalar::Secp256k1(y)) => {
                Ok(Scalar::Secp256k1(Secp256k1Backend::$op(x, y)))
            }
            (Scalar::Ed25519(x), Scalar::Ed25519(y)) => Ok(Scalar::Ed25519(Ed25519Backend::$op(x, y))),
            (x, y) => Err(Error::CurveMismatch {
                expected: x.curve(),
                found: y.curve(),
            }),
        }
    };
}

impl Scalar {
    /// Curve this scalar belongs to
    pub fn curve(&self) -> Curve {
        match self {
            Scalar::Secp256k1(_) => Curve::Secp256k1,
            Scalar::Ed25519(_) => Curve::Ed25519,
        }
    }

    /// Canonical 32-byte encoding
    pub fn to_bytes(&self) -> [u8; SCALAR_LEN] {
        match self {
            Scalar::Secp256k1(s) => Secp256k1Backend::scalar_to_bytes(s),
            Scalar::Ed25519(s) => Ed25519Backend::scalar_to_bytes(s),
        }
    }

    pub fn add(&self, other: &Scalar) -> Result<Scalar> {
        scalar_binop!(self, other, scalar_add)
    }

    pub fn sub(&self, other: &Scalar) -> Result<Scalar> {
        scalar_binop!(self, other, scalar_sub)
    }

    pub fn mul(&self, other: &Scalar) -> Result<Scalar> {
        scalar_binop!(self, other, scalar_mul)
    }

    pub fn neg(&self) -> Scalar {
        match self {
            Scalar::Secp256k1(s) => Scalar::Secp256k1(Secp256k1Backend::scalar_neg(s)),
            Scalar::Ed25519(s) => Scalar::Ed25519(Ed25519Backend::scalar_neg(s)),
        }
    }

    /// Multiplicative inverse; zero has none
    pub fn invert(&self) -> Result<Scalar> {
        let inverted = match self {
            Scalar::Secp256k1(s) => Secp256k1Backend::scalar_invert(s).map(Scalar::Secp256k1),
            Scalar::Ed25519(s) => Ed25519Backend::scalar_invert(s).map(Scalar::Ed25519),
        };
        inverted.ok_or(Error::DegenerateKey)
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Secp256k1(s) => Secp256k1Backend::scalar_is_zero(s),
            Scalar::Ed25519(s) => Ed25519Backend::scalar_is_zero(s),
        }
    }

    /// Public point k·G
    pub fn mul_base(&self) -> Point {
        match self {
            Scalar::Secp256k1(s) => Point::Secp256k1(Secp256k1Backend::mul_base(s)),
            Scalar::Ed25519(s) => Point::Ed25519(Ed25519Backend::mul_base(s)),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.curve() == other.curve() && bool::from(self.to_bytes().ct_eq(&other.to_bytes()))
    }
}

impl Eq for Scalar {}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scalar").field(&self.curve()).finish_non_exhaustive()
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        match self {
            Scalar::Secp256k1(s) => scrub::<Secp256k1Backend>(s),
            Scalar::Ed25519(s) => scrub::<Ed25519Backend>(s),
        }
    }
}

// ============================================================================
// Curve-Tagged Points
// ============================================================================

/// A group element tagged with its curve
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Point {
    Secp256k1(k256::ProjectivePoint),
    Ed25519(curve25519_dalek::edwards::EdwardsPoint),
}

macro_rules! point_binop {
    ($a:expr, $b:expr, $op:ident) => {
        match ($a, $b) {
            (Point::Secp256k1(x), Point::Secp256k1(y)) => Ok(Point::Secp256k1(Secp256k1Backend::$op(x, y))),
            (Point::Ed25519(x), Point::Ed25519(y)) => Ok(Point::Ed25519(Ed25519Backend::$op(x, y))),
            (x, y) => Err(Error::CurveMismatch {
                expected: x.curve(),
                found: y.curve(),
            }),
        }
    };
}

impl Point {
    /// Curve this point belongs to
    pub fn curve(&self) -> Curve {
        match self {
            Point::Secp256k1(_) => Curve::Secp256k1,
            Point::Ed25519(_) => Curve::Ed25519,
        }
    }

    /// Encode the point; ed25519 has a single 32-byte form and ignores `compressed`
    pub fn to_bytes(&self, compressed: bool) -> Vec<u8> {
        match self {
            Point::Secp256k1(p) => Secp256k1Backend::encode_point(p, compressed),
            Point::Ed25519(p) => Ed25519Backend::encode_point(p, compressed),
        }
    }

    /// Compressed encoding (33 bytes secp256k1, 32 bytes ed25519)
    pub fn to_compressed(&self) -> Vec<u8> {
        self.to_bytes(true)
    }

    /// `0x`-prefixed hex of the compressed encoding
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_compressed()))
    }

    pub fn add(&self, other: &Point) -> Result<Point> {
        point_binop!(self, other, add)
    }

    pub fn sub(&self, other: &Point) -> Result<Point> {
        point_binop!(self, other, sub)
    }

    /// Scalar multiplication k·P
    pub fn mul(&self, scalar: &Scalar) -> Result<Point> {
        match (self, scalar) {
            (Point::Secp256k1(p), Scalar::Secp256k1(k)) => Ok(Point::Secp256k1(Secp256k1Backend::mul(p, k))),
            (Point::Ed25519(p), Scalar::Ed25519(k)) => Ok(Point::Ed25519(Ed25519Backend::mul(p, k))),
            (p, k) => Err(Error::CurveMismatch {
                expected: p.curve(),
                found: k.curve(),
            }),
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            Point::Secp256k1(p) => Secp256k1Backend::is_identity(p),
            Point::Ed25519(p) => Ed25519Backend::is_identity(p),
        }
    }

    /// Constant-time equality of compressed encodings
    pub fn ct_eq(&self, other: &Point) -> bool {
        self.curve() == other.curve()
            && bool::from(self.to_compressed().as_slice().ct_eq(other.to_compressed().as_slice()))
    }
}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.curve().hash(state);
        self.to_compressed().hash(state);
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.curve(), self.to_hex())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Contract Functions
// ============================================================================

/// k·P
pub fn scalar_mul(point: &Point, scalar: &Scalar) -> Result<Point> {
    point.mul(scalar)
}

/// P + Q
pub fn point_add(p: &Point, q: &Point) -> Result<Point> {
    p.add(q)
}

/// P - Q
pub fn point_sub(p: &Point, q: &Point) -> Result<Point> {
    p.sub(q)
}

/// Encode a point, compressed or (secp256k1 only) uncompressed
pub fn point_to_bytes(point: &Point, compressed: bool) -> Vec<u8> {
    point.to_bytes(compressed)
}

/// Decode a point for the given curve
pub fn bytes_to_point(curve: Curve, bytes: &[u8]) -> Result<Point> {
    curve.bytes_to_point(bytes)
}

/// Decode a canonical scalar for the given curve
pub fn bytes_to_scalar(curve: Curve, bytes: &[u8]) -> Result<Scalar> {
    curve.bytes_to_scalar(bytes)
}

/// Hash arbitrary bytes to a scalar under the default domain
pub fn hash_to_scalar(curve: Curve, bytes: &[u8]) -> Scalar {
    curve.hash_to_scalar(SCALAR_HASH_DOMAIN, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Curve; 2] = [Curve::Secp256k1, Curve::Ed25519];

    #[test]
    fn test_scrub_leaves_zero() {
        let mut s = Secp256k1Backend::scalar_from_u128(42);
        scrub::<Secp256k1Backend>(&mut s);
        assert!(Secp256k1Backend::scalar_is_zero(&s));

        let mut s = Ed25519Backend::scalar_from_u128(42);
        scrub::<Ed25519Backend>(&mut s);
        assert!(Ed25519Backend::scalar_is_zero(&s));
    }

    #[test]
    fn test_hash_to_scalar_matches_plain_digest() {
        // finalize_into a wiped buffer must agree with a plain SHA-512 reduction
        let mut wide = [0u8; 64];
        wide.copy_from_slice(&Sha512::new().chain_update(b"dom").chain_update(b"data").finalize());
        for curve in CURVES {
            let expected = match curve {
                Curve::Secp256k1 => Scalar::Secp256k1(Secp256k1Backend::scalar_from_wide(&wide)),
                Curve::Ed25519 => Scalar::Ed25519(Ed25519Backend::scalar_from_wide(&wide)),
            };
            assert_eq!(curve.hash_to_scalar(b"dom", b"data"), expected);
        }
    }

    #[test]
    fn test_point_roundtrip_both_curves() {
        for curve in CURVES {
            let k = curve.random_nonzero_scalar();
            let p = k.mul_base();
            let bytes = p.to_compressed();
            assert_eq!(bytes.len(), curve.point_len());
            assert_eq!(curve.bytes_to_point(&bytes).unwrap(), p);
        }
    }

    #[test]
    fn test_secp256k1_uncompressed_roundtrip() {
        let p = Curve::Secp256k1.random_nonzero_scalar().mul_base();
        let bytes = point_to_bytes(&p, false);
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 0x04);
        assert_eq!(bytes_to_point(Curve::Secp256k1, &bytes).unwrap(), p);
    }

    #[test]
    fn test_secp256k1_generator_encoding() {
        let g = Curve::Secp256k1.generator().to_compressed();
        assert_eq!(
            hex::encode(g),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn test_ed25519_generator_encoding() {
        let g = Curve::Ed25519.generator().to_compressed();
        assert_eq!(
            hex::encode(g),
            "5866666666666666666666666666666666666666666666666666666666666666"
        );
    }

    #[test]
    fn test_rejects_wrong_lengths() {
        assert!(matches!(
            Curve::Secp256k1.bytes_to_point(&[0x02; 32]),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(matches!(
            Curve::Ed25519.bytes_to_point(&[0x01; 33]),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(matches!(
            Curve::Ed25519.bytes_to_scalar(&[0x01; 31]),
            Err(Error::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_rejects_identity_encodings() {
        // ed25519 identity: y = 1
        let mut identity = [0u8; 32];
        identity[0] = 1;
        assert!(Curve::Ed25519.bytes_to_point(&identity).is_err());
        // secp256k1 identity has a one-byte SEC1 encoding
        assert!(Curve::Secp256k1.bytes_to_point(&[0x00]).is_err());
    }

    #[test]
    fn test_rejects_ed25519_torsion_point() {
        // Point of order 4 (y = 0)
        assert!(Curve::Ed25519.bytes_to_point(&[0u8; 32]).is_err());
        // Point of order 8
        let order8: [u8; 32] = [
            0x26, 0xe8, 0x95, 0x8f, 0xc2, 0xb2, 0x27, 0xb0, 0x45, 0xc3, 0xf4, 0x89, 0xf2, 0xef,
            0x98, 0xf0, 0xd5, 0xdf, 0xac, 0x05, 0xd3, 0xc6, 0x33, 0x39, 0xb1, 0x38, 0x02, 0x88,
            0x6d, 0x53, 0xfc, 0x05,
        ];
        assert!(Curve::Ed25519.bytes_to_point(&order8).is_err());
    }

    #[test]
    fn test_rejects_off_curve_secp256k1() {
        // x = 5 is not on secp256k1 (5^3 + 7 = 132 is a non-residue)
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 5;
        assert!(Curve::Secp256k1.bytes_to_point(&bytes).is_err());
    }

    #[test]
    fn test_rejects_non_canonical_scalars() {
        // 2^256 - 1 exceeds both group orders
        assert!(Curve::Secp256k1.bytes_to_scalar(&[0xff; 32]).is_err());
        assert!(Curve::Ed25519.bytes_to_scalar(&[0xff; 32]).is_err());
    }

    #[test]
    fn test_scalar_bytes_roundtrip() {
        for curve in CURVES {
            let s = curve.random_scalar();
            let decoded = curve.bytes_to_scalar(&s.to_bytes()).unwrap();
            assert_eq!(decoded, s);
        }
    }

    #[test]
    fn test_small_integer_embedding() {
        assert_eq!(Curve::Secp256k1.scalar_from_u128(7).to_bytes()[31], 7);
        assert_eq!(Curve::Ed25519.scalar_from_u128(7).to_bytes()[0], 7);
        for curve in CURVES {
            let three = curve.scalar_from_u128(3);
            let four = curve.scalar_from_u128(4);
            assert_eq!(three.add(&four).unwrap(), curve.scalar_from_u128(7));
            assert_eq!(three.mul(&four).unwrap(), curve.scalar_from_u128(12));
        }
    }

    #[test]
    fn test_scalar_mul_distributes_over_add() {
        for curve in CURVES {
            let a = curve.random_scalar();
            let b = curve.random_scalar();
            let lhs = a.add(&b).unwrap().mul_base();
            let rhs = point_add(&a.mul_base(), &b.mul_base()).unwrap();
            assert_eq!(lhs, rhs);
            assert_eq!(point_sub(&lhs, &b.mul_base()).unwrap(), a.mul_base());
        }
    }

    #[test]
    fn test_invert() {
        for curve in CURVES {
            let a = curve.random_nonzero_scalar();
            let inv = a.invert().unwrap();
            assert_eq!(a.mul(&inv).unwrap(), curve.scalar_from_u128(1));
            assert_eq!(curve.zero_scalar().invert(), Err(Error::DegenerateKey));
        }
    }

    #[test]
    fn test_curve_mismatch_is_typed() {
        let a = Curve::Secp256k1.random_scalar();
        let b = Curve::Ed25519.random_scalar();
        assert!(matches!(a.add(&b), Err(Error::CurveMismatch { .. })));

        let p = Curve::Secp256k1.generator();
        assert!(matches!(scalar_mul(&p, &b), Err(Error::CurveMismatch { .. })));
    }

    #[test]
    fn test_hash_to_scalar_is_deterministic_and_domain_separated() {
        for curve in CURVES {
            let a = hash_to_scalar(curve, b"payload");
            let b = hash_to_scalar(curve, b"payload");
            let c = curve.hash_to_scalar(b"other-domain", b"payload");
            assert_eq!(a, b);
            assert_ne!(a, c);
        }
    }

    #[test]
    fn test_curve_name_parsing() {
        assert_eq!("secp256k1".parse::<Curve>().unwrap(), Curve::Secp256k1);
        assert_eq!("ED25519".parse::<Curve>().unwrap(), Curve::Ed25519);
        assert!("p256".parse::<Curve>().is_err());
        assert_eq!(Curve::from_point_len(33), Some(Curve::Secp256k1));
        assert_eq!(Curve::from_point_len(64), None);
    }
}
