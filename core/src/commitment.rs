//! Pedersen commitments
//!
//! C = v·G + r·H where:
//! - v = value (hidden amount)
//! - r = blinding factor (uniform, secret)
//! - G = curve base point
//! - H = independent NUMS generator, nobody knows log_G(H)
//!
//! ## Security Properties
//!
//! - **Hiding (perfect)**: with uniform r, C is uniform regardless of v
//! - **Binding (computational)**: opening C two ways yields log_G(H)
//! - **Homomorphic**: C(a, r1) + C(b, r2) = C(a + b, r1 + r2)
//!
//! ## Generator H
//!
//! H is found by try-and-increment over SHA-256(H_DOMAIN || G || counter)
//! (cofactor-cleared on ed25519) and published below as a constant. The
//! domain separator is a versioned protocol parameter: changing it breaks
//! every commitment issued under the old value.

use std::fmt;

use once_cell::sync::Lazy;

use crate::curve::{Curve, Point, Scalar};
use crate::error::{Error, Result};
use crate::secret::SecretScalar;

/// Domain separator for the NUMS generator H
pub const H_DOMAIN: &[u8] = b"SIP-PEDERSEN-GENERATOR-H-v1";

/// Largest committable amount: 2^124 - 1
///
/// Covers 18-decimal token amounts well past any real supply, while sums of
/// up to 2^128 amounts stay below the ed25519 group order (~2^252) and never wrap.
pub const MAX_AMOUNT: u128 = (1u128 << 124) - 1;

/// Published H for secp256k1 (SEC1 compressed), counter 3
pub const H_SECP256K1: [u8; 33] = [
    0x02, 0x8b, 0x9d, 0x9d, 0x9e, 0x2a, 0x69, 0x4a, 0x2f, 0x9b, 0x54, 0x96, 0x11, 0xaa, 0xd9, 0x20,
    0x07, 0x37, 0x43, 0x92, 0xb5, 0x8e, 0x6d, 0xaf, 0xbb, 0x33, 0x54, 0xe2, 0xe6, 0xf4, 0x11, 0x44,
    0x9a,
];

/// Published H for ed25519 (compressed Edwards Y), counter 0
pub const H_ED25519: [u8; 32] = [
    0x62, 0x24, 0x3e, 0x68, 0x20, 0x39, 0xe8, 0xe8, 0x8b, 0x41, 0xca, 0x3f, 0x13, 0xfe, 0xb0, 0x50,
    0xbc, 0x12, 0x15, 0x55, 0x82, 0xa5, 0xf0, 0xca, 0x0b, 0x1a, 0x64, 0xf3, 0x0f, 0x21, 0xb1, 0x45,
];

static GENERATOR_H_SECP256K1: Lazy<Point> = Lazy::new(|| published_generator(Curve::Secp256k1, &H_SECP256K1));
static GENERATOR_H_ED25519: Lazy<Point> = Lazy::new(|| published_generator(Curve::Ed25519, &H_ED25519));

fn published_generator(curve: Curve, bytes: &[u8]) -> Point {
    match curve.bytes_to_point(bytes) {
        Ok(point) => point,
        Err(_) => unreachable!("published generator H is a valid prime-order point"),
    }
}

/// The independent generator H for a curve
pub fn generator_h(curve: Curve) -> Point {
    match curve {
        Curve::Secp256k1 => *GENERATOR_H_SECP256K1,
        Curve::Ed25519 => *GENERATOR_H_ED25519,
    }
}

/// Re-run the NUMS search and compare with the published H
pub fn verify_generator_h(curve: Curve) -> bool {
    curve
        .nums_generator(H_DOMAIN)
        .is_some_and(|derived| derived == generator_h(curve))
}

/// (G, H) for ZK circuit integration
pub fn generators(curve: Curve) -> (Point, Point) {
    (curve.generator(), generator_h(curve))
}

// ============================================================================
// Types
// ============================================================================

/// A hidden amount: compressed curve point
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment {
    point: Point,
}

impl Commitment {
    /// Wrap a point; the identity is not a valid commitment
    pub fn from_point(point: Point) -> Result<Self> {
        if point.is_identity() {
            return Err(Error::DegenerateKey);
        }
        Ok(Self { point })
    }

    /// Decode a compressed commitment (33 bytes secp256k1, 32 bytes ed25519)
    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != curve.point_len() {
            return Err(Error::InvalidEncoding("commitment must be a compressed point"));
        }
        Ok(Self {
            point: curve.bytes_to_point(bytes)?,
        })
    }

    /// Compressed point encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        self.point.to_compressed()
    }

    pub fn curve(&self) -> Curve {
        self.point.curve()
    }

    pub fn point(&self) -> &Point {
        &self.point
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({}, {})", self.curve(), self.point.to_hex())
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.point.to_hex())
    }
}

/// The secret opening of a commitment: value and blinding factor
///
/// Held by the committer; only ever handed to an authorized verifier.
#[derive(Clone, PartialEq, Eq)]
pub struct Opening {
    value: u128,
    blinding: SecretScalar,
}

impl Opening {
    pub fn new(value: u128, blinding: SecretScalar) -> Self {
        Self { value, blinding }
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn blinding(&self) -> &SecretScalar {
        &self.blinding
    }

    /// Check this opening against a commitment
    pub fn verify(&self, commitment: &Commitment) -> bool {
        verify_opening(commitment, self.value, &self.blinding.expose())
    }

    /// Opening of the sum of two commitments
    pub fn combine(&self, other: &Opening) -> Result<Opening> {
        let value = self
            .value
            .checked_add(other.value)
            .filter(|v| *v <= MAX_AMOUNT)
            .ok_or(Error::ValueOutOfRange {
                value: self.value.saturating_add(other.value),
                max: MAX_AMOUNT,
            })?;
        let blinding = blinding_sum(&self.blinding.expose(), &other.blinding.expose())?;
        Ok(Opening {
            value,
            blinding: SecretScalar::from_scalar(&blinding),
        })
    }
}

impl fmt::Debug for Opening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opening")
            .field("curve", &self.blinding.curve())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Commit / Verify
// ============================================================================

/// Generate a uniform non-zero blinding factor
pub fn generate_blinding(curve: Curve) -> SecretScalar {
    SecretScalar::generate(curve)
}

/// v·G + r·H with no range check
fn compute(curve: Curve, value: u128, blinding: &Scalar) -> Result<Point> {
    let v = curve.scalar_from_u128(value);
    let h = generator_h(curve);
    v.mul_base().add(&h.mul(blinding)?)
}

/// Create a Pedersen commitment to `value`
///
/// A random blinding factor is drawn from the OS CSPRNG when `blinding` is
/// `None`. Values above [`MAX_AMOUNT`] are rejected before any arithmetic.
pub fn commit(curve: Curve, value: u128, blinding: Option<&Scalar>) -> Result<(Commitment, Opening)> {
    commit_bounded(curve, value, blinding, MAX_AMOUNT)
}

/// [`commit`] with a caller-chosen bound (at most [`MAX_AMOUNT`])
pub fn commit_bounded(
    curve: Curve,
    value: u128,
    blinding: Option<&Scalar>,
    max_amount: u128,
) -> Result<(Commitment, Opening)> {
    let max = max_amount.min(MAX_AMOUNT);
    if value > max {
        tracing::debug!(%curve, max, "commitment value rejected");
        return Err(Error::ValueOutOfRange { value, max });
    }

    let blinding = match blinding {
        Some(r) => {
            if r.curve() != curve {
                return Err(Error::CurveMismatch {
                    expected: curve,
                    found: r.curve(),
                });
            }
            // r = 0 would publish v·G, which is not hiding
            if r.is_zero() {
                return Err(Error::DegenerateKey);
            }
            SecretScalar::from_scalar(r)
        }
        None => generate_blinding(curve),
    };

    let point = compute(curve, value, &blinding.expose())?;
    let commitment = Commitment::from_point(point)?;

    tracing::trace!(%curve, "created Pedersen commitment");
    Ok((commitment, Opening::new(value, blinding)))
}

/// Commitment to zero: C = r·H
pub fn commit_zero(curve: Curve, blinding: &Scalar) -> Result<Commitment> {
    commit(curve, 0, Some(blinding)).map(|(commitment, _)| commitment)
}

/// Check that `commitment` opens to `(value, blinding)`
///
/// Never errors: malformed or mismatched input is simply "not verified".
/// Deterministic, and compares encodings in constant time.
pub fn verify_opening(commitment: &Commitment, value: u128, blinding: &Scalar) -> bool {
    if value > MAX_AMOUNT || blinding.curve() != commitment.curve() {
        return false;
    }

    match compute(commitment.curve(), value, blinding) {
        Ok(expected) => expected.ct_eq(commitment.point()),
        Err(_) => false,
    }
}

// ============================================================================
// Homomorphic Operations
// ============================================================================

/// C1 + C2 = (v1 + v2)·G + (r1 + r2)·H
pub fn add_commitments(c1: &Commitment, c2: &Commitment) -> Result<Commitment> {
    Commitment::from_point(c1.point.add(&c2.point)?)
}

/// C1 - C2 = (v1 - v2)·G + (r1 - r2)·H
pub fn subtract_commitments(c1: &Commitment, c2: &Commitment) -> Result<Commitment> {
    Commitment::from_point(c1.point.sub(&c2.point)?)
}

/// r1 + r2, for callers tracking aggregate blinding factors
pub fn blinding_sum(r1: &Scalar, r2: &Scalar) -> Result<Scalar> {
    r1.add(r2)
}

/// r1 - r2, matching [`subtract_commitments`]
pub fn blinding_difference(r1: &Scalar, r2: &Scalar) -> Result<Scalar> {
    r1.sub(r2)
}
