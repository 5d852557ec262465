//! ed25519 backend (curve25519-dalek)
//!
//! Points are restricted to the prime-order subgroup; scalars are reduced
//! mod l = 2^252 + 27742317777372353535851937790883648493.

use curve25519_dalek::{
    constants::ED25519_BASEPOINT_POINT,
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
    traits::{Identity, IsIdentity},
};

use super::{Curve, CurveBackend, SCALAR_LEN};
use crate::error::{Error, Result};

pub(crate) struct Ed25519Backend;

/// Decompress, rejecting encodings that do not re-encode to the same bytes
fn decompress_canonical(bytes: &[u8; 32]) -> Option<EdwardsPoint> {
    let point = CompressedEdwardsY(*bytes).decompress()?;
    if point.compress().as_bytes() != bytes {
        return None;
    }
    Some(point)
}

impl CurveBackend for Ed25519Backend {
    type Scalar = Scalar;
    type Point = EdwardsPoint;

    const CURVE: Curve = Curve::Ed25519;

    fn generator() -> EdwardsPoint {
        ED25519_BASEPOINT_POINT
    }

    fn identity() -> EdwardsPoint {
        EdwardsPoint::identity()
    }

    fn mul(point: &EdwardsPoint, scalar: &Scalar) -> EdwardsPoint {
        scalar * point
    }

    fn mul_base(scalar: &Scalar) -> EdwardsPoint {
        scalar * &ED25519_BASEPOINT_POINT
    }

    fn add(a: &EdwardsPoint, b: &EdwardsPoint) -> EdwardsPoint {
        a + b
    }

    fn sub(a: &EdwardsPoint, b: &EdwardsPoint) -> EdwardsPoint {
        a - b
    }

    fn is_identity(point: &EdwardsPoint) -> bool {
        point.is_identity()
    }

    fn encode_point(point: &EdwardsPoint, _compressed: bool) -> Vec<u8> {
        point.compress().to_bytes().to_vec()
    }

    fn decode_point(bytes: &[u8]) -> Result<EdwardsPoint> {
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidEncoding("ed25519 point must be 32 bytes"))?;

        let point = decompress_canonical(&array)
            .ok_or(Error::InvalidEncoding("not a canonical ed25519 point"))?;

        if point.is_identity() {
            return Err(Error::InvalidEncoding("identity point"));
        }
        if !point.is_torsion_free() {
            return Err(Error::InvalidEncoding("ed25519 point outside prime-order subgroup"));
        }

        Ok(point)
    }

    fn candidate_point(bytes: &[u8; 32]) -> Option<EdwardsPoint> {
        let point = decompress_canonical(bytes)?.mul_by_cofactor();
        if point.is_identity() {
            return None;
        }
        Some(point)
    }

    fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_LEN] {
        scalar.to_bytes()
    }

    fn scalar_from_canonical(bytes: &[u8; SCALAR_LEN]) -> Option<Scalar> {
        Scalar::from_canonical_bytes(*bytes).into()
    }

    fn scalar_from_wide(bytes: &[u8; 64]) -> Scalar {
        Scalar::from_bytes_mod_order_wide(bytes)
    }

    fn scalar_from_u128(value: u128) -> Scalar {
        let mut bytes = [0u8; SCALAR_LEN];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Scalar::from_bytes_mod_order(bytes)
    }

    fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
        a + b
    }

    fn scalar_sub(a: &Scalar, b: &Scalar) -> Scalar {
        a - b
    }

    fn scalar_mul(a: &Scalar, b: &Scalar) -> Scalar {
        a * b
    }

    fn scalar_neg(a: &Scalar) -> Scalar {
        -a
    }

    fn scalar_invert(a: &Scalar) -> Option<Scalar> {
        if Self::scalar_is_zero(a) {
            return None;
        }
        Some(a.invert())
    }

    fn scalar_is_zero(a: &Scalar) -> bool {
        a == &Scalar::ZERO
    }
}
