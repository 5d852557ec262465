//! secp256k1 backend (k256)

use k256::{
    elliptic_curve::{
        bigint::{U256, U512},
        group::Group,
        ops::Reduce,
        sec1::{FromEncodedPoint, ToEncodedPoint},
        Field, PrimeField,
    },
    AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar,
};

use super::{Curve, CurveBackend, SCALAR_LEN};
use crate::error::{Error, Result};

/// SEC1 tag for a compressed point with even y
const TAG_COMPRESSED_EVEN: u8 = 0x02;
const TAG_COMPRESSED_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

pub(crate) struct Secp256k1Backend;

impl CurveBackend for Secp256k1Backend {
    type Scalar = Scalar;
    type Point = ProjectivePoint;

    const CURVE: Curve = Curve::Secp256k1;

    fn generator() -> ProjectivePoint {
        ProjectivePoint::GENERATOR
    }

    fn identity() -> ProjectivePoint {
        ProjectivePoint::IDENTITY
    }

    fn mul(point: &ProjectivePoint, scalar: &Scalar) -> ProjectivePoint {
        *point * *scalar
    }

    fn mul_base(scalar: &Scalar) -> ProjectivePoint {
        ProjectivePoint::GENERATOR * *scalar
    }

    fn add(a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
        *a + *b
    }

    fn sub(a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
        *a - *b
    }

    fn is_identity(point: &ProjectivePoint) -> bool {
        bool::from(point.is_identity())
    }

    fn encode_point(point: &ProjectivePoint, compressed: bool) -> Vec<u8> {
        point
            .to_affine()
            .to_encoded_point(compressed)
            .as_bytes()
            .to_vec()
    }

    fn decode_point(bytes: &[u8]) -> Result<ProjectivePoint> {
        match (bytes.len(), bytes.first()) {
            (33, Some(&TAG_COMPRESSED_EVEN)) | (33, Some(&TAG_COMPRESSED_ODD)) => {}
            (65, Some(&TAG_UNCOMPRESSED)) => {}
            _ => {
                return Err(Error::InvalidEncoding(
                    "secp256k1 point must be 33-byte compressed or 65-byte uncompressed SEC1",
                ))
            }
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::InvalidEncoding("malformed SEC1 encoding"))?;
        let affine: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        let point = ProjectivePoint::from(
            affine.ok_or(Error::InvalidEncoding("point not on secp256k1"))?,
        );

        if Self::is_identity(&point) {
            return Err(Error::InvalidEncoding("identity point"));
        }

        Ok(point)
    }

    fn candidate_point(bytes: &[u8; 32]) -> Option<ProjectivePoint> {
        // Cofactor is 1: any on-curve x with even y is a valid generator candidate
        let mut encoded = [0u8; 33];
        encoded[0] = TAG_COMPRESSED_EVEN;
        encoded[1..].copy_from_slice(bytes);
        Self::decode_point(&encoded).ok()
    }

    fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_LEN] {
        let mut out = [0u8; SCALAR_LEN];
        out.copy_from_slice(&scalar.to_bytes());
        out
    }

    fn scalar_from_canonical(bytes: &[u8; SCALAR_LEN]) -> Option<Scalar> {
        Scalar::from_repr(FieldBytes::clone_from_slice(bytes)).into()
    }

    fn scalar_from_wide(bytes: &[u8; 64]) -> Scalar {
        <Scalar as Reduce<U512>>::reduce(U512::from_be_slice(bytes))
    }

    fn scalar_from_u128(value: u128) -> Scalar {
        let mut bytes = [0u8; SCALAR_LEN];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(&bytes))
    }

    fn scalar_add(a: &Scalar, b: &Scalar) -> Scalar {
        *a + *b
    }

    fn scalar_sub(a: &Scalar, b: &Scalar) -> Scalar {
        *a - *b
    }

    fn scalar_mul(a: &Scalar, b: &Scalar) -> Scalar {
        *a * *b
    }

    fn scalar_neg(a: &Scalar) -> Scalar {
        -*a
    }

    fn scalar_invert(a: &Scalar) -> Option<Scalar> {
        a.invert().into()
    }

    fn scalar_is_zero(a: &Scalar) -> bool {
        bool::from(Field::is_zero(a))
    }
}
