//! Threshold viewing keys
//!
//! Shamir t-of-n sharing over the curve's scalar field with Feldman
//! verification:
//!
//! ```text
//! f(x) = a_0 + a_1·x + ... + a_{t-1}·x^{t-1},   a_0 = viewing secret
//! share_i = f(i) for i = 1..=n
//! A_j = a_j·G                                   (A_0 = viewing public key)
//! share_i·G == Σ A_j·i^j                        (share verification)
//! ```
//!
//! The coefficient commitments form a public [`ShareVerifier`]. Every share
//! carries a copy, so reconstruction can reject a share that is not on the
//! committed polynomial even when it matches its own `share·G`.

use std::collections::HashSet;
use std::fmt;

use crate::curve::{Curve, Point, Scalar};
use crate::error::{Error, Result, ThresholdError};
use crate::secret::SecretScalar;

// ============================================================================
// Verification Data
// ============================================================================

/// Public commitments A_0..A_{t-1} to the sharing polynomial
///
/// Safe to publish. `A_0` is the viewing public key.
#[derive(Clone, PartialEq, Eq)]
pub struct ShareVerifier {
    commitments: Vec<Point>,
}

impl ShareVerifier {
    /// Build from A_0..A_{t-1}; all points on one curve, 1 <= t <= 255
    pub fn from_commitments(commitments: Vec<Point>) -> Result<Self> {
        let Some(first) = commitments.first() else {
            return Err(ThresholdError::InvalidParameters { threshold: 0, total: 0 }.into());
        };
        let curve = first.curve();
        if commitments.len() > u8::MAX as usize {
            return Err(ThresholdError::InvalidParameters {
                threshold: u8::MAX,
                total: u8::MAX,
            }
            .into());
        }
        if let Some(other) = commitments.iter().find(|c| c.curve() != curve) {
            return Err(Error::CurveMismatch {
                expected: curve,
                found: other.curve(),
            });
        }
        if first.is_identity() {
            return Err(Error::DegenerateKey);
        }
        Ok(Self { commitments })
    }

    pub fn curve(&self) -> Curve {
        self.commitments[0].curve()
    }

    /// Shares required to reconstruct (polynomial degree + 1)
    pub fn threshold(&self) -> u8 {
        self.commitments.len() as u8
    }

    pub fn commitments(&self) -> &[Point] {
        &self.commitments
    }

    /// A_0, the viewing public key
    pub fn public_key(&self) -> &Point {
        &self.commitments[0]
    }

    /// Σ A_j·index^j, the commitment share `index` must have
    pub fn expected_commitment(&self, index: u8) -> Result<Point> {
        let curve = self.curve();
        let x = curve.scalar_from_u128(index as u128);
        let mut power = curve.scalar_from_u128(1);
        let mut acc = curve.identity();
        for commitment in &self.commitments {
            acc = acc.add(&commitment.mul(&power)?)?;
            power = power.mul(&x)?;
        }
        Ok(acc)
    }

    /// Feldman check: share·G == commitment == Σ A_j·index^j
    pub fn verify(&self, share: &Share) -> bool {
        if share.index == 0 || share.curve() != self.curve() {
            return false;
        }
        if !share.value.public_point().ct_eq(&share.commitment) {
            return false;
        }
        match self.expected_commitment(share.index) {
            Ok(expected) => expected.ct_eq(&share.commitment),
            Err(_) => false,
        }
    }

    /// `t || A_0 || ... || A_{t-1}` (compressed points)
    pub fn to_bytes(&self) -> Vec<u8> {
        let point_len = self.curve().point_len();
        let mut out = Vec::with_capacity(1 + self.commitments.len() * point_len);
        out.push(self.threshold());
        for commitment in &self.commitments {
            out.extend_from_slice(&commitment.to_compressed());
        }
        out
    }

    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<Self> {
        let (&threshold, rest) = bytes
            .split_first()
            .ok_or(Error::InvalidEncoding("empty share verifier"))?;
        let point_len = curve.point_len();
        if threshold == 0 || rest.len() != threshold as usize * point_len {
            return Err(Error::InvalidEncoding("share verifier must be t || t compressed points"));
        }
        let commitments = rest
            .chunks_exact(point_len)
            .map(|chunk| curve.bytes_to_point(chunk))
            .collect::<Result<Vec<_>>>()?;
        Self::from_commitments(commitments)
    }
}

impl fmt::Debug for ShareVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareVerifier")
            .field("threshold", &self.threshold())
            .field("public_key", &self.public_key().to_hex())
            .finish()
    }
}

// ============================================================================
// Shares
// ============================================================================

/// A single custodian's share
#[derive(Clone, PartialEq, Eq)]
pub struct Share {
    index: u8,
    value: SecretScalar,
    commitment: Point,
    verifier: ShareVerifier,
}

impl Share {
    /// Evaluation point (1-based, never zero)
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Shares required to reconstruct
    pub fn threshold(&self) -> u8 {
        self.verifier.threshold()
    }

    pub fn curve(&self) -> Curve {
        self.commitment.curve()
    }

    pub fn value(&self) -> &SecretScalar {
        &self.value
    }

    /// Verification commitment `share·G`
    pub fn commitment(&self) -> &Point {
        &self.commitment
    }

    /// Polynomial commitments this share claims to lie on
    pub fn verifier(&self) -> &ShareVerifier {
        &self.verifier
    }

    /// Check the share against its own commitment and the polynomial
    pub fn is_consistent(&self) -> bool {
        self.verifier.verify(self)
    }

    /// `index || share (32 bytes) || commitment (compressed point)`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 32 + self.curve().point_len());
        out.push(self.index);
        out.extend_from_slice(self.value.expose_bytes());
        out.extend_from_slice(&self.commitment.to_compressed());
        out
    }

    /// Decode a share; the verifier travels out of band with the share set
    ///
    /// Rejects shares that do not lie on the verifier's polynomial.
    pub fn from_bytes(verifier: &ShareVerifier, bytes: &[u8]) -> Result<Self> {
        let curve = verifier.curve();
        if bytes.len() != 1 + 32 + curve.point_len() {
            return Err(Error::InvalidEncoding("share must be index || 32-byte scalar || point"));
        }
        let index = bytes[0];
        if index == 0 {
            return Err(Error::InvalidEncoding("share index must be non-zero"));
        }
        let share = Self {
            index,
            value: SecretScalar::from_bytes(curve, &bytes[1..33])?,
            commitment: curve.bytes_to_point(&bytes[33..])?,
            verifier: verifier.clone(),
        };
        if !share.is_consistent() {
            return Err(ThresholdError::InvalidShare { index }.into());
        }
        Ok(share)
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index)
            .field("threshold", &self.threshold())
            .field("commitment", &self.commitment.to_hex())
            .finish_non_exhaustive()
    }
}

/// The output of [`split_key`]: shares plus polynomial commitments
pub struct ThresholdShareSet {
    verifier: ShareVerifier,
    shares: Vec<Share>,
}

impl ThresholdShareSet {
    pub fn curve(&self) -> Curve {
        self.verifier.curve()
    }

    pub fn threshold(&self) -> u8 {
        self.verifier.threshold()
    }

    pub fn total(&self) -> u8 {
        self.shares.len() as u8
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// Hand the shares to their custodians
    pub fn into_shares(self) -> Vec<Share> {
        self.shares
    }

    /// Public verification data, publishable alongside the shares
    pub fn verifier(&self) -> &ShareVerifier {
        &self.verifier
    }

    /// A_0..A_{t-1}
    pub fn coefficient_commitments(&self) -> &[Point] {
        self.verifier.commitments()
    }

    /// A_0, the viewing public key
    pub fn public_key(&self) -> &Point {
        self.verifier.public_key()
    }

    pub fn verify_share(&self, share: &Share) -> bool {
        share.verifier == self.verifier && self.verifier.verify(share)
    }

    /// Reconstruct, trusting only this set's commitments
    pub fn reconstruct(&self, shares: &[Share]) -> std::result::Result<SecretScalar, ThresholdError> {
        reconstruct_verified(shares, &self.verifier)
    }
}

impl fmt::Debug for ThresholdShareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThresholdShareSet")
            .field("threshold", &self.threshold())
            .field("total", &self.shares.len())
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

/// Horner evaluation of f(x)
fn evaluate_polynomial(coefficients: &[SecretScalar], x: &Scalar) -> Result<Scalar> {
    let curve = x.curve();
    let mut acc = curve.zero_scalar();
    for coefficient in coefficients.iter().rev() {
        acc = acc.mul(x)?.add(&coefficient.expose())?;
    }
    Ok(acc)
}

/// Split a viewing private key into `total` shares, any `threshold` of which
/// reconstruct it
///
/// Requires 1 <= threshold <= total. With threshold 1 every share equals the
/// key itself.
pub fn split_key(viewing_private_key: &SecretScalar, threshold: u8, total: u8) -> Result<ThresholdShareSet> {
    if threshold == 0 || threshold > total {
        return Err(ThresholdError::InvalidParameters { threshold, total }.into());
    }
    let curve = viewing_private_key.curve();
    if viewing_private_key.expose().is_zero() {
        return Err(Error::DegenerateKey);
    }

    let mut coefficients = Vec::with_capacity(threshold as usize);
    coefficients.push(viewing_private_key.clone());
    for _ in 1..threshold {
        coefficients.push(SecretScalar::generate(curve));
    }

    let verifier = ShareVerifier::from_commitments(coefficients.iter().map(SecretScalar::public_point).collect())?;

    let mut shares = Vec::with_capacity(total as usize);
    for index in 1..=total {
        let x = curve.scalar_from_u128(index as u128);
        let value = SecretScalar::from_scalar(&evaluate_polynomial(&coefficients, &x)?);
        let commitment = value.public_point();
        shares.push(Share {
            index,
            value,
            commitment,
            verifier: verifier.clone(),
        });
    }

    tracing::debug!(%curve, threshold, total, "split viewing key");
    Ok(ThresholdShareSet { verifier, shares })
}

/// Reconstruct the viewing private key by Lagrange interpolation at zero
///
/// The first share's verifier is the reference: every share must carry the
/// same verifier, have a distinct non-zero index and lie on the committed
/// polynomial, otherwise the first offending share is reported as
/// `InvalidShare`. Fewer than `threshold` shares fail with
/// `InsufficientShares`. Use [`ThresholdShareSet::reconstruct`] or
/// [`reconstruct_verified`] to anchor on independently obtained commitments.
pub fn reconstruct_key(shares: &[Share]) -> std::result::Result<SecretScalar, ThresholdError> {
    let first = shares.first().ok_or(ThresholdError::InsufficientShares {
        required: 1,
        provided: 0,
    })?;
    reconstruct_verified(shares, &first.verifier)
}

/// Reconstruct against a trusted [`ShareVerifier`]
///
/// Every supplied share, including any beyond the threshold, is checked
/// against `verifier` before interpolation.
pub fn reconstruct_verified(
    shares: &[Share],
    verifier: &ShareVerifier,
) -> std::result::Result<SecretScalar, ThresholdError> {
    if shares.is_empty() {
        return Err(ThresholdError::InsufficientShares {
            required: verifier.threshold(),
            provided: 0,
        });
    }
    let curve = verifier.curve();
    let threshold = verifier.threshold();

    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        let valid = share.verifier == *verifier && seen.insert(share.index) && verifier.verify(share);
        if !valid {
            tracing::debug!(index = share.index, "rejected threshold share");
            return Err(ThresholdError::InvalidShare { index: share.index });
        }
    }

    if shares.len() < threshold as usize {
        return Err(ThresholdError::InsufficientShares {
            required: threshold,
            provided: shares.len(),
        });
    }

    let first = shares[0].index;
    let used = &shares[..threshold as usize];
    let secret = lagrange_at_zero(curve, used).map_err(|_| ThresholdError::InvalidShare { index: first })?;
    let secret = SecretScalar::from_scalar(&secret);
    if !secret.public_point().ct_eq(verifier.public_key()) {
        return Err(ThresholdError::InvalidShare { index: first });
    }

    tracing::debug!(%curve, threshold, provided = shares.len(), "reconstructed viewing key");
    Ok(secret)
}

/// Σ share_i · Π_{j≠i} x_j / (x_j - x_i)
fn lagrange_at_zero(curve: Curve, shares: &[Share]) -> Result<Scalar> {
    let mut secret = curve.zero_scalar();
    for (i, share_i) in shares.iter().enumerate() {
        let x_i = curve.scalar_from_u128(share_i.index as u128);
        let mut numerator = curve.scalar_from_u128(1);
        let mut denominator = curve.scalar_from_u128(1);

        for (j, share_j) in shares.iter().enumerate() {
            if i == j {
                continue;
            }
            let x_j = curve.scalar_from_u128(share_j.index as u128);
            numerator = numerator.mul(&x_j)?;
            denominator = denominator.mul(&x_j.sub(&x_i)?)?;
        }

        let lambda = numerator.mul(&denominator.invert()?)?;
        secret = secret.add(&share_i.value.expose().mul(&lambda)?)?;
    }
    Ok(secret)
}
