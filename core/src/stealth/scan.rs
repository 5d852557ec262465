//! Payment scanning (recipient side)
//!
//! Each candidate is checked independently, so batch scans partition the
//! candidate set across rayon workers and merge per-chunk reports. A shared
//! cancellation flag is polled between candidates.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use super::{one_time_public_key, shared_secret_bytes, tweak, view_tag, StealthAddress, StealthKeys};
use crate::config::ScanConfig;
use crate::curve::{Curve, Point};
use crate::error::{Error, Result};
use crate::secret::SecretScalar;

/// Result of checking one candidate
enum Outcome {
    /// Fast-path rejection on the 1-byte tag
    ViewTagMismatch,
    NoMatch,
    /// Carries the tweak H(S')
    Match(SecretScalar),
}

/// Check a candidate with the viewing secret and spending public key only
fn match_candidate(viewing_secret: &SecretScalar, spending_key: &Point, candidate: &StealthAddress) -> Result<Outcome> {
    let curve = viewing_secret.curve();
    if candidate.curve() != curve {
        return Err(Error::CurveMismatch {
            expected: curve,
            found: candidate.curve(),
        });
    }

    // S' = vk·R
    let shared = shared_secret_bytes(&candidate.ephemeral_public_key().mul(&viewing_secret.expose())?)?;

    if let Some(tag) = candidate.view_tag() {
        if view_tag(&shared) != tag {
            return Ok(Outcome::ViewTagMismatch);
        }
    }

    // P' = SK + H(S')·G
    let tweak = tweak(curve, &shared);
    let expected = one_time_public_key(spending_key, &tweak)?;

    if expected.ct_eq(candidate.stealth_public_key()) {
        Ok(Outcome::Match(SecretScalar::from_scalar(&tweak)))
    } else {
        Ok(Outcome::NoMatch)
    }
}

/// p = sk + tweak
fn one_time_private_key(keys: &StealthKeys, tweak: &SecretScalar) -> Result<SecretScalar> {
    let p = keys.spending_secret().expose().add(&tweak.expose())?;
    if p.is_zero() {
        return Err(Error::DegenerateKey);
    }
    Ok(SecretScalar::from_scalar(&p))
}

/// Recover the one-time private key for a candidate addressed to `keys`
///
/// Returns `Ok(None)` when the candidate belongs to someone else. On a match
/// the returned scalar satisfies `p·G == candidate.stealth_public_key()`.
pub fn recover_stealth_key(keys: &StealthKeys, candidate: &StealthAddress) -> Result<Option<SecretScalar>> {
    match match_candidate(keys.viewing_secret(), keys.spending_key(), candidate)? {
        Outcome::Match(tweak) => one_time_private_key(keys, &tweak).map(Some),
        Outcome::ViewTagMismatch | Outcome::NoMatch => Ok(None),
    }
}

// ============================================================================
// View-Only Scanner
// ============================================================================

/// Detects incoming payments without the spending key (auditor mode)
///
/// Holds the viewing secret and spending public key; can confirm ownership
/// of a stealth address but never derive its private key.
pub struct ViewingScanner {
    viewing_secret: SecretScalar,
    spending_key: Point,
}

impl ViewingScanner {
    pub fn new(viewing_secret: SecretScalar, spending_key: Point) -> Result<Self> {
        if viewing_secret.curve() != spending_key.curve() {
            return Err(Error::CurveMismatch {
                expected: spending_key.curve(),
                found: viewing_secret.curve(),
            });
        }
        Ok(Self {
            viewing_secret,
            spending_key,
        })
    }

    /// View-only scanner for a recipient's keys
    pub fn from_keys(keys: &StealthKeys) -> Self {
        Self {
            viewing_secret: keys.viewing_secret().clone(),
            spending_key: *keys.spending_key(),
        }
    }

    pub fn curve(&self) -> Curve {
        self.spending_key.curve()
    }

    /// Whether the candidate was addressed to this recipient
    pub fn is_mine(&self, candidate: &StealthAddress) -> bool {
        matches!(
            match_candidate(&self.viewing_secret, &self.spending_key, candidate),
            Ok(Outcome::Match(_))
        )
    }

    /// Indices of candidates addressed to this recipient
    pub fn scan(&self, candidates: &[StealthAddress]) -> Vec<usize> {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| self.is_mine(candidate))
            .map(|(index, _)| index)
            .collect()
    }
}

// ============================================================================
// Batch Scanning
// ============================================================================

/// A payment found during a batch scan
#[derive(Debug)]
pub struct FoundPayment {
    /// Position in the scanned candidate slice
    pub index: usize,
    pub address: StealthAddress,
    /// One-time private key (wiped on drop)
    pub private_key: SecretScalar,
}

/// Batch scan counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Candidates examined before completion or cancellation
    pub scanned: usize,
    pub view_tag_rejected: usize,
    pub matched: usize,
    /// Candidates on another curve or with degenerate keys
    pub skipped: usize,
    pub cancelled: bool,
}

/// Found payments plus counters
#[derive(Debug, Default)]
pub struct ScanReport {
    pub found: Vec<FoundPayment>,
    pub stats: ScanStats,
}

impl ScanReport {
    fn merge(mut self, other: ScanReport) -> ScanReport {
        self.found.extend(other.found);
        self.stats.scanned += other.stats.scanned;
        self.stats.view_tag_rejected += other.stats.view_tag_rejected;
        self.stats.matched += other.stats.matched;
        self.stats.skipped += other.stats.skipped;
        self.stats.cancelled |= other.stats.cancelled;
        self
    }
}

fn scan_chunk(keys: &StealthKeys, offset: usize, chunk: &[StealthAddress], cancel: &AtomicBool) -> ScanReport {
    let mut report = ScanReport::default();

    for (i, candidate) in chunk.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            report.stats.cancelled = true;
            break;
        }
        report.stats.scanned += 1;

        let outcome = match_candidate(keys.viewing_secret(), keys.spending_key(), candidate);
        match outcome {
            Ok(Outcome::Match(tweak)) => match one_time_private_key(keys, &tweak) {
                Ok(private_key) => {
                    report.stats.matched += 1;
                    report.found.push(FoundPayment {
                        index: offset + i,
                        address: *candidate,
                        private_key,
                    });
                }
                Err(_) => report.stats.skipped += 1,
            },
            Ok(Outcome::ViewTagMismatch) => report.stats.view_tag_rejected += 1,
            Ok(Outcome::NoMatch) => {}
            Err(_) => report.stats.skipped += 1,
        }
    }

    report
}

/// Scan many candidates for payments to `keys`
///
/// Candidates are split into `config.chunk_size` partitions, scanned on the
/// rayon pool when `config.parallel` is set. Setting `cancel` stops every
/// worker before its next candidate; the report then holds whatever was
/// found so far. Found payments are returned in candidate order.
pub fn scan_batch(keys: &StealthKeys, candidates: &[StealthAddress], config: &ScanConfig, cancel: &AtomicBool) -> ScanReport {
    let chunk_size = config.chunk_size.max(1);

    let mut report = if config.parallel {
        candidates
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(n, chunk)| scan_chunk(keys, n * chunk_size, chunk, cancel))
            .reduce(ScanReport::default, ScanReport::merge)
    } else {
        candidates
            .chunks(chunk_size)
            .enumerate()
            .map(|(n, chunk)| scan_chunk(keys, n * chunk_size, chunk, cancel))
            .fold(ScanReport::default(), ScanReport::merge)
    };

    report.found.sort_by_key(|payment| payment.index);

    tracing::debug!(
        curve = %keys.curve(),
        candidates = candidates.len(),
        scanned = report.stats.scanned,
        matched = report.stats.matched,
        view_tag_rejected = report.stats.view_tag_rejected,
        cancelled = report.stats.cancelled,
        "stealth batch scan finished"
    );

    report
}
