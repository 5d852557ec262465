//! Library configuration
//!
//! Runtime knobs only. Protocol constants (generator domain, KDF labels,
//! tweak domain) are versioned in code and cannot be overridden here.

use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};

use crate::commitment::{commit_bounded, Commitment, Opening, MAX_AMOUNT};
use crate::curve::{Curve, Scalar};
use crate::error::{Error, Result};
use crate::stealth::{scan_batch, ScanReport, StealthAddress, StealthKeys, StealthMetaAddress};
use crate::viewing::{generate_viewing_keypair, ViewingKeyPair};

/// Default candidates per batch-scan partition
pub const DEFAULT_SCAN_CHUNK_SIZE: usize = 256;

/// Batch scanning settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Candidates per partition (must be > 0)
    pub chunk_size: usize,
    /// Scan partitions on the rayon pool
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_SCAN_CHUNK_SIZE,
            parallel: true,
        }
    }
}

/// Top-level configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    /// Curve for newly generated keys
    pub default_curve: Curve,
    /// Whether new meta-addresses publish view tags
    pub view_tags: bool,
    /// Upper bound for committed amounts (at most `MAX_AMOUNT`)
    pub max_amount: u128,
    pub scan: ScanConfig,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            default_curve: Curve::Secp256k1,
            view_tags: true,
            max_amount: MAX_AMOUNT,
            scan: ScanConfig::default(),
        }
    }
}

impl PrivacyConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PrivacyConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_amount > MAX_AMOUNT {
            return Err(Error::InvalidConfig(format!(
                "max_amount {} exceeds protocol limit {}",
                self.max_amount, MAX_AMOUNT
            )));
        }
        if self.scan.chunk_size == 0 {
            return Err(Error::InvalidConfig("scan.chunk_size must be positive".into()));
        }
        Ok(())
    }

    /// Fresh recipient keys on `default_curve`; the meta-address publishes
    /// view tags per `view_tags`
    pub fn generate_meta_address(&self, chain: &str) -> Result<(StealthMetaAddress, StealthKeys)> {
        let keys = StealthKeys::generate(self.default_curve);
        let meta = keys.meta_address(chain)?.with_view_tags(self.view_tags);
        tracing::debug!(
            curve = %self.default_curve,
            chain,
            view_tags = self.view_tags,
            "generated stealth meta-address"
        );
        Ok((meta, keys))
    }

    pub fn generate_viewing_keypair(&self) -> ViewingKeyPair {
        generate_viewing_keypair(self.default_curve)
    }

    /// Commit on `default_curve`, refusing values above `max_amount`
    pub fn commit(&self, value: u128, blinding: Option<&Scalar>) -> Result<(Commitment, Opening)> {
        commit_bounded(self.default_curve, value, blinding, self.max_amount)
    }

    /// Batch scan with the configured partitioning
    pub fn scan(&self, keys: &StealthKeys, candidates: &[StealthAddress], cancel: &AtomicBool) -> ScanReport {
        scan_batch(keys, candidates, &self.scan, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PrivacyConfig::default();
        assert_eq!(config.default_curve, Curve::Secp256k1);
        assert!(config.view_tags);
        assert_eq!(config.max_amount, MAX_AMOUNT);
        assert_eq!(config.scan.chunk_size, 256);
        assert!(config.scan.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = PrivacyConfig::from_json(r#"{"default_curve": "ed25519", "scan": {"parallel": false}}"#).unwrap();
        assert_eq!(config.default_curve, Curve::Ed25519);
        assert!(!config.scan.parallel);
        assert_eq!(config.scan.chunk_size, DEFAULT_SCAN_CHUNK_SIZE);
        assert!(config.view_tags);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = PrivacyConfig::default();
        config.view_tags = false;
        config.max_amount = 1_000_000;
        let json = config.to_json().unwrap();
        assert_eq!(PrivacyConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_meta_address_follows_config() {
        let config = PrivacyConfig::from_json(r#"{"default_curve": "ed25519", "view_tags": false}"#).unwrap();
        let (meta, keys) = config.generate_meta_address("solana").unwrap();
        assert_eq!(meta.curve(), Curve::Ed25519);
        assert_eq!(keys.curve(), Curve::Ed25519);
        assert!(!meta.view_tags());

        let (meta, _) = PrivacyConfig::default().generate_meta_address("ethereum").unwrap();
        assert_eq!(meta.curve(), Curve::Secp256k1);
        assert!(meta.view_tags());

        assert_eq!(config.generate_viewing_keypair().curve(), Curve::Ed25519);
    }

    #[test]
    fn test_commit_respects_max_amount() {
        let config = PrivacyConfig {
            max_amount: 1_000,
            ..PrivacyConfig::default()
        };
        let (c, opening) = config.commit(1_000, None).unwrap();
        assert_eq!(c.curve(), Curve::Secp256k1);
        assert!(opening.verify(&c));
        assert_eq!(
            config.commit(1_001, None).unwrap_err(),
            Error::ValueOutOfRange { value: 1_001, max: 1_000 }
        );
    }

    #[test]
    fn test_scan_uses_config() {
        let config = PrivacyConfig {
            scan: ScanConfig {
                chunk_size: 2,
                parallel: false,
            },
            ..PrivacyConfig::default()
        };
        let (meta, keys) = config.generate_meta_address("ethereum").unwrap();
        let candidates: Vec<_> = (0..5)
            .map(|_| crate::stealth::derive_stealth_address(&meta).unwrap())
            .collect();
        let report = config.scan(&keys, &candidates, &AtomicBool::new(false));
        assert_eq!(report.found.len(), 5);
        assert_eq!(report.stats.scanned, 5);
    }

    #[test]
    fn test_invalid_configs() {
        for json in [
            r#"{"scan": {"chunk_size": 0}}"#,
            r#"{"default_curve": "p256"}"#,
            r#"{"max_amount": 340282366920938463463374607431768211455}"#,
            "not json",
        ] {
            assert!(
                matches!(PrivacyConfig::from_json(json), Err(Error::InvalidConfig(_))),
                "accepted {}",
                json
            );
        }
    }
}
