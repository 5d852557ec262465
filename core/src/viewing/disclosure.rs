//! Conditional disclosure
//!
//! Wraps an [`EncryptedPayload`] with a trigger. Evaluation is a pure
//! predicate over a caller-supplied context; scheduling belongs to the caller.

use serde::{Deserialize, Serialize};

use super::encryption::{decrypt_with_viewing, encrypt_for_viewing, EncryptedPayload};
use crate::curve::Point;
use crate::error::{Error, Result};
use crate::secret::{SecretBuffer, SecretScalar};

/// When a conditional disclosure may be revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// At or after `unlock_at` (unix seconds)
    TimeLocked { unlock_at: u64 },
    /// At or after block `height`
    BlockHeight { height: u64 },
    /// When the transaction amount reaches `limit`
    AmountThreshold { limit: u128 },
}

impl Trigger {
    fn kind(&self) -> &'static str {
        match self {
            Trigger::TimeLocked { .. } => "time_locked",
            Trigger::BlockHeight { .. } => "block_height",
            Trigger::AmountThreshold { .. } => "amount_threshold",
        }
    }
}

/// Facts a trigger is evaluated against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureContext {
    /// Current time (unix seconds)
    pub now: u64,
    pub block_height: Option<u64>,
    pub amount: Option<u128>,
}

impl DisclosureContext {
    pub fn at(now: u64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub fn with_block_height(mut self, height: u64) -> Self {
        self.block_height = Some(height);
        self
    }

    pub fn with_amount(mut self, amount: u128) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// Pure trigger predicate; a missing fact never satisfies a trigger
pub fn is_revealable(trigger: &Trigger, context: &DisclosureContext) -> bool {
    match *trigger {
        Trigger::TimeLocked { unlock_at } => context.now >= unlock_at,
        Trigger::BlockHeight { height } => context.block_height.is_some_and(|h| h >= height),
        Trigger::AmountThreshold { limit } => context.amount.is_some_and(|a| a >= limit),
    }
}

/// An encrypted payload plus the rule for revealing it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionalDisclosure {
    trigger: Trigger,
    payload: EncryptedPayload,
}

impl ConditionalDisclosure {
    pub fn new(trigger: Trigger, payload: EncryptedPayload) -> Self {
        Self { trigger, payload }
    }

    /// Encrypt `plaintext` to a viewing key and attach a trigger
    pub fn seal(plaintext: &[u8], viewing_public_key: &Point, trigger: Trigger) -> Result<Self> {
        Ok(Self::new(trigger, encrypt_for_viewing(plaintext, viewing_public_key)?))
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn payload(&self) -> &EncryptedPayload {
        &self.payload
    }

    pub fn is_revealable(&self, context: &DisclosureContext) -> bool {
        is_revealable(&self.trigger, context)
    }
}

/// Decrypt a conditional disclosure once its trigger has fired
///
/// Fails with `NotRevealable` before the trigger fires, without attempting
/// decryption.
pub fn reveal(
    disclosure: &ConditionalDisclosure,
    context: &DisclosureContext,
    viewing_private_key: &SecretScalar,
) -> Result<SecretBuffer> {
    let permitted = disclosure.is_revealable(context);
    tracing::debug!(trigger = disclosure.trigger.kind(), permitted, "conditional disclosure evaluated");
    if !permitted {
        return Err(Error::NotRevealable);
    }
    Ok(decrypt_with_viewing(&disclosure.payload, viewing_private_key)?)
}
