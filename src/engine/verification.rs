//! Verification tracker.
//!
//! Accumulates evidence that the parity rule is holding before the
//! strategy is trusted to place bets. Automatic checks only ever advance
//! the counter; once the target is reached the gate stays open for the
//! rest of the session. Manual overrides exist for the driver layer and
//! may put the pair into states the automatic path never produces.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Number of successful checks required before the strategy is trusted.
pub const VERIFY_TARGET: u8 = 4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationTracker {
    count: u8,
    verified: bool,
}

impl VerificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Record the result of a pattern check for one decisive round.
    ///
    /// A pass increments the counter (clamped at the target); a failure is
    /// ignored — the counter never regresses from automatic checks, and
    /// `verified` is never revoked by them.
    pub fn record(&mut self, held: bool) {
        if !held {
            return;
        }
        if self.count < VERIFY_TARGET {
            self.count += 1;
            if self.count >= VERIFY_TARGET && !self.verified {
                self.verified = true;
                info!(count = self.count, "Pattern verified — strategy active");
            }
        }
    }

    /// Manual override: set the counter directly and recompute the flag
    /// as `count >= VERIFY_TARGET`. The count is clamped to 0..=target.
    pub fn override_count(&mut self, count: u8) {
        self.count = count.min(VERIFY_TARGET);
        self.verified = self.count >= VERIFY_TARGET;
        info!(
            count = self.count,
            verified = self.verified,
            "Verification count overridden"
        );
    }

    /// Manual override: force the flag independent of the counter.
    /// `verified == true` with `count < 4` is a deliberate escape hatch.
    pub fn force_verified(&mut self, verified: bool) {
        self.verified = verified;
        info!(
            count = self.count,
            verified, "Verification flag forced"
        );
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.verified = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
