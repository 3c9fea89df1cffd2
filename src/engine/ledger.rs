//! Session bankroll ledger.
//!
//! Owns the authoritative bankroll and the win/loss tallies. The bankroll
//! only ever moves by exactly the settled bet amount, or back to the
//! initial bankroll on reset. Depletion (`bankroll <= 0`) is a defined
//! terminal transition, not an error; the session reacts to it with a
//! full reset.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::strategy::Settlement;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    bankroll: i64,
    wins: u64,
    losses: u64,
}

impl Ledger {
    pub fn new(initial_bankroll: i64) -> Self {
        Self {
            bankroll: initial_bankroll,
            wins: 0,
            losses: 0,
        }
    }

    pub fn bankroll(&self) -> i64 {
        self.bankroll
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn losses(&self) -> u64 {
        self.losses
    }

    /// `bankroll - initial`, given the session's initial bankroll.
    pub fn profit(&self, initial_bankroll: i64) -> i64 {
        self.bankroll - initial_bankroll
    }

    /// Fraction of settled bets won; 0 when nothing has settled.
    pub fn win_rate(&self) -> f64 {
        let settled = self.wins + self.losses;
        if settled == 0 {
            0.0
        } else {
            self.wins as f64 / settled as f64
        }
    }

    /// Apply a settlement's bankroll delta and bump the matching tally.
    pub fn apply(&mut self, settlement: &Settlement) {
        self.bankroll += settlement.delta();
        match settlement {
            Settlement::Won { .. } => self.wins += 1,
            Settlement::Lost { .. } => self.losses += 1,
        }
        if self.is_depleted() {
            warn!(bankroll = self.bankroll, "Bankroll depleted");
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.bankroll <= 0
    }

    pub fn reset(&mut self, initial_bankroll: i64) {
        self.bankroll = initial_bankroll;
        self.wins = 0;
        self.losses = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
