//! Bet strategy engine.
//!
//! Settles the outstanding proposal against each decisive round, applies
//! the Martingale progression, and proposes the next bet from the parity
//! rule. The doubling is deliberately uncapped — the progression under
//! study here includes its risk of ruin; depletion handling lives in the
//! ledger, not here.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::pattern;
use crate::types::{RoundOutcome, Side};

/// Result of settling one bet against a decisive round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    Won { side: Side, amount: i64 },
    Lost { side: Side, amount: i64 },
}

impl Settlement {
    /// Signed bankroll delta: `+amount` on a win, `-amount` on a loss.
    pub fn delta(&self) -> i64 {
        match self {
            Settlement::Won { amount, .. } => *amount,
            Settlement::Lost { amount, .. } => -*amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetStrategy {
    current_bet: Option<Side>,
    bet_amount: i64,
    consecutive_losses: u32,
    initial_bet: i64,
}

impl BetStrategy {
    pub fn new(initial_bet: i64) -> Self {
        Self {
            current_bet: None,
            bet_amount: initial_bet,
            consecutive_losses: 0,
            initial_bet,
        }
    }

    pub fn current_bet(&self) -> Option<Side> {
        self.current_bet
    }

    pub fn bet_amount(&self) -> i64 {
        self.bet_amount
    }

    pub fn consecutive_losses(&self) -> u32 {
        self.consecutive_losses
    }

    /// Settle the outstanding proposal against the round's winning side.
    ///
    /// Returns `None` when no proposal exists — the round is observed
    /// without money at risk. The caller gates on verification and the
    /// strategy-enabled flag; by the time this runs the bet is live.
    pub fn settle(&mut self, winner: Side) -> Option<Settlement> {
        let side = self.current_bet?;
        let amount = self.bet_amount;

        let settlement = if side == winner {
            self.bet_amount = self.initial_bet;
            self.consecutive_losses = 0;
            Settlement::Won { side, amount }
        } else {
            self.consecutive_losses += 1;
            self.bet_amount *= 2;
            Settlement::Lost { side, amount }
        };

        info!(
            bet = %side,
            winner = %winner,
            amount,
            next_bet = self.bet_amount,
            streak = self.consecutive_losses,
            won = matches!(settlement, Settlement::Won { .. }),
            "Bet settled"
        );

        Some(settlement)
    }

    /// Propose the next bet from the history including the round just
    /// processed. The proposal settles against the *next* decisive round,
    /// never the one that produced it.
    pub fn propose(&mut self, history: &[RoundOutcome]) -> Option<Side> {
        self.current_bet = pattern::suggest(history);
        debug!(proposal = ?self.current_bet, "Next bet proposed");
        self.current_bet
    }

    /// Clear all strategy state back to the given base bet.
    pub fn reset(&mut self, initial_bet: i64) {
        self.current_bet = None;
        self.bet_amount = initial_bet;
        self.consecutive_losses = 0;
        self.initial_bet = initial_bet;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
