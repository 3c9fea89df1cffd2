//! Shared types for the BACCSIM engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that engine and server
//! modules can depend on them without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Bet target: one of the two sides a bet can be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Banker,
}

impl Side {
    /// The opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Player => Side::Banker,
            Side::Banker => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Banker => write!(f, "Banker"),
        }
    }
}

/// Outcome of one round: either side, or a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Banker,
    Tie,
}

impl Winner {
    /// The winning side, or `None` for a tie.
    pub fn side(&self) -> Option<Side> {
        match self {
            Winner::Player => Some(Side::Player),
            Winner::Banker => Some(Side::Banker),
            Winner::Tie => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player => write!(f, "Player"),
            Winner::Banker => write!(f, "Banker"),
            Winner::Tie => write!(f, "Tie"),
        }
    }
}

/// Even/Odd classification of the absolute score difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    Even,
    Odd,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "Even"),
            Parity::Odd => write!(f, "Odd"),
        }
    }
}

// ---------------------------------------------------------------------------
// Round outcome
// ---------------------------------------------------------------------------

/// One simulated round. Immutable once constructed; winner and parity are
/// derived from the two scores and can never disagree with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Player score, 0–9.
    pub player_score: u8,
    /// Banker score, 0–9.
    pub banker_score: u8,
    pub winner: Winner,
    pub parity: Parity,
}

impl RoundOutcome {
    /// Build a round from two scores, deriving winner and parity.
    ///
    /// Parity is defined even for tie rounds (diff 0 → Even), though it is
    /// only consumed for non-tie rounds elsewhere.
    pub fn new(player_score: u8, banker_score: u8) -> Self {
        debug_assert!(player_score <= 9 && banker_score <= 9);
        let winner = if player_score > banker_score {
            Winner::Player
        } else if banker_score > player_score {
            Winner::Banker
        } else {
            Winner::Tie
        };
        let parity = if player_score.abs_diff(banker_score) % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        };
        Self {
            player_score,
            banker_score,
            winner,
            parity,
        }
    }

    /// Whether this round produced a winning side (i.e. not a tie).
    pub fn is_decisive(&self) -> bool {
        self.winner != Winner::Tie
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P:{} B:{} → {} ({})",
            self.player_score, self.banker_score, self.winner, self.parity,
        )
    }
}

// ---------------------------------------------------------------------------
// Dashboard snapshot
// ---------------------------------------------------------------------------

/// Full derived state exposed to the driver layer after each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub bankroll: i64,
    /// `bankroll - initial_bankroll`.
    pub profit: i64,
    pub profit_pct: f64,
    pub bet_amount: i64,
    pub current_bet: Option<Side>,
    /// `wins / (wins + losses)` as a fraction; 0 when no bets settled.
    pub win_rate: f64,
    pub wins: u64,
    pub losses: u64,
    pub consecutive_losses: u32,
    pub verification_count: u8,
    pub verified: bool,
    pub player_wins: u64,
    pub banker_wins: u64,
    pub ties: u64,
    pub rounds_played: u64,
    pub strategy_enabled: bool,
    pub running: bool,
    /// Seconds since the session started or was last reset.
    pub uptime_secs: i64,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bankroll={} ({:+}, {:.1}%) | bet={} on {} | W{}/L{} streak={} | verify {}/{}{}",
            self.bankroll,
            self.profit,
            self.profit_pct,
            self.bet_amount,
            self.current_bet
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Waiting...".to_string()),
            self.wins,
            self.losses,
            self.consecutive_losses,
            self.verification_count,
            crate::engine::verification::VERIFY_TARGET,
            if self.verified { " ✓" } else { "" },
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
