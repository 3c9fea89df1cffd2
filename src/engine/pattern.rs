//! Parity pattern rule.
//!
//! Core hypothesis of the strategy: an even score-difference predicts a
//! reversal of the winning side on the next decisive round, an odd
//! difference predicts a continuation. Tie rounds carry no signal and are
//! filtered out before either function looks at the history.

use tracing::debug;

use crate::types::{Parity, RoundOutcome, Side};

/// Suggest the next bet target from the most recent decisive round.
///
/// Returns `None` when the history holds no decisive round yet.
pub fn suggest(history: &[RoundOutcome]) -> Option<Side> {
    let last = history.iter().rev().find(|r| r.is_decisive())?;
    // Decisive round, so side() is always Some.
    let winner = last.winner.side()?;
    let suggestion = match last.parity {
        Parity::Even => winner.opposite(),
        Parity::Odd => winner,
    };
    debug!(
        last = %last,
        suggestion = %suggestion,
        "Pattern suggestion"
    );
    Some(suggestion)
}

/// Did the most recent decisive transition obey the parity rule?
///
/// Returns `false` when fewer than two decisive rounds exist; the tracker
/// ignores failures, so too little data simply does not advance it.
pub fn check(history: &[RoundOutcome]) -> bool {
    let mut decisive = history.iter().rev().filter(|r| r.is_decisive());
    let (Some(curr), Some(prev)) = (decisive.next(), decisive.next()) else {
        return false;
    };
    match prev.parity {
        Parity::Even => prev.winner != curr.winner,
        Parity::Odd => prev.winner == curr.winner,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
