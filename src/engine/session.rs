//! Session state and the per-tick pipeline.
//!
//! One cohesive struct owns everything a session mutates — history,
//! verification, strategy, ledger, run flag — and is only touched through
//! the operations below. Each tick runs the full pipeline synchronously:
//! generate → record → verify → settle → propose → depletion check.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::engine::generator::RoundGenerator;
use crate::engine::ledger::Ledger;
use crate::engine::pattern;
use crate::engine::strategy::{BetStrategy, Settlement};
use crate::engine::verification::VerificationTracker;
use crate::types::{RoundOutcome, Snapshot, Winner};

/// Most-recent-first display window over the round history.
pub const RECENT_CAP: usize = 10;

/// What one tick did, for the driver layer to log or render.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub round: RoundOutcome,
    pub settlement: Option<Settlement>,
    /// Whether the parity rule held for the transition into this round.
    pub check_passed: bool,
    /// The tick ended in a depletion reset; the session is now paused and
    /// back at its initial state.
    pub depleted: bool,
}

pub struct Session {
    config: SessionConfig,
    generator: RoundGenerator,
    history: Vec<RoundOutcome>,
    recent: VecDeque<RoundOutcome>,
    verification: VerificationTracker,
    strategy: BetStrategy,
    ledger: Ledger,
    strategy_enabled: bool,
    running: bool,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_generator(config, RoundGenerator::new())
    }

    /// Deterministic session for tests and replays.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        Self::with_generator(config, RoundGenerator::with_seed(seed))
    }

    fn with_generator(config: SessionConfig, generator: RoundGenerator) -> Self {
        let strategy_enabled = config.strategy_enabled;
        Self {
            strategy: BetStrategy::new(config.initial_bet),
            ledger: Ledger::new(config.initial_bankroll),
            config,
            generator,
            history: Vec::new(),
            recent: VecDeque::with_capacity(RECENT_CAP),
            verification: VerificationTracker::new(),
            strategy_enabled,
            running: false,
            started_at: Utc::now(),
        }
    }

    // -- Tick pipeline -----------------------------------------------------

    /// Generate one round and drive it through the pipeline.
    pub fn tick(&mut self) -> TickReport {
        let round = self.generator.generate();
        self.apply(round)
    }

    /// Drive a given round through the pipeline. This is the deterministic
    /// seam: `tick` is `generate` + `apply`, and harnesses feed scripted
    /// rounds here directly.
    pub fn apply(&mut self, round: RoundOutcome) -> TickReport {
        debug!(round = %round, "Round drawn");

        self.history.push(round);
        self.recent.push_front(round);
        self.recent.truncate(RECENT_CAP);

        let mut settlement = None;
        let mut check_passed = false;

        // Tie rounds are fully inert: recorded above, nothing else moves.
        if let Some(winner) = round.winner.side() {
            check_passed = pattern::check(&self.history);
            self.verification.record(check_passed);

            if self.verification.is_verified() && self.strategy_enabled {
                // Settlement uses the proposal made strictly before this
                // round was drawn; the new proposal is for the next one.
                settlement = self.strategy.settle(winner);
                if let Some(s) = &settlement {
                    self.ledger.apply(s);
                }
                self.strategy.propose(&self.history);
            }
        }

        let depleted = self.ledger.is_depleted();
        if depleted {
            warn!(
                bankroll = self.ledger.bankroll(),
                "Bankroll depleted — resetting session"
            );
            self.reset();
        }

        TickReport {
            round,
            settlement,
            check_passed,
            depleted,
        }
    }

    // -- Session operations --------------------------------------------------

    /// Full reset: bankroll, bet progression, history, verification, tallies.
    /// Forces the session into the paused state.
    pub fn reset(&mut self) {
        self.ledger.reset(self.config.initial_bankroll);
        self.strategy.reset(self.config.initial_bet);
        self.history.clear();
        self.recent.clear();
        self.verification.reset();
        self.running = false;
        self.started_at = Utc::now();
    }

    /// Replace the configuration wholesale and reset the session.
    pub fn apply_config(&mut self, config: SessionConfig) {
        self.strategy_enabled = config.strategy_enabled;
        self.config = config;
        self.reset();
    }

    /// Toggle strategy participation without resetting anything.
    pub fn set_strategy_enabled(&mut self, enabled: bool) {
        self.strategy_enabled = enabled;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Manual verification override: set the counter, recompute the flag.
    pub fn override_verification(&mut self, count: u8) {
        self.verification.override_count(count);
    }

    /// Manual verification override: force the flag regardless of count.
    pub fn force_verified(&mut self, verified: bool) {
        self.verification.force_verified(verified);
    }

    // -- Views ---------------------------------------------------------------

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &[RoundOutcome] {
        &self.history
    }

    /// Most-recent-first window, at most [`RECENT_CAP`] rounds.
    pub fn recent_results(&self) -> impl Iterator<Item = &RoundOutcome> {
        self.recent.iter()
    }

    pub fn bankroll(&self) -> i64 {
        self.ledger.bankroll()
    }

    pub fn verification(&self) -> &VerificationTracker {
        &self.verification
    }

    pub fn strategy(&self) -> &BetStrategy {
        &self.strategy
    }

    /// Full derived dashboard snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let initial = self.config.initial_bankroll;
        let profit = self.ledger.profit(initial);
        let mut player_wins = 0;
        let mut banker_wins = 0;
        let mut ties = 0;
        for r in &self.history {
            match r.winner {
                Winner::Player => player_wins += 1,
                Winner::Banker => banker_wins += 1,
                Winner::Tie => ties += 1,
            }
        }

        Snapshot {
            bankroll: self.ledger.bankroll(),
            profit,
            profit_pct: profit as f64 / initial as f64 * 100.0,
            bet_amount: self.strategy.bet_amount(),
            current_bet: self.strategy.current_bet(),
            win_rate: self.ledger.win_rate(),
            wins: self.ledger.wins(),
            losses: self.ledger.losses(),
            consecutive_losses: self.strategy.consecutive_losses(),
            verification_count: self.verification.count(),
            verified: self.verification.is_verified(),
            player_wins,
            banker_wins,
            ties,
            rounds_played: self.history.len() as u64,
            strategy_enabled: self.strategy_enabled,
            running: self.running,
            uptime_secs: (Utc::now() - self.started_at).num_seconds(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    // Script helpers: score pairs pinned to a winner/parity combination.
    fn odd_player() -> RoundOutcome {
        RoundOutcome::new(5, 4)
    }
    fn odd_banker() -> RoundOutcome {
        RoundOutcome::new(4, 5)
    }
    fn even_banker() -> RoundOutcome {
        RoundOutcome::new(4, 6)
    }
    fn tie() -> RoundOutcome {
        RoundOutcome::new(6, 6)
    }

    fn session() -> Session {
        Session::new(SessionConfig::default())
    }

    /// Feed odd-player continuations until the tracker verifies and a
    /// Player bet is proposed.
    fn verified_session() -> Session {
        let mut s = session();
        for _ in 0..5 {
            s.apply(odd_player());
        }
        assert!(s.verification().is_verified());
        assert_eq!(s.strategy().current_bet(), Some(Side::Player));
        s
    }

    #[test]
    fn test_session_is_send_and_sync() {
        // Required for sharing behind Arc<RwLock<_>> across the API tasks.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Session>();
    }

    #[test]
    fn test_initial_snapshot() {
        let s = session();
        let snap = s.snapshot();
        assert_eq!(snap.bankroll, 1000);
        assert_eq!(snap.profit, 0);
        assert_eq!(snap.bet_amount, 10);
        assert_eq!(snap.current_bet, None);
        assert_eq!(snap.rounds_played, 0);
        assert!(!snap.verified);
        assert!(!snap.running);
    }

    #[test]
    fn test_history_and_recent_grow() {
        let mut s = session();
        for _ in 0..12 {
            s.apply(odd_player());
        }
        assert_eq!(s.history().len(), 12);
        assert_eq!(s.recent_results().count(), RECENT_CAP);
    }

    #[test]
    fn test_recent_is_most_recent_first() {
        let mut s = session();
        s.apply(odd_player());
        s.apply(odd_banker());
        let recent: Vec<_> = s.recent_results().copied().collect();
        assert_eq!(recent[0], odd_banker());
        assert_eq!(recent[1], odd_player());
    }

    #[test]
    fn test_verification_counts_up_without_bets() {
        let mut s = session();
        s.apply(odd_player());
        assert_eq!(s.snapshot().verification_count, 0); // only one decisive round
        s.apply(odd_player());
        assert_eq!(s.snapshot().verification_count, 1); // odd continuation held
        s.apply(odd_banker());
        assert_eq!(s.snapshot().verification_count, 1); // continuation broken
        // No bets settled while unverified.
        assert_eq!(s.snapshot().bankroll, 1000);
        assert_eq!(s.snapshot().wins + s.snapshot().losses, 0);
    }

    #[test]
    fn test_proposal_made_on_verification_tick() {
        let mut s = session();
        for i in 0..5 {
            let before = s.verification().is_verified();
            s.apply(odd_player());
            if i < 4 {
                assert_eq!(s.strategy().current_bet(), None, "no proposal yet at {i}");
            }
            if !before && s.verification().is_verified() {
                // The gate opened on this tick and the proposal landed.
                assert_eq!(s.strategy().current_bet(), Some(Side::Player));
            }
        }
    }

    #[test]
    fn test_settlement_uses_prior_proposal() {
        let mut s = verified_session();
        // Proposal stands at Player. Feed an even banker round: the bet
        // active now was made before this round, so it loses at the old
        // stake, and the new proposal (Even Banker → Player) is for later.
        let report = s.apply(even_banker());
        assert_eq!(
            report.settlement,
            Some(Settlement::Lost {
                side: Side::Player,
                amount: 10
            })
        );
        assert_eq!(s.bankroll(), 990);
        assert_eq!(s.strategy().current_bet(), Some(Side::Player));
        assert_eq!(s.strategy().bet_amount(), 20);
    }

    #[test]
    fn test_win_adjusts_bankroll_by_exactly_bet() {
        let mut s = verified_session();
        let report = s.apply(odd_player());
        assert_eq!(
            report.settlement,
            Some(Settlement::Won {
                side: Side::Player,
                amount: 10
            })
        );
        assert_eq!(s.bankroll(), 1010);
        assert_eq!(s.snapshot().wins, 1);
    }

    #[test]
    fn test_tie_round_is_inert() {
        let mut s = verified_session();
        let before = s.snapshot();
        let report = s.apply(tie());
        let after = s.snapshot();

        assert_eq!(report.settlement, None);
        assert!(!report.check_passed);
        assert_eq!(after.bankroll, before.bankroll);
        assert_eq!(after.bet_amount, before.bet_amount);
        assert_eq!(after.current_bet, before.current_bet);
        assert_eq!(after.wins, before.wins);
        assert_eq!(after.losses, before.losses);
        assert_eq!(after.verification_count, before.verification_count);
        // But the tie is recorded.
        assert_eq!(after.rounds_played, before.rounds_played + 1);
        assert_eq!(after.ties, before.ties + 1);
    }

    #[test]
    fn test_strategy_disabled_leaves_bet_unchanged() {
        let mut s = verified_session();
        s.set_strategy_enabled(false);
        let report = s.apply(even_banker());
        assert_eq!(report.settlement, None);
        assert_eq!(s.bankroll(), 1000);
        // Last proposal stays on display.
        assert_eq!(s.strategy().current_bet(), Some(Side::Player));
        s.set_strategy_enabled(true);
        // Re-enabled: the standing proposal settles against the next round.
        let report = s.apply(odd_banker());
        assert!(matches!(report.settlement, Some(Settlement::Lost { .. })));
    }

    #[test]
    fn test_depletion_triggers_full_reset() {
        let config = SessionConfig {
            initial_bankroll: 100,
            initial_bet: 100,
            ..Default::default()
        };
        let mut s = Session::new(config);
        s.start();
        s.force_verified(true);
        s.apply(odd_player()); // proposes Player at 100
        assert_eq!(s.strategy().current_bet(), Some(Side::Player));

        let report = s.apply(even_banker()); // loses 100 → bankroll 0
        assert!(report.depleted);

        let snap = s.snapshot();
        assert_eq!(snap.bankroll, 100);
        assert_eq!(snap.bet_amount, 100);
        assert_eq!(snap.rounds_played, 0);
        assert_eq!(snap.verification_count, 0);
        assert!(!snap.verified);
        assert_eq!(snap.current_bet, None);
        assert_eq!(snap.wins + snap.losses, 0);
        assert!(!snap.running, "depletion forces pause");
    }

    #[test]
    fn test_manual_reset_matches_depletion_reset() {
        let mut s = verified_session();
        s.start();
        s.apply(even_banker());
        s.reset();
        let snap = s.snapshot();
        assert_eq!(snap.bankroll, 1000);
        assert_eq!(snap.rounds_played, 0);
        assert!(!snap.verified);
        assert!(!snap.running);
    }

    #[test]
    fn test_apply_config_resets() {
        let mut s = verified_session();
        s.start();
        s.apply_config(SessionConfig {
            initial_bankroll: 500,
            initial_bet: 5,
            tick_interval_ms: 200,
            strategy_enabled: true,
        });
        let snap = s.snapshot();
        assert_eq!(snap.bankroll, 500);
        assert_eq!(snap.bet_amount, 5);
        assert_eq!(snap.rounds_played, 0);
        assert!(!snap.running);
        assert_eq!(s.config().tick_interval_ms, 200);
    }

    #[test]
    fn test_forced_verification_escape_hatch() {
        let mut s = session();
        s.force_verified(true);
        let snap = s.snapshot();
        assert!(snap.verified);
        assert_eq!(snap.verification_count, 0);
        // A decisive round now produces a proposal immediately.
        s.apply(odd_player());
        assert_eq!(s.strategy().current_bet(), Some(Side::Player));
    }

    #[test]
    fn test_override_verification_count() {
        let mut s = session();
        s.override_verification(4);
        assert!(s.snapshot().verified);
        s.override_verification(1);
        let snap = s.snapshot();
        assert_eq!(snap.verification_count, 1);
        assert!(!snap.verified);
    }

    #[test]
    fn test_seeded_tick_loop_invariants() {
        let mut s = Session::with_seed(SessionConfig::default(), 1234);
        s.start();
        let mut last_count = 0u8;
        for _ in 0..200 {
            let report = s.tick();
            let snap = s.snapshot();

            // Bankroll never displayed at or below zero post-tick.
            assert!(snap.bankroll > 0);
            // Counter is monotone except across a depletion reset.
            if report.depleted {
                last_count = 0;
                s.start();
            } else {
                assert!(snap.verification_count >= last_count);
                last_count = snap.verification_count;
            }
            if snap.verification_count >= 4 {
                assert!(snap.verified);
            }
            assert_eq!(
                snap.rounds_played,
                snap.player_wins + snap.banker_wins + snap.ties
            );
        }
    }
}
