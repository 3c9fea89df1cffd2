//! Simulation engine — round generation, pattern rule, verification gate,
//! bet progression, and bankroll accounting.

pub mod generator;
pub mod ledger;
pub mod pattern;
pub mod session;
pub mod strategy;
pub mod verification;

pub use session::{Session, TickReport};
