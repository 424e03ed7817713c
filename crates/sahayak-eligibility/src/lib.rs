//! Eligibility scoring for Sahayak.
//!
//! A pure, side-effect-free scorer that ranks the program catalog against a
//! partial user profile. Safe to call concurrently from any number of
//! sessions: nothing here mutates shared state.

pub mod advice;
pub mod predicate;
pub mod scorer;

pub use advice::{next_steps, recommendations};
pub use predicate::{Outcome, Predicate};
pub use scorer::{score, MatchFilters, MatchResult};
