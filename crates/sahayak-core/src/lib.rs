//! Shared types, configuration, and errors for the Sahayak assistant.
//!
//! Sahayak matches citizens to government assistance programs through a
//! multilingual voice/text conversation. This crate holds everything the
//! subsystem crates have in common: language codes, the incremental user
//! profile, configuration sections, and the top-level error type.

pub mod config;
pub mod error;
pub mod language;
pub mod logging;
pub mod profile;

pub use config::SahayakConfig;
pub use error::{Result, SahayakError};
pub use language::LanguageCode;
pub use profile::{Gender, MaritalStatus, Occupation, ProfileUpdate, UserProfile};
