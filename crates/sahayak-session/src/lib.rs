//! In-memory session state for multi-turn conversations.
//!
//! Sessions accumulate a user profile and a bounded turn history. They are
//! ephemeral: idle sessions expire after a configurable timeout and the store
//! enforces a capacity ceiling by evicting the longest-idle session. A
//! background sweeper reclaims expired sessions between requests.

pub mod store;
pub mod sweep;

pub use store::{Session, SessionError, SessionStore, TurnRecord};
pub use sweep::SessionSweeper;
