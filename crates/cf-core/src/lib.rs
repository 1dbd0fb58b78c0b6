//! # cf-core
//!
//! Shared types for the coin finder workspace: chain identifiers, wallet and
//! statistics records, subscriber events, the persistent store abstraction and
//! environment-based configuration.

pub mod config;
pub mod error;
pub mod event;
pub mod records;
pub mod store;
pub mod types;

pub use config::{FinderConfig, DEFAULT_BRAIN_WORDS};
pub use error::{Error, Result};
pub use event::FinderEvent;
pub use records::{StatsRecord, WalletRecord, WalletSummary};
pub use store::{MemoryStore, WalletStore};
pub use types::{CandidateKey, CoinType};

/// Provider id reported when no balance provider answered.
pub const UNKNOWN_PROVIDER: &str = "unknown";
