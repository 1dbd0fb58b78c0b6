use thiserror::Error;

/// The main error type for cf-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Coin symbol that no chain is registered for
  #[error("Unknown coin type: {0}")]
  UnknownCoin(String),

  /// Private key bytes of the wrong width
  #[error("Invalid key material: {0}")]
  InvalidKey(String),

  /// A wallet with the same address already exists
  #[error("Duplicate wallet: {0}")]
  DuplicateWallet(String),

  /// Persistent store failure
  #[error("Store error: {0}")]
  Store(String),

  /// General unexpected error
  #[error("Unexpected error: {0}")]
  Unexpected(String),
}

/// Result type alias for cf-* crates
pub type Result<T> = std::result::Result<T, Error>;
