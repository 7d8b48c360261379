//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs sees the file written or replaced
//!     → loader.rs loads and validates it
//!     → LedgerHandle::reconfigure swaps in a client for the new [ledger]
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    ClientConfig, ConfirmationConfig, LedgerConfig, LogFormat, ObservabilityConfig, SignerConfig,
};
pub use watcher::{ConfigWatcher, ReloadOutcome};
