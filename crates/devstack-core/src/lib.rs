//! # devstack-core
//!
//! Core types, errors, and utilities shared by the devstack crates.
//!
//! This crate provides:
//! - [`DevstackError`] - Error type for every devstack operation
//! - [`types`] - Closed option sets (database, blockchain, tokens, release channel)
//! - [`config`] - Home directory layout and `config.yaml` loading
//! - [`logging`] - Tracing setup
//!
//! ## Example
//!
//! ```no_run
//! use devstack_core::types::{Database, resolve};
//!
//! fn main() -> devstack_core::Result<()> {
//!     let config = devstack_core::DevstackConfig::load(None)?;
//!     let _guard = devstack_core::init_logging(config.log_dir.clone(), false)?;
//!
//!     let database: Database = resolve("postgres")?;
//!     tracing::info!(%database, "database selected");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export main types for convenience
pub use config::DevstackConfig;
pub use error::{DevstackError, Result};
pub use logging::{LogGuard, init_logging};
pub use types::{
    BlockchainNodeProvider, BlockchainProvider, BlockchainSelection, Database, ReleaseChannel,
    Selection, TokenProvider,
};
