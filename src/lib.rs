//! # cf-whitelist
//!
//! Whitelists a file of IP addresses in a Cloudflare zone's firewall access
//! rules, one request per address.
//!
//! Addresses are read one per line and submitted strictly in file order, each
//! request completing before the next line is read. The first failure aborts
//! the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cf_whitelist::{Config, Credentials, Processor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new(Credentials::from_env()?, "ip_addresses.txt");
//!     let processor = Processor::new(&config)?;
//!
//!     let zones = processor.zone_choices().await?;
//!     let result = processor
//!         .process_file(&zones[0].value, Some("office egress"), &config.input)
//!         .await?;
//!
//!     result.print_summary();
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Credentials are read from the `EMAIL` and `API_KEY` environment variables.
//! See [`Args`] for the optional command-line overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod lines;
pub mod processor;
pub mod prompt;
pub mod request;

// Re-exports for convenience
pub use action::{Action, replace_params};
pub use client::{ActOptions, ApiClient};
pub use config::{Args, Config, Credentials, get_env};
pub use error::{EXIT_CONFIG, EXIT_FAILURE, Result, WhitelistError};
pub use lines::process_line_by_line;
pub use processor::{AddedRule, ProcessingResult, Processor};
pub use prompt::{Prompt, ask};
pub use request::{AccessRule, AccessRuleRequest, ApiEnvelope, ApiMessage, Zone, ZoneChoice};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
