//! Configuration management for cf-whitelist.
//!
//! Credentials come from the environment and are loaded once at startup.
//! Everything else has a default, so the tool runs without any arguments.

use crate::error::{Result, WhitelistError};
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;

/// Base URL of the Cloudflare v4 API.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Input file name, resolved next to the executable.
pub const DEFAULT_INPUT_FILE: &str = "ip_addresses.txt";

/// Environment variable holding the account email.
pub const EMAIL_VAR: &str = "EMAIL";

/// Environment variable holding the account API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// CLI arguments for cf-whitelist.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cf-whitelist",
    version,
    about = "Whitelist a file of IP addresses in a Cloudflare zone",
    long_about = "Reads one IP address per line from ip_addresses.txt (next to the executable)\n\
                  and creates a whitelist access rule for each one in the selected zone.\n\n\
                  Requires the EMAIL and API_KEY environment variables.",
    after_help = "EXAMPLES:\n    \
        cf-whitelist\n    \
        cf-whitelist --input office.txt --notes \"office egress\"\n    \
        cf-whitelist --zone 023e105f4ecef8ad9ca31a8372d0c353"
)]
pub struct Args {
    /// File with one IP address per line [default: ip_addresses.txt next to the executable]
    #[arg(short, long, env = "CF_WHITELIST_INPUT")]
    pub input: Option<PathBuf>,

    /// Zone id to use instead of choosing one interactively
    #[arg(short, long)]
    pub zone: Option<String>,

    /// Notes attached to every rule, instead of prompting for them
    #[arg(short, long)]
    pub notes: Option<String>,

    /// API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, env = "CF_API_BASE_URL", hide = true)]
    pub base_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Output logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Account credentials sent with every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account email, sent as `x-auth-email`.
    pub email: String,
    /// Global API key, sent as `x-auth-key`.
    pub api_key: SecretString,
}

impl Credentials {
    /// Create credentials from explicit values.
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Load credentials from `EMAIL` and `API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = get_env_with(&lookup, EMAIL_VAR, true)?.unwrap_or_default();
        let api_key = get_env_with(&lookup, API_KEY_VAR, true)?.unwrap_or_default();
        Ok(Self::new(email, api_key))
    }
}

/// Read an environment variable, failing if it is required but unset.
pub fn get_env(key: &str, required: bool) -> Result<Option<String>> {
    get_env_with(|k| std::env::var(k).ok(), key, required)
}

/// Like [`get_env`], reading through `lookup`. Empty values count as unset.
pub fn get_env_with<F>(lookup: F, key: &str, required: bool) -> Result<Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|value| !value.is_empty()) {
        Some(value) => Ok(Some(value)),
        None if required => Err(WhitelistError::MissingEnv {
            key: key.to_string(),
        }),
        None => Ok(None),
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Account credentials.
    pub credentials: Credentials,
    /// Input file with one address per line.
    pub input: PathBuf,
}

impl Config {
    /// Create a configuration with the default base URL and input file.
    pub fn new(credentials: Credentials, input: impl Into<PathBuf>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            input: input.into(),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create configuration from CLI arguments and the environment.
    pub fn from_args(args: &Args) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        let input = match &args.input {
            Some(path) => path.clone(),
            None => default_input_path(),
        };

        Ok(Self::new(credentials, input).with_base_url(&args.base_url))
    }
}

/// `ip_addresses.txt` in the directory of the running executable.
pub fn default_input_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_INPUT_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_FILE))
}
