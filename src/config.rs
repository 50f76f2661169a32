//! Environment-driven configuration.
//!
//! Every setting has a default, so an empty environment yields a usable
//! configuration pointing at a local task service.

use crate::task::adapters::algod::DEFAULT_ALGOD_URL;
use crate::task::domain::WalletAddress;
use crate::task::services::{FixtureFallback, UpdatePolicy};
use camino::Utf8PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Task service root used when `GIGBOUNTY_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Ledger confirmation polls used when `GIGBOUNTY_CONFIRMATION_ROUNDS` is unset.
pub const DEFAULT_CONFIRMATION_ROUNDS: u32 = 4;

const API_URL: &str = "GIGBOUNTY_API_URL";
const ALGOD_URL: &str = "GIGBOUNTY_ALGOD_URL";
const REQUEST_TIMEOUT: &str = "GIGBOUNTY_REQUEST_TIMEOUT_SECS";
const FIXTURE_FALLBACK: &str = "GIGBOUNTY_FIXTURE_FALLBACK";
const FIXTURE_FILE: &str = "GIGBOUNTY_FIXTURE_FILE";
const UPDATE_POLICY: &str = "GIGBOUNTY_UPDATE_POLICY";
const SESSION_DIR: &str = "GIGBOUNTY_SESSION_DIR";
const CONFIRMATION_ROUNDS: &str = "GIGBOUNTY_CONFIRMATION_ROUNDS";
const WALLET: &str = "GIGBOUNTY_WALLET";

/// A configuration variable holds an unusable value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid value '{value}' for {variable}: {reason}")]
pub struct ConfigError {
    /// Offending environment variable.
    pub variable: &'static str,
    /// Value found.
    pub value: String,
    /// What was expected.
    pub reason: &'static str,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GigBountyConfig {
    /// Task service root URL.
    pub api_url: String,
    /// Ledger node root URL.
    pub algod_url: String,
    /// Per-request timeout for HTTP calls.
    pub request_timeout: Option<Duration>,
    /// Whether an unreachable service switches to fixture mode.
    pub fixture_fallback: bool,
    /// Fixture tasks loaded in fixture mode.
    pub fixture_file: Option<Utf8PathBuf>,
    /// Optimistic or pessimistic board updates.
    pub update_policy: UpdatePolicy,
    /// Directory holding the persisted session.
    pub session_dir: Option<Utf8PathBuf>,
    /// Ledger confirmation polls before giving up.
    pub confirmation_rounds: u32,
    /// Wallet to connect on startup.
    pub wallet: Option<WalletAddress>,
}

impl Default for GigBountyConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            algod_url: DEFAULT_ALGOD_URL.to_owned(),
            request_timeout: None,
            fixture_fallback: true,
            fixture_file: None,
            update_policy: UpdatePolicy::default(),
            session_dir: None,
            confirmation_rounds: DEFAULT_CONFIRMATION_ROUNDS,
            wallet: None,
        }
    }
}

impl GigBountyConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let request_timeout = read(REQUEST_TIMEOUT)
            .map(|value| {
                parse_with(REQUEST_TIMEOUT, value, "expected whole seconds", |text| {
                    text.parse::<u64>().ok().filter(|secs| *secs > 0)
                })
            })
            .transpose()?
            .map(Duration::from_secs);
        let fixture_fallback = read(FIXTURE_FALLBACK)
            .map(|value| parse_with(FIXTURE_FALLBACK, value, "expected true or false", parse_bool))
            .transpose()?
            .unwrap_or(defaults.fixture_fallback);
        let update_policy = read(UPDATE_POLICY)
            .map(|value| {
                parse_with(
                    UPDATE_POLICY,
                    value,
                    "expected optimistic or pessimistic",
                    UpdatePolicy::parse,
                )
            })
            .transpose()?
            .unwrap_or(defaults.update_policy);
        let confirmation_rounds = read(CONFIRMATION_ROUNDS)
            .map(|value| {
                parse_with(CONFIRMATION_ROUNDS, value, "expected a positive integer", |text| {
                    text.parse::<u32>().ok().filter(|rounds| *rounds > 0)
                })
            })
            .transpose()?
            .unwrap_or(defaults.confirmation_rounds);
        let wallet = read(WALLET)
            .map(|value| {
                parse_with(WALLET, value, "expected a wallet address", |text| {
                    WalletAddress::new(text).ok()
                })
            })
            .transpose()?;

        Ok(Self {
            api_url: read(API_URL).unwrap_or(defaults.api_url),
            algod_url: read(ALGOD_URL).unwrap_or(defaults.algod_url),
            request_timeout,
            fixture_fallback,
            fixture_file: read(FIXTURE_FILE).map(Utf8PathBuf::from),
            update_policy,
            session_dir: read(SESSION_DIR).map(Utf8PathBuf::from),
            confirmation_rounds,
            wallet,
        })
    }

    /// Returns the fallback used when the task service is unreachable.
    #[must_use]
    pub fn fallback(&self) -> FixtureFallback {
        match (self.fixture_fallback, &self.fixture_file) {
            (false, _) => FixtureFallback::Disabled,
            (true, None) => FixtureFallback::Empty,
            (true, Some(path)) => FixtureFallback::File(path.clone()),
        }
    }
}

fn parse_with<T>(
    variable: &'static str,
    value: String,
    reason: &'static str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    parse(&value).ok_or(ConfigError {
        variable,
        value,
        reason,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
