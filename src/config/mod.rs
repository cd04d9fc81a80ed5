use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::Result;
use crate::error::Error as ZbxApiError;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use serde::HumantimeDuration;

const MAX_ATTEMPTS_BOUNDS: RangeInclusive<usize> = 1..=10;
const PROBLEM_LIMIT_BOUNDS: RangeInclusive<u32> = 1..=10_000;

/// Validated client settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub token: SecretString,
    pub http_request_timeout: Duration,
    pub http_connect_timeout: Duration,
    /// Transport attempts per call; `1` disables retries.
    pub max_attempts: usize,
    pub insecure_http: bool,
    /// Default `limit` for problem queries issued by the CLI.
    pub problem_limit: u32,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// Sources, lowest precedence first: the TOML file at `path` (optional),
    /// `ZBXAPI__<SECTION>__<KEY>` variables, then the flat `ZBX_*` overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be read, parsed,
    /// when environment overrides are invalid, or when the resulting values
    /// fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ZbxApiError::from)?;
        raw.apply_env_overrides().map_err(ZbxApiError::from)?;
        raw.validate_and_build()
    }
}
