use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;
use url::Url;

use crate::Result;
use crate::error::ConfigError;

use super::defaults::{
    default_connect_timeout, default_max_attempts, default_problem_limit,
    default_request_timeout,
};
use super::env::{env_bool, env_duration, env_parse, env_string};
use super::{Config, HumantimeDuration, MAX_ATTEMPTS_BOUNDS, PROBLEM_LIMIT_BOUNDS};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("ZBXAPI")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) zabbix: RawZabbix,
    #[serde(default)]
    pub(super) problems: RawProblems,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawZabbix {
    pub(super) url: Option<String>,
    pub(super) token: Option<String>,
    #[serde(default = "default_request_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) request_timeout: Duration,
    #[serde(default = "default_connect_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) connect_timeout: Duration,
    #[serde(default = "default_max_attempts")]
    pub(super) max_attempts: usize,
    #[serde(default)]
    pub(super) insecure: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawProblems {
    #[serde(default = "default_problem_limit")]
    pub(super) limit: u32,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(url) = env_string("ZBX_URL")? {
            self.zabbix.url = Some(url);
        }
        if let Some(token) = env_string("ZBX_TOKEN")? {
            self.zabbix.token = Some(token);
        }
        if let Some(timeout) = env_duration("ZBX_TIMEOUT")? {
            self.zabbix.request_timeout = timeout;
        }
        if let Some(timeout) = env_duration("ZBX_CONNECT_TIMEOUT")? {
            self.zabbix.connect_timeout = timeout;
        }
        if let Some(attempts) = env_parse::<usize>("ZBX_MAX_ATTEMPTS")? {
            self.zabbix.max_attempts = attempts;
        }
        if let Some(insecure) = env_bool("ZBX_INSECURE")? {
            self.zabbix.insecure = insecure;
        }
        if let Some(limit) = env_parse::<u32>("ZBX_PROBLEM_LIMIT")? {
            self.problems.limit = limit;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let url_str = self.zabbix.url.ok_or(ConfigError::MissingField {
            field: "zabbix.url",
        })?;
        let token = self.zabbix.token.ok_or(ConfigError::MissingField {
            field: "zabbix.token",
        })?;
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.token",
                message: "token cannot be empty".to_string(),
            }
            .into());
        }
        let base_url = Url::parse(&url_str).map_err(|err| ConfigError::InvalidField {
            field: "zabbix.url",
            message: err.to_string(),
        })?;

        if self.zabbix.request_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.request_timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if self.zabbix.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.connect_timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if !MAX_ATTEMPTS_BOUNDS.contains(&self.zabbix.max_attempts) {
            return Err(ConfigError::InvalidField {
                field: "zabbix.max_attempts",
                message: format!(
                    "expected between {} and {}, got {}",
                    MAX_ATTEMPTS_BOUNDS.start(),
                    MAX_ATTEMPTS_BOUNDS.end(),
                    self.zabbix.max_attempts
                ),
            }
            .into());
        }
        if !PROBLEM_LIMIT_BOUNDS.contains(&self.problems.limit) {
            return Err(ConfigError::InvalidField {
                field: "problems.limit",
                message: format!(
                    "expected between {} and {}, got {}",
                    PROBLEM_LIMIT_BOUNDS.start(),
                    PROBLEM_LIMIT_BOUNDS.end(),
                    self.problems.limit
                ),
            }
            .into());
        }

        Ok(Config {
            base_url,
            token: token.into(),
            http_request_timeout: self.zabbix.request_timeout,
            http_connect_timeout: self.zabbix.connect_timeout,
            max_attempts: self.zabbix.max_attempts,
            insecure_http: self.zabbix.insecure,
            problem_limit: self.problems.limit,
        })
    }
}

impl Default for RawZabbix {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            max_attempts: default_max_attempts(),
            insecure: false,
        }
    }
}

impl Default for RawProblems {
    fn default() -> Self {
        Self {
            limit: default_problem_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use secrecy::ExposeSecret;

    use super::{RawConfig, load};
    use crate::error::{ConfigError, Error};

    fn raw(url: Option<&str>, token: Option<&str>) -> RawConfig {
        let mut raw = RawConfig::default();
        raw.zabbix.url = url.map(str::to_string);
        raw.zabbix.token = token.map(str::to_string);
        raw
    }

    fn invalid_field(raw: RawConfig) -> &'static str {
        match raw.validate_and_build() {
            Err(Error::Config(ConfigError::InvalidField { field, .. })) => field,
            Err(Error::Config(ConfigError::MissingField { field })) => field,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(config) => panic!("config unexpectedly valid: {config:?}"),
        }
    }

    #[test]
    fn defaults_build_a_config() {
        let config = match raw(
            Some("https://zabbix.example.com/api_jsonrpc.php"),
            Some("secret"),
        )
        .validate_and_build()
        {
            Ok(config) => config,
            Err(err) => panic!("valid config rejected: {err}"),
        };
        assert_eq!(config.base_url.host_str(), Some("zabbix.example.com"));
        assert_eq!(config.token.expose_secret(), "secret");
        assert_eq!(config.http_request_timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.problem_limit, 50);
        assert!(!config.insecure_http);
    }

    #[test]
    fn url_and_token_are_required() {
        assert_eq!(invalid_field(raw(None, Some("secret"))), "zabbix.url");
        assert_eq!(
            invalid_field(raw(Some("https://zbx.example.com"), None)),
            "zabbix.token"
        );
        assert_eq!(
            invalid_field(raw(Some("https://zbx.example.com"), Some("  "))),
            "zabbix.token"
        );
        assert_eq!(
            invalid_field(raw(Some("not a url"), Some("secret"))),
            "zabbix.url"
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut attempts = raw(Some("https://zbx.example.com"), Some("secret"));
        attempts.zabbix.max_attempts = 0;
        assert_eq!(invalid_field(attempts), "zabbix.max_attempts");

        let mut timeout = raw(Some("https://zbx.example.com"), Some("secret"));
        timeout.zabbix.request_timeout = Duration::ZERO;
        assert_eq!(invalid_field(timeout), "zabbix.request_timeout");

        let mut limit = raw(Some("https://zbx.example.com"), Some("secret"));
        limit.problems.limit = 0;
        assert_eq!(invalid_field(limit), "problems.limit");
    }

    #[test]
    fn loads_toml_file() {
        let path = std::env::temp_dir().join(format!("zbxapi-{}.toml", uuid::Uuid::new_v4()));
        let contents = r#"
[zabbix]
url = "http://127.0.0.1:8080/api_jsonrpc.php"
token = "file-token"
request_timeout = "30s"
max_attempts = 3
insecure = true

[problems]
limit = 200
"#;
        if let Err(err) = std::fs::write(&path, contents) {
            panic!("failed to write {}: {err}", path.display());
        }
        let loaded = load(&path);
        let _ = std::fs::remove_file(&path);

        let raw = match loaded {
            Ok(raw) => raw,
            Err(err) => panic!("failed to load config: {err}"),
        };
        assert_eq!(raw.zabbix.token.as_deref(), Some("file-token"));
        assert_eq!(raw.zabbix.request_timeout, Duration::from_secs(30));
        assert_eq!(raw.zabbix.connect_timeout, Duration::from_secs(5));
        assert_eq!(raw.zabbix.max_attempts, 3);
        assert!(raw.zabbix.insecure);
        assert_eq!(raw.problems.limit, 200);
    }
}
