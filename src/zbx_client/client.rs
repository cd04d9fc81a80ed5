use std::fmt::Write as FmtWrite;
use std::time::{Duration, Instant};

use backoff::ExponentialBackoffBuilder;
use backoff::backoff::Backoff;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::Result;
use crate::config::Config;
use crate::error::{ConfigError, Error, ZbxError};

use super::rpc::{RpcEnvelope, RpcRequest, body_preview};
use super::session::Transport;

const CORRELATION_HEADER: &str = "x-correlation-id";

/// JSON-RPC 2.0 transport over HTTP.
///
/// Cloning is cheap and clones share the connection pool, so one client can
/// serve concurrent queries.
#[derive(Clone)]
pub struct ZbxClient {
    http: reqwest::Client,
    base: Url,
    token: SecretString,
    timeout: Duration,
    max_attempts: usize,
}

impl ZbxClient {
    /// Build a `ZbxClient` configured with the supplied parameters.
    ///
    /// The client makes a single attempt per call; see
    /// [`ZbxClient::with_max_attempts`] to enable retries.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTPS is required but the URL uses HTTP, or if the
    /// underlying HTTP client fails to build.
    pub fn new(
        base: Url,
        token: SecretString,
        timeout: Duration,
        connect_timeout: Duration,
        insecure_http: bool,
    ) -> Result<Self> {
        if base.scheme() != "https" && !insecure_http {
            return Err(Error::Config(ConfigError::InvalidField {
                field: "zabbix.url",
                message: "only https URLs are accepted without --insecure".to_string(),
            }));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json-rpc"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .user_agent(concat!("zbxapi/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(30));

        if !insecure_http {
            builder = builder.https_only(true);
        }

        let http = builder
            .build()
            .map_err(|err| ZbxError::Client { source: err })?;

        Ok(Self {
            http,
            base,
            token,
            timeout,
            max_attempts: 1,
        })
    }

    /// # Errors
    ///
    /// Same as [`ZbxClient::new`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.base_url.clone(),
            config.token.clone(),
            config.http_request_timeout,
            config.http_connect_timeout,
            config.insecure_http,
        )?
        .with_max_attempts(config.max_attempts))
    }

    /// Allow up to `attempts` tries for transport failures, server errors and
    /// unreadable envelopes. API errors are never retried.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub(super) async fn call(&self, method: &str, params: &Value) -> Result<Value> {
        let mut backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(200))
            .with_multiplier(2.0)
            .with_randomization_factor(0.25)
            .with_max_interval(Duration::from_secs(2))
            .with_max_elapsed_time(Some(self.timeout))
            .build();

        let mut attempt = 0;
        loop {
            attempt += 1;
            let correlation_id = Uuid::now_v7().to_string();
            let started = Instant::now();

            let zerr = match self.send_once(method, params, attempt, &correlation_id).await {
                Ok(result) => {
                    debug!(
                        method,
                        %correlation_id,
                        attempt,
                        latency_ms = started.elapsed().as_millis(),
                        "zabbix call succeeded"
                    );
                    return Ok(result);
                }
                Err(zerr) if zerr.is_retriable() => zerr,
                Err(zerr) => return Err(zerr.into()),
            };

            let delay = if attempt < self.max_attempts {
                backoff.next_backoff()
            } else {
                None
            };
            match delay {
                Some(delay) => {
                    warn!(
                        method,
                        %correlation_id,
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %zerr,
                        "retrying zabbix call"
                    );
                    sleep(delay).await;
                }
                None if attempt > 1 => {
                    return Err(ZbxError::RetryExhausted {
                        source: Box::new(zerr),
                    }
                    .into());
                }
                None => return Err(zerr.into()),
            }
        }
    }

    async fn send_once(
        &self,
        method: &str,
        params: &Value,
        id: usize,
        correlation_id: &str,
    ) -> std::result::Result<Value, ZbxError> {
        let payload = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: id as u64,
            auth: self.token.expose_secret(),
        };
        let response = self
            .http
            .post(self.base.clone())
            .header(CORRELATION_HEADER, correlation_id)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZbxError::HttpStatus { status });
        }

        let body = response.bytes().await?;
        let envelope: RpcEnvelope = serde_json::from_slice(&body).map_err(|err| {
            let mut message = format!("error decoding response body: {err}; body preview: ");
            let _ = FmtWrite::write_str(&mut message, &body_preview(&body));
            ZbxError::Json { message }
        })?;

        if let Some(err) = envelope.error {
            let mut message = err.message;
            if let Some(data) = err.data {
                let _ = FmtWrite::write_fmt(&mut message, format_args!(" - {data}"));
            }
            return Err(ZbxError::Api {
                code: err.code,
                message,
            });
        }

        envelope
            .result
            .ok_or(ZbxError::MissingField { field: "result" })
    }
}

impl Transport for ZbxClient {
    async fn get<P, R>(&self, method: &'static str, params: &P) -> Result<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let params = serde_json::to_value(params).map_err(|source| ZbxError::Encode {
            method: method.to_string(),
            source,
        })?;
        let result = self.call(method, &params).await?;
        serde_json::from_value(result).map_err(|source| {
            ZbxError::Decode {
                method: method.to_string(),
                source,
            }
            .into()
        })
    }
}
