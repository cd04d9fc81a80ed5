use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Zabbix(#[from] ZbxError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("missing required configuration field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ZbxError {
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: reqwest::StatusCode },
    #[error("invalid JSON-RPC envelope: {message}")]
    Json { message: String },
    #[error("failed to encode parameters for {method}: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode {method} result: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid field {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("Zabbix API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("missing field in API response: {field}")]
    MissingField { field: &'static str },
    #[error("{method} matched no records")]
    NotFound { method: &'static str },
    #[error("retry budget exhausted")]
    RetryExhausted {
        #[source]
        source: Box<ZbxError>,
    },
}

/// Rejections raised by the scalar codec while decoding wire values.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CodecError {
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),
    #[error("malformed boolean: {0}")]
    MalformedBoolean(String),
    #[error("malformed number: {0}")]
    MalformedNumber(String),
}

/// Coarse classification callers branch on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Config,
    Transport,
    Api,
    Decode,
    NotFound,
    Telemetry,
}

impl From<reqwest::Error> for ZbxError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_status() {
            if let Some(status) = source.status() {
                return Self::HttpStatus { status };
            }
        }
        Self::Request { source }
    }
}

impl ZbxError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Client { .. }
            | Self::Request { .. }
            | Self::HttpStatus { .. }
            | Self::Json { .. }
            | Self::Encode { .. } => ErrorKind::Transport,
            Self::RetryExhausted { source } => source.kind(),
            Self::Api { .. } | Self::MissingField { .. } => ErrorKind::Api,
            Self::Decode { .. } | Self::InvalidField { .. } => ErrorKind::Decode,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    pub(crate) fn is_retriable(&self) -> bool {
        match self {
            Self::Request { .. } | Self::Json { .. } => true,
            Self::HttpStatus { status } => {
                status.is_server_error() || *status == reqwest::StatusCode::REQUEST_TIMEOUT
            }
            _ => false,
        }
    }
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Zabbix(err) => err.kind(),
            Self::Telemetry(_) => ErrorKind::Telemetry,
        }
    }

    /// True when the call succeeded but matched zero records.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
