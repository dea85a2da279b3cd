//! Server configuration from environment variables.

use std::env;
use std::str::FromStr;

use http::HeaderValue;
use jsonwebtoken::Algorithm;
use notes_core::{NoteIdStrategy, User};
use tower_http::cors::{Any, CorsLayer};

/// Where notes are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL, configured through `DATABASE_URL`.
    Postgres,
    /// Process memory. Lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("expected postgres or memory, got {other:?}")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected text or json, got {other:?}")),
        }
    }
}

/// Origins allowed by CORS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`
    Any,
    List(Vec<HeaderValue>),
}

impl CorsOrigins {
    /// Parse `*` or a comma-separated origin list.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim() == "*" {
            return Ok(Self::Any);
        }
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidValue {
                    name: "CORS_ALLOWED_ORIGINS".to_string(),
                    reason: format!("not a valid origin: {origin:?}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }

    /// The CORS layer for these origins. Any method and header is allowed.
    pub fn layer(&self) -> CorsLayer {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        match self {
            Self::Any => cors.allow_origin(Any),
            Self::List(origins) => cors.allow_origin(origins.clone()),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// CORS allowed origins.
    pub cors_allowed_origins: CorsOrigins,
    /// Path the notes routes are nested under. Empty mounts them at `/`.
    pub api_prefix: String,
    /// Storage backend.
    pub store_backend: StoreBackend,
    /// Users provisioned at startup, each with its root folder.
    pub seed_users: Vec<User>,
    /// Public key in PEM format for JWT validation.
    /// If empty, every token is rejected unless dev identity is allowed.
    pub jwt_public_key: String,
    /// Signature algorithm expected on tokens.
    pub jwt_algorithm: Algorithm,
    /// Required `iss` claim, if any.
    pub jwt_issuer: Option<String>,
    /// Required `aud` claim, if any.
    pub jwt_audience: Option<String>,
    /// Treat the bearer token itself as the uid (dev mode only).
    pub allow_dev_identity: bool,
    /// How new notes get their ids.
    pub note_id_strategy: NoteIdStrategy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            cors_allowed_origins: CorsOrigins::Any,
            api_prefix: String::new(),
            store_backend: StoreBackend::Postgres,
            seed_users: Vec::new(),
            jwt_public_key: String::new(),
            jwt_algorithm: Algorithm::EdDSA,
            jwt_issuer: None,
            jwt_audience: None,
            allow_dev_identity: false,
            note_id_strategy: NoteIdStrategy::ContentHash,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `PORT`: Server port (default: 3000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `LOG_FORMAT`: "text" or "json" (default: "text")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `API_PREFIX`: Mount point for the notes routes (default: none)
    /// - `STORE_BACKEND`: "postgres" or "memory" (default: "postgres")
    /// - `SEED_USERS`: `uid:root` pairs, comma-separated
    /// - `JWT_PUBLIC_KEY`: PEM public key for token validation
    /// - `JWT_ALGORITHM`: "EdDSA", "RS256" or "ES256" (default: "EdDSA")
    /// - `JWT_ISSUER`, `JWT_AUDIENCE`: required claims
    /// - `ALLOW_DEV_IDENTITY`: "true" to accept the token as the uid
    /// - `NOTE_ID_STRATEGY`: "content-hash" or "random"
    ///
    /// The database itself is configured by `notes_store::StoreConfig`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT".to_string(),
                reason: format!("not a port number: {raw:?}"),
            })?,
            None => defaults.port,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_format = parse_var(&lookup, "LOG_FORMAT")?.unwrap_or(defaults.log_format);

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => CorsOrigins::parse(&raw)?,
            None => defaults.cors_allowed_origins,
        };

        let api_prefix = normalize_prefix(&lookup("API_PREFIX").unwrap_or_default());

        let store_backend =
            parse_var(&lookup, "STORE_BACKEND")?.unwrap_or(defaults.store_backend);

        let seed_users = match lookup("SEED_USERS") {
            Some(raw) => parse_seed_users(&raw)?,
            None => Vec::new(),
        };

        let jwt_public_key = lookup("JWT_PUBLIC_KEY").unwrap_or_default();

        let jwt_algorithm = match lookup("JWT_ALGORITHM") {
            Some(raw) => parse_algorithm(&raw)?,
            None => defaults.jwt_algorithm,
        };

        let jwt_issuer = lookup("JWT_ISSUER").filter(|s| !s.trim().is_empty());
        let jwt_audience = lookup("JWT_AUDIENCE").filter(|s| !s.trim().is_empty());

        let allow_dev_identity = lookup("ALLOW_DEV_IDENTITY")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let note_id_strategy = match lookup("NOTE_ID_STRATEGY") {
            Some(raw) => raw.parse().map_err(|e: notes_core::UnknownStrategy| {
                ConfigError::InvalidValue {
                    name: "NOTE_ID_STRATEGY".to_string(),
                    reason: e.to_string(),
                }
            })?,
            None => defaults.note_id_strategy,
        };

        Ok(Self {
            port,
            log_level,
            log_format,
            cors_allowed_origins,
            api_prefix,
            store_backend,
            seed_users,
            jwt_public_key,
            jwt_algorithm,
            jwt_issuer,
            jwt_audience,
            allow_dev_identity,
            note_id_strategy,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = String>,
{
    lookup(name)
        .map(|raw| {
            raw.parse().map_err(|reason| ConfigError::InvalidValue {
                name: name.to_string(),
                reason,
            })
        })
        .transpose()
}

/// `"/notes/"` → `"/notes"`, `"notes"` → `"/notes"`, `"/"` → `""`.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_seed_users(raw: &str) -> Result<Vec<User>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once(':') {
            Some((uid, root)) if !uid.is_empty() && !root.is_empty() => Ok(User::new(uid, root)),
            _ => Err(ConfigError::InvalidValue {
                name: "SEED_USERS".to_string(),
                reason: format!("expected uid:root, got {pair:?}"),
            }),
        })
        .collect()
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: "JWT_ALGORITHM".to_string(),
        reason,
    };
    let algorithm = Algorithm::from_str(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match algorithm {
        Algorithm::EdDSA | Algorithm::RS256 | Algorithm::ES256 => Ok(algorithm),
        other => Err(invalid(format!("unsupported algorithm {other:?}"))),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
