// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered with figment: built-in defaults, then an optional
//! TOML file, then `SESSIONGATE_`-prefixed environment variables (`__`
//! separates nested keys), then the bare `AUTH_TYPE`, `SESSION_NAME` and
//! `SESSION_DURATION` variables, which win over everything else.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::auth::password::DEFAULT_LOG_N;
use crate::error::AppError;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "SESSIONGATE_";

/// Accepted scrypt work factors
const PASSWORD_COST_RANGE: std::ops::RangeInclusive<u8> = 10..=20;

/// Unprefixed variables mapped onto the `auth` section
const AUTH_ENV_KEYS: [&str; 3] = ["AUTH_TYPE", "SESSION_NAME", "SESSION_DURATION"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where durable records are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub path: PathBuf,
}

/// Authentication settings, read once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Strategy selected for the whole process lifetime
    pub auth_type: AuthType,
    /// Name of the session cookie
    pub session_name: Option<String>,
    /// Session lifetime in seconds; `0` never expires
    pub session_duration: SessionDuration,
    /// Paths that never require authentication; a trailing `*` makes a prefix
    pub excluded_paths: Vec<String>,
    /// scrypt work factor (log2 of N) for newly hashed passwords
    pub password_cost: u8,
}

/// Available authentication strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Every protected request is rejected
    #[default]
    Auth,
    /// `Authorization: Basic` against the user store
    BasicAuth,
    /// Session cookie, in-memory, never expires
    SessionAuth,
    /// Session cookie, in-memory, expires after `session_duration`
    SessionExpAuth,
    /// Session cookie, persisted to the object store
    SessionDbAuth,
}

impl AuthType {
    /// Whether the strategy issues session cookies
    pub fn uses_sessions(self) -> bool {
        matches!(
            self,
            AuthType::SessionAuth | AuthType::SessionExpAuth | AuthType::SessionDbAuth
        )
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            auth_type: AuthType::default(),
            session_name: None,
            session_duration: SessionDuration::NEVER,
            excluded_paths: vec![
                "/api/v1/status/".to_string(),
                "/api/v1/unauthorized/".to_string(),
                "/api/v1/forbidden/".to_string(),
                "/api/v1/auth_session/login/".to_string(),
                "/api/v1/reset_password/".to_string(),
            ],
            password_cost: DEFAULT_LOG_N,
        }
    }
}

impl Settings {
    /// The figment used by [`Settings::load_from`]
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let file = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&AUTH_ENV_KEYS)
                    .map(|key| format!("auth.{}", key.as_str().to_ascii_lowercase()).into()),
            )
    }

    /// Load settings from `config.toml` and the environment
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(None)
    }

    /// Load settings from an explicit config file and the environment
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, AppError> {
        let settings: Settings = Self::figment(config_path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject combinations the server cannot run with
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.port == 0 {
            return Err(AppError::Config("server.port must be non-zero".to_string()));
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(AppError::Config("storage.path must not be empty".to_string()));
        }
        if !PASSWORD_COST_RANGE.contains(&self.auth.password_cost) {
            return Err(AppError::Config(format!(
                "auth.password_cost must be within {}..={}",
                PASSWORD_COST_RANGE.start(),
                PASSWORD_COST_RANGE.end()
            )));
        }
        let has_session_name = self
            .auth
            .session_name
            .as_deref()
            .is_some_and(|name| !name.is_empty());
        if self.auth.auth_type.uses_sessions() && !has_session_name {
            return Err(AppError::Config(format!(
                "{:?} requires SESSION_NAME",
                self.auth.auth_type
            )));
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Session lifetime in whole seconds.
///
/// Deserialization never fails: negative numbers, non-numeric strings and any
/// other malformed input yield `0`, which means sessions never expire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionDuration(u64);

impl SessionDuration {
    pub const NEVER: Self = Self(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Parse a raw configuration value, falling back to [`SessionDuration::NEVER`]
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| u64::try_from(secs).ok())
            .map(Self)
            .unwrap_or_default()
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }

    pub const fn never_expires(self) -> bool {
        self.0 == 0
    }
}

impl<'de> Deserialize<'de> for SessionDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SessionDurationVisitor)
    }
}

struct SessionDurationVisitor;

impl<'de> de::Visitor<'de> for SessionDurationVisitor {
    type Value = SessionDuration;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number of seconds")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(SessionDuration::NEVER)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(u64::try_from(v).map(SessionDuration).unwrap_or_default())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        Ok(u64::try_from(v).map(SessionDuration).unwrap_or_default())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(SessionDuration(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(u64::try_from(v).map(SessionDuration).unwrap_or_default())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(SessionDuration::NEVER)
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<Self::Value, E> {
        Ok(SessionDuration::parse(v.encode_utf8(&mut [0; 4])))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(SessionDuration::parse(v))
    }

    fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<Self::Value, E> {
        Ok(SessionDuration::NEVER)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(SessionDuration::NEVER)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(SessionDuration::NEVER)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        SessionDuration::deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Self::Value, D::Error> {
        SessionDuration::deserialize(deserializer)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(SessionDuration::NEVER)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(SessionDuration::NEVER)
    }
}
