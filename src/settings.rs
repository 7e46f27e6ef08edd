use std::{fmt, path::Path};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ConfigError;

/// Shared HMAC secret used to sign and verify tokens.
/// If it changes, every outstanding token stops verifying.
#[derive(Clone)]
pub struct JwtKey(String);

impl JwtKey {
    pub const MIN_LEN: usize = 16;

    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.len() < Self::MIN_LEN {
            return Err(ConfigError::KeyTooShort {
                len: key.len(),
                min: Self::MIN_LEN,
            });
        }
        Ok(Self(key))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtKey(..)")
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_key: JwtKey,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    jwt: RawJwtConfig,
}

#[derive(Debug, Deserialize)]
struct RawJwtConfig {
    key: String,
}

impl AuthConfig {
    pub fn new(jwt_key: JwtKey) -> Self {
        Self { jwt_key }
    }

    /// Loads `jwt.key` from an optional config file, overridden by the environment.
    /// The environment variable is `JWT__KEY`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::default().separator("__"));

        Self::from_config(builder.build()?)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let raw: RawConfig = config.try_deserialize()?;
        Ok(Self::new(JwtKey::new(raw.jwt.key)?))
    }
}
