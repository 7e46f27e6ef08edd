use std::{
    collections::BTreeMap,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde_json::Value;

use crate::{error::AuthError, settings::JwtKey, types::UserID};

/// Tokens expire this long after they are issued.
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);

pub trait TokenService: Send + Sync + 'static {
    /// Issue a signed token carrying the `id`, `email` and `username` claims.
    fn generate(&self, id: &UserID, email: &str, username: &str) -> Result<String, AuthError>;

    /// Verify signature and expiry, then return every claim as a string.
    /// Any failure is reported as [`AuthError::InvalidToken`].
    fn get_claims(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Claim name to claim value, read verbatim from a verified token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims(BTreeMap<String, String>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email")
    }

    pub fn username(&self) -> Option<&str> {
        self.get("username")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Claims {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    id: &'a str,
    email: &'a str,
    username: &'a str,
    iat: u64,
    exp: u64,
}

/// HS256 tokens signed with the configured [`JwtKey`].
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(key: &JwtKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // zero skew: a token is dead the second its `exp` passes
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    pub(crate) fn generate_at(
        &self,
        issued_at: u64,
        id: &UserID,
        email: &str,
        username: &str,
    ) -> Result<String, AuthError> {
        let claims = IssuedClaims {
            id: &id.0,
            email,
            username,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME.as_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|source| AuthError::TokenIssueError { source })
    }
}

impl TokenService for JwtService {
    fn generate(&self, id: &UserID, email: &str, username: &str) -> Result<String, AuthError> {
        self.generate_at(unix_now(), id, email, username)
    }

    fn get_claims(&self, token: &str) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::invalid_token());
        }

        let data = decode::<BTreeMap<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|source| AuthError::InvalidToken { source: Some(source) })?;

        Ok(data
            .claims
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect())
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
