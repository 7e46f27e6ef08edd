use warp::reject::Reject;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("an account with that email already exists")]
    DuplicateEmail,
    #[error("{0}")]
    Validation(String),
    #[error("email or password incorrect")]
    InvalidCredentials,
    #[error("missing bearer token")]
    MissingToken,
    /// Malformed, badly signed and expired tokens all land here.
    #[error("invalid token")]
    InvalidToken {
        #[from]
        source: Option<jsonwebtoken::errors::Error>,
    },
    #[error("user not found")]
    UserNotFound,
    #[error("error during database operation")]
    DatabaseError {
        #[from]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("error hashing password")]
    HashingError {
        #[from]
        source: argon2::Error,
    },
    #[error("error issuing token")]
    TokenIssueError {
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

impl AuthError {
    pub(crate) fn invalid_token() -> Self {
        AuthError::InvalidToken { source: None }
    }
}

impl Reject for AuthError {}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load {
        #[from]
        source: config::ConfigError,
    },
    #[error("jwt key must be at least {min} bytes, got {len}")]
    KeyTooShort { len: usize, min: usize },
}
