use std::{error::Error, sync::Arc};

use async_trait::async_trait;

use crate::{
    case_insensitive_string_ext::CaseInsensitiveStringExt,
    error::AuthError,
    token::TokenService,
    types::{Identity, User, UserID},
};

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Store the given user and return its id. If a user with the same email already exists,
    /// return the id of that user instead and leave the store untouched.
    async fn create_user_if_not_exists(
        &self,
        user: &User,
    ) -> Result<UserID, Box<dyn Error + Send + Sync>>;

    async fn find_by_email(&self, email: &str)
        -> Result<Option<User>, Box<dyn Error + Send + Sync>>;

    async fn find_by_id(&self, id: &UserID) -> Result<Option<User>, Box<dyn Error + Send + Sync>>;
}

/// Turns an `Authorization` header value into the [`Identity`] of the caller.
///
/// Nothing is cached: every call verifies the token and reloads the user, so the
/// identity reflects the stored record rather than what the token was issued with.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: Arc<dyn TokenService>,
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<dyn TokenService>, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    pub async fn resolve_from_authorization_header(
        &self,
        header: &str,
    ) -> Result<Identity, AuthError> {
        if header.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        let token = header
            .strip_prefix_ignore_ascii_case("bearer ")
            .unwrap_or(header);

        let claims = self.tokens.get_claims(token)?;
        let email = claims.email().ok_or_else(AuthError::invalid_token)?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(Identity::from(&user))
    }
}
