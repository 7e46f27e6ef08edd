use std::sync::Arc;

use crate::{
    error::AuthError,
    identity::{IdentityResolver, UserStore},
    password::{Argon2PasswordHasher, PasswordHasher},
    service::UserService,
    settings::AuthConfig,
    token::{JwtService, TokenService},
    types::Identity,
};

pub(crate) struct AuthInternal {
    pub(crate) users: UserService,
    resolver: IdentityResolver,
}

impl AuthInternal {
    pub async fn resolve_identity(&self, header: &str) -> Result<Identity, AuthError> {
        self.resolver.resolve_from_authorization_header(header).await
    }
}

/// Shared auth state handed to the warp filters. Cheap to clone.
#[derive(Clone)]
pub struct Auth {
    pub(crate) internal: Arc<AuthInternal>,
}

impl Auth {
    /// Argon2 passwords and HS256 tokens signed with the configured key.
    pub fn new(config: AuthConfig, users: Arc<dyn UserStore>) -> Self {
        Self::with_services(
            users,
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(JwtService::new(&config.jwt_key)),
        )
    }

    pub fn with_services(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        let resolver = IdentityResolver::new(tokens.clone(), users.clone());
        let users = UserService::new(users, hasher, tokens);

        Self {
            internal: Arc::new(AuthInternal { users, resolver }),
        }
    }
}
