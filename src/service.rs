use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::AuthError,
    identity::UserStore,
    password::PasswordHasher,
    token::TokenService,
    types::{normalize_email, User, UserDetails, UserID},
};

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex");
}

const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\"':{}|<>";
const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Registration, login and user lookups on top of the user store.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn register(&self, input: RegisterRequest) -> Result<RegisterResponse, AuthError> {
        let email = normalize_email(&input.email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        if !is_valid_email(&email) {
            return Err(AuthError::Validation("Invalid email format.".into()));
        }

        if !is_valid_password(&input.password) {
            return Err(AuthError::Validation("Invalid password format.".into()));
        }

        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(AuthError::Validation(
                "First name and last name are required.".into(),
            ));
        }

        let hashed_password = self.hasher.hash(&input.password)?;
        let user = User::new(&input.first_name, &input.last_name, &email, hashed_password);

        // a concurrent registration may have claimed the email since the check above
        let stored_id = self.users.create_user_if_not_exists(&user).await?;
        if stored_id != user.id {
            return Err(AuthError::DuplicateEmail);
        }

        tracing::info!(user_id = %user.id.0, "user registered");

        Ok(RegisterResponse {
            user_id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        })
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, input: LoginRequest) -> Result<LoginResponse, AuthError> {
        let email = normalize_email(&input.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::debug!("login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(&user.password, &input.password) {
            tracing::info!(user_id = %user.id.0, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .generate(&user.id, &user.email, &user.display_name())?;

        tracing::info!(user_id = %user.id.0, "login succeeded");

        Ok(LoginResponse { token })
    }

    pub async fn find_user(&self, id: &UserID) -> Result<Option<User>, AuthError> {
        if id.0.trim().is_empty() {
            return Ok(None);
        }
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn user_details(&self, id: &UserID) -> Result<Option<UserDetails>, AuthError> {
        Ok(self.find_user(id).await?.as_ref().map(UserDetails::from))
    }
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// At least eight characters with a lowercase letter, an uppercase letter, a digit and a symbol.
fn is_valid_password(password: &str) -> bool {
    if password.trim().is_empty() || password.chars().count() < PASSWORD_MIN_LEN {
        return false;
    }

    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}
