use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(transparent)]
pub struct UserID(pub String);

impl UserID {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Opaque encoded hash. Only comparable through [`crate::PasswordHasher::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[repr(transparent)]
pub struct HashedPassword(pub String);

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: HashedPassword,
}

impl User {
    pub fn new(first_name: &str, last_name: &str, email: &str, password: HashedPassword) -> Self {
        Self {
            id: UserID::new_random(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: normalize_email(email),
            password,
        }
    }

    /// The name carried by the `username` token claim.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// The authenticated caller, rebuilt from the user store on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserID,
    pub email: String,
    pub display_name: String,
}

impl Identity {
    pub fn is_self(&self, user_id: &UserID) -> bool {
        self.user_id == *user_id
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: UserID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl From<&User> for UserDetails {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.display_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// What a caller gets to see of another user's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UserView {
    Full(UserDetails),
    Redacted(PublicUser),
}

impl UserView {
    pub fn for_viewer(viewer: &Identity, target: &User) -> Self {
        if viewer.is_self(&target.id) {
            UserView::Full(target.into())
        } else {
            UserView::Redacted(target.into())
        }
    }
}
