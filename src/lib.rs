mod auth;
mod case_insensitive_string_ext;
mod error;
mod identity;
mod memory;
mod password;
mod routes;
mod service;
mod settings;
mod token;
mod types;

pub use auth::*;
pub use error::*;
pub use identity::*;
pub use memory::*;
pub use password::*;
pub use routes::*;
pub use service::*;
pub use settings::*;
pub use token::*;
pub use types::*;
