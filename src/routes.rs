use std::{convert::Infallible, sync::Arc};

use warp::{
    http::{header::AUTHORIZATION, HeaderMap},
    hyper::StatusCode,
    path, reply, Filter, Rejection, Reply,
};

use crate::{
    auth::{Auth, AuthInternal},
    error::AuthError,
    service::{LoginRequest, RegisterRequest},
    types::{Identity, UserID, UserView},
};

pub fn build_api_route_filter(
    auth: &Auth,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let register = path!("auth" / "register")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_auth_state(auth.internal.clone()))
        .and_then(user_register);

    let login = path!("auth" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_auth_state(auth.internal.clone()))
        .and_then(user_login);

    let me = path!("users" / "me")
        .and(warp::get())
        .and(with_identity(auth))
        .and(with_auth_state(auth.internal.clone()))
        .and_then(current_user);

    let lookup = path!("users" / String)
        .and(warp::get())
        .and(with_identity(auth))
        .and(with_auth_state(auth.internal.clone()))
        .and_then(user_by_id);

    register.or(login).or(me).or(lookup)
}

/// Resolves the `Authorization` header into the caller's [`Identity`].
pub fn with_identity(
    auth: &Auth,
) -> impl Filter<Extract = (Identity,), Error = Rejection> + Clone {
    warp::header::headers_cloned()
        .and(with_auth_state(auth.internal.clone()))
        .and_then(identity_check)
}

pub async fn handle_auth_errors(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(auth_error) = err.find::<AuthError>() {
        let (status, message) = match &auth_error {
            AuthError::MissingToken
            | AuthError::InvalidToken { .. }
            | AuthError::UserNotFound
            | AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
            }
            AuthError::DuplicateEmail => (
                StatusCode::CONFLICT,
                "a user with that email already exists".to_string(),
            ),
            AuthError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            _ => {
                tracing::error!(error = %auth_error, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an unknown error has occurred".to_string(),
                )
            }
        };
        return Ok(reply::with_status(message, status));
    }

    Err(err)
}

async fn user_register(
    input: RegisterRequest,
    auth: Arc<AuthInternal>,
) -> Result<impl Reply, Rejection> {
    let created = auth.users.register(input).await.map_err(|e| {
        tracing::info!(error = %e, "registration rejected");
        e
    })?;

    Ok(reply::with_status(reply::json(&created), StatusCode::CREATED))
}

async fn user_login(
    input: LoginRequest,
    auth: Arc<AuthInternal>,
) -> Result<impl Reply, Rejection> {
    let response = auth.users.login(input).await?;

    Ok(reply::json(&response))
}

async fn current_user(
    identity: Identity,
    auth: Arc<AuthInternal>,
) -> Result<impl Reply, Rejection> {
    let details = auth
        .users
        .user_details(&identity.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(reply::json(&details))
}

async fn user_by_id(
    id: String,
    identity: Identity,
    auth: Arc<AuthInternal>,
) -> Result<impl Reply, Rejection> {
    let target = auth
        .users
        .find_user(&UserID(id))
        .await?
        .ok_or_else(warp::reject::not_found)?;

    Ok(reply::json(&UserView::for_viewer(&identity, &target)))
}

async fn identity_check(
    headers: HeaderMap,
    auth: Arc<AuthInternal>,
) -> Result<Identity, Rejection> {
    let resolved = match authorization_header(&headers) {
        Ok(header) => auth.resolve_identity(header).await,
        Err(e) => Err(e),
    };

    let identity = resolved.map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        e
    })?;

    Ok(identity)
}

// A header that is not visible ASCII cannot carry a token we issued
fn authorization_header(headers: &HeaderMap) -> Result<&str, AuthError> {
    match headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| AuthError::invalid_token()),
        None => Ok(""),
    }
}

// functor that adds a reference to the shared auth state into the filter chain
fn with_auth_state(
    auth: Arc<AuthInternal>,
) -> impl Filter<Extract = (Arc<AuthInternal>,), Error = Infallible> + Clone {
    warp::any().map(move || auth.clone())
}
