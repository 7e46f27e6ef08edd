use std::{net::SocketAddr, sync::Arc};

use event_auth::{
    build_api_route_filter, handle_auth_errors, with_identity, Auth, AuthConfig,
    InMemoryUserStore,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use warp::{path, Filter};

// JWT__KEY=some-long-development-secret cargo run --example simple
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // refuse to start without a usable signing key
    let config = AuthConfig::load(None)?;

    let auth = Auth::new(config, Arc::new(InMemoryUserStore::new()));

    let auth_routes = build_api_route_filter(&auth);

    let unsecured_homepage =
        warp::path::end().then(|| async move { warp::reply::html("hello, world!") });

    let whoami = path!("whoami")
        .and(with_identity(&auth))
        .then(|identity| async move { warp::reply::json(&json!({ "identity": identity })) });

    let all_routes = unsecured_homepage
        .or(whoami)
        .or(auth_routes)
        .recover(handle_auth_errors)
        .with(warp::trace::request());

    let addr: SocketAddr = "127.0.0.1:4000".parse()?;
    tracing::info!(%addr, "listening");

    warp::serve(all_routes).run(addr).await;

    Ok(())
}
