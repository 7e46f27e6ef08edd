use std::{net::SocketAddr, sync::Arc};

use event_auth::{
    build_api_route_filter, handle_auth_errors, with_identity, Auth, AuthConfig,
    InMemoryUserStore, JwtKey, LoginResponse, RegisterResponse,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    StatusCode,
};
use serde_json::{json, Value};
use warp::{path, Filter};

const KEY: &str = "TEST_DEV_KEY_123456789012345678901234";

fn start_server() -> SocketAddr {
    let config = AuthConfig::new(JwtKey::new(KEY).unwrap());
    let auth = Auth::new(config, Arc::new(InMemoryUserStore::new()));

    let auth_routes = build_api_route_filter(&auth);

    let unsecured_page =
        path!("insecure").then(|| async move { warp::reply::html("hello, world!") });

    let secure_page = path!("secure")
        .and(with_identity(&auth))
        .then(|identity| async move { warp::reply::json(&json!({ "identity": identity })) });

    let all_routes = unsecured_page
        .or(secure_page)
        .or(auth_routes)
        .recover(handle_auth_errors);

    let (addr, server) = warp::serve(all_routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

struct Client {
    base: String,
    http: reqwest::Client,
}

impl Client {
    async fn register(&self, body: Value) -> reqwest::Response {
        self.http
            .post(format!("{}/auth/register", self.base))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.http
            .post(format!("{}/auth/login", self.base))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.http.get(format!("{}{}", self.base, path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.unwrap()
    }
}

fn ada() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "password": "Password123!"
    })
}

#[tokio::test]
async fn integration() {
    let addr = start_server();
    let client = Client {
        base: format!("http://{addr}"),
        http: reqwest::Client::new(),
    };

    let response = client.register(ada()).await;
    assert_eq!(response.status(), StatusCode::CREATED, "failed to register user");
    let ada_id = response.json::<RegisterResponse>().await.unwrap().user_id;

    assert_eq!(
        client.register(ada()).await.status(),
        StatusCode::CONFLICT,
        "attempt to register the same email twice should have been denied"
    );

    let response = client
        .register(json!({
            "firstName": "Weak",
            "lastName": "Password",
            "email": "weak@example.com",
            "password": "password"
        }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Invalid password format.");

    let response = client
        .register(json!({
            "firstName": "Charles",
            "lastName": "Babbage",
            "email": "charles@example.com",
            "password": "Engine#1837"
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let charles_id = response.json::<RegisterResponse>().await.unwrap().user_id;

    assert_eq!(
        client.login("ada@example.com", "hunter1").await.status(),
        StatusCode::UNAUTHORIZED,
        "attempt to login with an invalid password should have been denied"
    );

    assert_eq!(
        client.login("nobody@example.com", "Password123!").await.status(),
        StatusCode::UNAUTHORIZED,
        "attempt to login as an unknown user should have been denied"
    );

    let response = client.login(" ADA@example.com ", "Password123!").await;
    assert_eq!(response.status(), StatusCode::OK, "failed to login as user");
    let token = response.json::<LoginResponse>().await.unwrap().token;

    assert_eq!(
        client.get("/insecure", None).await.status(),
        StatusCode::OK,
        "failed to fetch insecure page"
    );

    assert_eq!(
        client.get("/secure", None).await.status(),
        StatusCode::UNAUTHORIZED,
        "access to secure page without a token should have been denied"
    );

    assert_eq!(
        client.get("/secure", Some("fake token")).await.status(),
        StatusCode::UNAUTHORIZED,
        "access to secure page with a bad token should have been denied"
    );

    let opaque_header = client
        .http
        .get(format!("{}/secure", client.base))
        .header(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer gar\xe9bage").unwrap(),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(
        opaque_header.status(),
        StatusCode::UNAUTHORIZED,
        "a header that is not visible ASCII should read as an invalid token"
    );

    assert_eq!(
        client.get("/users/me", None).await.status(),
        StatusCode::UNAUTHORIZED,
        "user lookups without a token should have been denied"
    );

    assert_eq!(
        client.get("/secure", Some(&token)).await.status(),
        StatusCode::OK,
        "failed to access secure page with a valid token"
    );

    let me: Value = client.get("/users/me", Some(&token)).await.json().await.unwrap();
    assert_eq!(me["id"], json!(ada_id.0));
    assert_eq!(me["username"], "Ada Lovelace");

    let own: Value = client
        .get(&format!("/users/{}", ada_id.0), Some(&token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(own["username"], "Ada Lovelace");

    let other: Value = client
        .get(&format!("/users/{}", charles_id.0), Some(&token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(other["firstName"], "Charles");
    assert!(other.get("username").is_none(), "other users must be redacted");

    assert_eq!(
        client.get("/users/no-such-user", Some(&token)).await.status(),
        StatusCode::NOT_FOUND
    );

    let expired = encode(
        &Header::default(),
        &json!({
            "id": ada_id.0,
            "email": "ada@example.com",
            "username": "Ada Lovelace",
            "iat": 1_000_000_000u64,
            "exp": 1_000_003_600u64,
        }),
        &EncodingKey::from_secret(KEY.as_bytes()),
    )
    .unwrap();

    assert_eq!(
        client.get("/users/me", Some(&expired)).await.status(),
        StatusCode::UNAUTHORIZED,
        "expired tokens should have been denied"
    );
}
