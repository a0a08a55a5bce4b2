//! API client tests against a server bound to an ephemeral loopback port

use std::sync::Arc;

use schoolhub::api::{serve, AppState};
use schoolhub::auth::{
    ClientSession, LoginRequest, MemoryTokenStorage, PasswordHasher, RegisterRequest, TokenIssuer,
    MIN_BCRYPT_COST,
};
use schoolhub::client::{user_message, ApiClient, GENERIC_FAILURE};
use schoolhub::error::Error;
use schoolhub::store::MemoryUserStore;
use tokio::net::TcpListener;

/// Start a server and return its base URL
async fn start_test_server() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(
        Arc::new(MemoryUserStore::new()),
        PasswordHasher::new(MIN_BCRYPT_COST),
        Arc::new(TokenIssuer::new(b"client-test-secret", 86_400)),
    );

    let handle = tokio::spawn(async move {
        let _ = serve(listener, Arc::new(state)).await;
    });

    (format!("http://{}", addr), handle)
}

fn client(base_url: &str) -> ApiClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    ApiClient::with_client(base_url, http)
}

fn register_req(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Lee".to_string(),
        email: email.to_string(),
        password: "pw-lee".to_string(),
    }
}

#[tokio::test]
async fn test_register_login_and_list() {
    let (base_url, server) = start_test_server().await;
    let api = client(&base_url);

    let created = api.register(&register_req("lee@school.test")).await.unwrap();
    assert_eq!(created.email, "lee@school.test");

    let response = api
        .login(&LoginRequest {
            email: "lee@school.test".to_string(),
            password: "pw-lee".to_string(),
        })
        .await
        .unwrap();

    let mut session = ClientSession::new(MemoryTokenStorage::new());
    session.load().unwrap();
    session.login(&response.token).unwrap();
    assert!(session.is_authenticated());

    let token = session.token().unwrap().unwrap();
    let users = api.users(&token).await.unwrap();
    assert_eq!(users, vec![created]);

    server.abort();
}

#[tokio::test]
async fn test_server_errors_are_surfaced() {
    let (base_url, server) = start_test_server().await;
    let api = client(&base_url);

    api.register(&register_req("dup@school.test")).await.unwrap();
    let err = api.register(&register_req("dup@school.test")).await.unwrap_err();
    match &err {
        Error::Api { status, message } => {
            assert_eq!(*status, 409);
            assert_eq!(message, "Email already exists");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(user_message(&err), "Email already exists");

    let err = api.users("not.a.token").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 403, .. }));

    server.abort();
}

#[tokio::test]
async fn test_unreachable_server_gives_generic_message() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{}", addr));
    let err = api.register(&register_req("x@school.test")).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert_eq!(user_message(&err), GENERIC_FAILURE);
}
