//! Client session tests

use std::sync::Arc;

use schoolhub::auth::{
    ClientSession, FileTokenStorage, MemoryTokenStorage, MockClock, RouteDecision,
    SessionState, TokenIssuer, TokenStorage,
};

const DAY: i64 = 24 * 60 * 60;
const START: i64 = 1_700_000_000;

fn issue(now: i64) -> String {
    let clock = Arc::new(MockClock::new(now));
    TokenIssuer::with_clock(b"session-secret", DAY, clock)
        .issue_for(42, "pat@school.test")
        .expect("issue token")
}

#[test]
fn test_unexpired_token_is_authenticated() {
    let storage = MemoryTokenStorage::with_token(issue(START));
    let clock = Arc::new(MockClock::new(START + 60));
    let mut session = ClientSession::with_clock(storage, clock);

    session.load().unwrap();

    assert!(session.is_authenticated());
    let claims = session.claims().unwrap();
    assert_eq!(claims.id, 42);
    assert_eq!(claims.email, "pat@school.test");
    assert_eq!(claims.exp, Some(START + DAY));
}

#[test]
fn test_expired_token_is_cleared_on_load() {
    let storage = MemoryTokenStorage::with_token(issue(START));
    let clock = Arc::new(MockClock::new(START + DAY + 1));
    let mut session = ClientSession::with_clock(storage.clone(), clock);

    session.load().unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(session.state(), &SessionState::Anonymous);
    assert_eq!(storage.get().unwrap(), None);
}

#[test]
fn test_malformed_token_is_cleared_on_load() {
    let storage = MemoryTokenStorage::with_token("garbage");
    let mut session = ClientSession::new(storage.clone());

    session.load().unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(storage.get().unwrap(), None);
}

#[test]
fn test_login_and_logout() {
    let storage = MemoryTokenStorage::new();
    let clock = Arc::new(MockClock::new(START));
    let mut session = ClientSession::with_clock(storage.clone(), clock);
    session.load().unwrap();
    assert!(!session.is_authenticated());

    let token = issue(START);
    session.login(&token).unwrap();
    assert!(session.is_authenticated());
    assert_eq!(storage.get().unwrap().as_deref(), Some(token.as_str()));
    assert_eq!(session.token().unwrap().as_deref(), Some(token.as_str()));

    session.logout().unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(storage.get().unwrap(), None);
}

#[test]
fn test_session_survives_reload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    let clock = Arc::new(MockClock::new(START));

    let mut first = ClientSession::with_clock(FileTokenStorage::new(&path), clock.clone());
    first.load().unwrap();
    first.login(&issue(START)).unwrap();

    let mut second = ClientSession::with_clock(FileTokenStorage::new(&path), clock.clone());
    second.load().unwrap();
    assert!(second.is_authenticated());

    clock.advance(DAY + 1);
    let mut third = ClientSession::with_clock(FileTokenStorage::new(&path), clock);
    third.load().unwrap();
    assert!(!third.is_authenticated());
    assert!(!path.exists());
}

#[test]
fn test_guard_decisions() {
    let clock = Arc::new(MockClock::new(START));
    let mut session = ClientSession::with_clock(MemoryTokenStorage::new(), clock);

    assert_eq!(session.guard(), RouteDecision::Wait);

    session.load().unwrap();
    assert!(matches!(session.guard(), RouteDecision::Redirect(_)));

    session.login(&issue(START)).unwrap();
    match session.guard() {
        RouteDecision::Render(claims) => assert_eq!(claims.id, 42),
        other => panic!("expected render, got {:?}", other),
    }
}

#[test]
fn test_client_does_not_check_signature() {
    // Any well-formed payload passes client-side; the server still verifies.
    let foreign = TokenIssuer::new(b"unknown-secret", DAY)
        .issue_for(9, "x@school.test")
        .unwrap();
    let mut session = ClientSession::new(MemoryTokenStorage::with_token(foreign));
    session.load().unwrap();
    assert!(session.is_authenticated());
}
