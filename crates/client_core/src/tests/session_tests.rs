use super::*;
use shared::{domain::UserId, error::ErrorCode};
use tokio::sync::Mutex;

struct CountingGateway {
    calls: Mutex<Vec<String>>,
}

impl CountingGateway {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl AuthGateway for CountingGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, RemoteError> {
        self.calls.lock().await.push(email.to_string());
        if password == "wrong" {
            return Err(RemoteError::new(ErrorCode::UserUnauthorized, "denied"));
        }
        Ok(UserProfile {
            id: UserId::from(format!("id-{email}")),
            email: email.to_string(),
            name: email.to_string(),
            token: format!("token-{}", self.calls.lock().await.len()),
        })
    }
}

#[tokio::test]
async fn repeat_sign_in_for_same_email_reuses_session() {
    let inner = CountingGateway::new();
    let gateway = SessionGateway::new(inner.clone());

    let first = gateway.sign_in("a@b.com", "pw").await.expect("first");
    let second = gateway.sign_in("a@b.com", "other").await.expect("second");

    assert_eq!(first, second);
    assert_eq!(inner.calls().await, vec!["a@b.com".to_string()]);
    assert!(gateway.is_signed_in("a@b.com").await);
}

#[tokio::test]
async fn different_email_replaces_session() {
    let inner = CountingGateway::new();
    let gateway = SessionGateway::new(inner.clone());

    gateway.sign_in("a@b.com", "pw").await.expect("a");
    let profile = gateway.sign_in("c@d.com", "pw").await.expect("c");

    assert_eq!(gateway.current_user().await, Some(profile));
    assert!(!gateway.is_signed_in("a@b.com").await);
    assert_eq!(inner.calls().await.len(), 2);
}

#[tokio::test]
async fn failed_sign_in_leaves_no_session() {
    let gateway = SessionGateway::new(CountingGateway::new());

    let err = gateway.sign_in("a@b.com", "wrong").await.expect_err("denied");
    assert_eq!(err.code, ErrorCode::UserUnauthorized);
    assert_eq!(gateway.current_user().await, None);
}

#[tokio::test]
async fn sign_out_clears_session_and_forces_remote_call() {
    let inner = CountingGateway::new();
    let gateway = SessionGateway::new(inner.clone());
    let profile = gateway.sign_in("a@b.com", "pw").await.expect("signed in");

    assert_eq!(gateway.sign_out().await, Some(profile));
    assert_eq!(gateway.sign_out().await, None);
    assert!(!gateway.is_signed_in("a@b.com").await);

    gateway.sign_in("a@b.com", "pw").await.expect("again");
    assert_eq!(inner.calls().await.len(), 2);
}
