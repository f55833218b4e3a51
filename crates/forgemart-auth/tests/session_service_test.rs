//! Integration tests for the session lifecycle service.

use chrono::{DateTime, Duration, Utc};
use forgemart_auth::config::SessionConfig;
use forgemart_auth::error::AuthError;
use forgemart_auth::service::SessionService;
use forgemart_core::models::user::{CreateUser, UserRole};
use forgemart_core::repository::UserRepository;
use forgemart_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

type TestService = SessionService<
    SurrealUserRepository<surrealdb::engine::local::Db>,
    SurrealSessionRepository<surrealdb::engine::local::Db>,
>;

/// Helper: spin up in-memory DB, run migrations, create one active
/// user, and build the service around it.
async fn setup() -> (TestService, Uuid, Surreal<surrealdb::engine::local::Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    forgemart_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let user = user_repo
        .create(CreateUser {
            email: "alice@example.com".into(),
            password: "correct-horse-battery".into(),
            name: "Alice Granger".into(),
            role: UserRole::Customer,
            company: Some("Granger Tooling".into()),
            avatar_url: None,
        })
        .await
        .unwrap();

    let session_repo = SurrealSessionRepository::new(db.clone());
    let svc = SessionService::new(user_repo, session_repo, SessionConfig::default());

    (svc, user.id, db)
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Count all session rows through the raw handle.
async fn session_count(db: &Surreal<surrealdb::engine::local::Db>) -> u64 {
    let mut result = db
        .query("SELECT count() AS total FROM session GROUP ALL")
        .await
        .unwrap();
    let rows: Vec<CountRow> = result.take(0).unwrap();
    rows.first().map(|r| r.total).unwrap_or(0)
}

#[derive(Debug, SurrealValue)]
struct ExpiryRow {
    expires_at: DateTime<Utc>,
}

/// Fetch a session row's expiry through the raw handle.
async fn session_expiry(
    db: &Surreal<surrealdb::engine::local::Db>,
    token: &str,
) -> Option<DateTime<Utc>> {
    let mut result = db
        .query("SELECT expires_at FROM session WHERE token = $token")
        .bind(("token", token.to_string()))
        .await
        .unwrap();
    let rows: Vec<ExpiryRow> = result.take(0).unwrap();
    rows.into_iter().next().map(|r| r.expires_at)
}

/// Backdate a session so the next validation observes it expired.
async fn backdate(db: &Surreal<surrealdb::engine::local::Db>, token: &str) {
    db.query("UPDATE session SET expires_at = $at WHERE token = $token")
        .bind(("at", Utc::now() - Duration::seconds(1)))
        .bind(("token", token.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
}

#[tokio::test]
async fn login_happy_path() {
    let (svc, user_id, db) = setup().await;

    let out = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();

    assert_eq!(out.token.len(), 43);
    assert_eq!(out.user.id, user_id);
    assert_eq!(out.user.email, "alice@example.com");
    assert_eq!(out.user.role, UserRole::Customer);

    // Exactly one session row, expiring one configured lifetime out.
    assert_eq!(session_count(&db).await, 1);
    let expires_at = session_expiry(&db, &out.token).await.unwrap();
    let expected = Utc::now() + Duration::hours(720);
    assert!((expires_at - expected).num_seconds().abs() < 5);
}

#[tokio::test]
async fn login_lowercases_the_email() {
    let (svc, _, _db) = setup().await;

    let out = svc
        .login("Alice@Example.COM", "correct-horse-battery")
        .await
        .unwrap();
    assert_eq!(out.user.email, "alice@example.com");
}

#[tokio::test]
async fn login_touches_last_login() {
    let (svc, user_id, db) = setup().await;

    svc.login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();

    let user_repo = SurrealUserRepository::new(db);
    let user = user_repo.get_by_id(user_id).await.unwrap();
    let at = user.last_login_at.expect("last login recorded");
    assert!((Utc::now() - at).num_seconds().abs() < 5);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let (svc, _, db) = setup().await;

    let wrong_password = svc
        .login("alice@example.com", "wrong-password")
        .await
        .unwrap_err();
    let unknown_email = svc
        .login("nobody@example.com", "irrelevant")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    // Same message: no user enumeration through error text.
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());

    // Neither failure touched the store.
    assert_eq!(session_count(&db).await, 0);
}

#[tokio::test]
async fn disabled_account_with_correct_password() {
    let (svc, user_id, db) = setup().await;

    let user_repo = SurrealUserRepository::new(db.clone());
    user_repo.set_active(user_id, false).await.unwrap();

    let err = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap_err();

    assert!(
        matches!(err, AuthError::AccountDisabled),
        "expected AccountDisabled, got: {err:?}"
    );
    assert_eq!(session_count(&db).await, 0);
}

#[tokio::test]
async fn validate_fresh_session() {
    let (svc, user_id, _db) = setup().await;

    let out = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();

    let profile = svc.validate(&out.token).await.unwrap().unwrap();
    assert_eq!(profile.id, user_id);
    assert_eq!(profile.name, "Alice Granger");
    assert_eq!(profile.company.as_deref(), Some("Granger Tooling"));
}

#[tokio::test]
async fn validate_unknown_token_is_none() {
    let (svc, _, _db) = setup().await;
    assert!(svc.validate("no-such-token").await.unwrap().is_none());
}

#[tokio::test]
async fn validate_expired_session_deletes_the_row() {
    let (svc, _, db) = setup().await;

    let out = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();
    backdate(&db, &out.token).await;

    assert!(svc.validate(&out.token).await.unwrap().is_none());
    // Lazy expiry removed the row, not just hid it.
    assert!(session_expiry(&db, &out.token).await.is_none());
    assert_eq!(session_count(&db).await, 0);
}

#[tokio::test]
async fn validate_after_deactivation_deletes_the_row() {
    let (svc, user_id, db) = setup().await;

    let out = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    user_repo.set_active(user_id, false).await.unwrap();

    assert!(svc.validate(&out.token).await.unwrap().is_none());
    assert_eq!(session_count(&db).await, 0);
}

#[tokio::test]
async fn logout_then_validate_is_none() {
    let (svc, _, _db) = setup().await;

    let out = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();

    svc.logout(&out.token).await.unwrap();
    assert!(svc.validate(&out.token).await.unwrap().is_none());

    // Logging out twice is a no-op, not an error.
    svc.logout(&out.token).await.unwrap();
}

#[tokio::test]
async fn revoke_all_leaves_other_users_alone() {
    let (svc, alice_id, db) = setup().await;

    let user_repo = SurrealUserRepository::new(db.clone());
    user_repo
        .create(CreateUser {
            email: "bob@example.com".into(),
            password: "another-password".into(),
            name: "Bob Ferris".into(),
            role: UserRole::Admin,
            company: None,
            avatar_url: None,
        })
        .await
        .unwrap();

    let alice_1 = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();
    let alice_2 = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();
    let bob = svc
        .login("bob@example.com", "another-password")
        .await
        .unwrap();

    svc.revoke_all(alice_id).await.unwrap();

    assert!(svc.validate(&alice_1.token).await.unwrap().is_none());
    assert!(svc.validate(&alice_2.token).await.unwrap().is_none());
    assert!(svc.validate(&bob.token).await.unwrap().is_some());
}

#[tokio::test]
async fn sweep_removes_expired_sessions_only() {
    let (svc, _, db) = setup().await;

    let stale = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();
    let live = svc
        .login("alice@example.com", "correct-horse-battery")
        .await
        .unwrap();
    backdate(&db, &stale.token).await;

    assert_eq!(svc.sweep_expired().await.unwrap(), 1);
    assert!(svc.validate(&live.token).await.unwrap().is_some());
    assert_eq!(svc.sweep_expired().await.unwrap(), 0);
}
