//! Integration tests for the Session repository.

use chrono::{Duration, Utc};
use forgemart_core::error::CoreError;
use forgemart_core::models::session::CreateSession;
use forgemart_core::models::user::{CreateUser, UserRole};
use forgemart_core::repository::{SessionRepository, UserRepository};
use forgemart_db::repository::{SurrealSessionRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: in-memory DB with migrations applied plus one active user.
async fn setup() -> (Surreal<surrealdb::engine::local::Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    forgemart_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let user = user_repo
        .create(CreateUser {
            email: "alice@example.com".into(),
            password: "correct-horse-battery".into(),
            name: "Alice Granger".into(),
            role: UserRole::Admin,
            company: None,
            avatar_url: None,
        })
        .await
        .unwrap();

    (db, user.id)
}

fn session_input(user_id: Uuid, token: &str) -> CreateSession {
    CreateSession {
        user_id,
        token: token.into(),
        expires_at: Utc::now() + Duration::hours(720),
    }
}

#[tokio::test]
async fn create_and_find_embeds_owner() {
    let (db, user_id) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    let session = repo
        .create(session_input(user_id, "tok-alpha"))
        .await
        .unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.token, "tok-alpha");

    let found = repo.find_by_token("tok-alpha").await.unwrap().unwrap();
    assert_eq!(found.session.id, session.id);
    assert_eq!(found.user.id, user_id);
    assert_eq!(found.user.email, "alice@example.com");
    assert_eq!(found.user.role, UserRole::Admin);
    assert!(found.user.is_active);
}

#[tokio::test]
async fn find_unknown_token_is_none() {
    let (db, _) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    assert!(repo.find_by_token("no-such-token").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_token_is_a_conflict() {
    let (db, user_id) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    repo.create(session_input(user_id, "tok-dup")).await.unwrap();
    let err = repo
        .create(session_input(user_id, "tok-dup"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::Conflict { .. }),
        "expected Conflict, got: {err:?}"
    );
}

#[tokio::test]
async fn delete_by_token_is_idempotent() {
    let (db, user_id) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    repo.create(session_input(user_id, "tok-gone")).await.unwrap();
    repo.delete_by_token("tok-gone").await.unwrap();
    assert!(repo.find_by_token("tok-gone").await.unwrap().is_none());

    // Second delete of the same token is a no-op, not an error.
    repo.delete_by_token("tok-gone").await.unwrap();
    // So is deleting a token that never existed.
    repo.delete_by_token("never-existed").await.unwrap();
}

#[tokio::test]
async fn delete_all_for_user_leaves_other_users_alone() {
    let (db, alice_id) = setup().await;

    let user_repo = SurrealUserRepository::new(db.clone());
    let bob = user_repo
        .create(CreateUser {
            email: "bob@example.com".into(),
            password: "another-password".into(),
            name: "Bob Ferris".into(),
            role: UserRole::Customer,
            company: None,
            avatar_url: None,
        })
        .await
        .unwrap();

    let repo = SurrealSessionRepository::new(db);
    repo.create(session_input(alice_id, "alice-1")).await.unwrap();
    repo.create(session_input(alice_id, "alice-2")).await.unwrap();
    repo.create(session_input(bob.id, "bob-1")).await.unwrap();

    repo.delete_all_for_user(alice_id).await.unwrap();

    assert!(repo.find_by_token("alice-1").await.unwrap().is_none());
    assert!(repo.find_by_token("alice-2").await.unwrap().is_none());
    assert!(repo.find_by_token("bob-1").await.unwrap().is_some());
}

#[tokio::test]
async fn delete_expired_removes_only_stale_rows() {
    let (db, user_id) = setup().await;
    let repo = SurrealSessionRepository::new(db);

    repo.create(CreateSession {
        user_id,
        token: "stale-1".into(),
        expires_at: Utc::now() - Duration::hours(1),
    })
    .await
    .unwrap();
    repo.create(CreateSession {
        user_id,
        token: "stale-2".into(),
        expires_at: Utc::now() - Duration::seconds(1),
    })
    .await
    .unwrap();
    repo.create(session_input(user_id, "live")).await.unwrap();

    let removed = repo.delete_expired(Utc::now()).await.unwrap();
    assert_eq!(removed, 2);

    assert!(repo.find_by_token("stale-1").await.unwrap().is_none());
    assert!(repo.find_by_token("stale-2").await.unwrap().is_none());
    assert!(repo.find_by_token("live").await.unwrap().is_some());

    // Nothing left to remove on a second sweep.
    assert_eq!(repo.delete_expired(Utc::now()).await.unwrap(), 0);
}
