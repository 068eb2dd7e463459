use authloop::auth::{AuthBackend, AuthError};
use authloop::db::Database;
use authloop::models::UserRole;
use tempfile::TempDir;

async fn setup_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());
    let db = Database::new(&db_url).await.unwrap();
    (db, temp_dir)
}

#[tokio::test]
async fn test_create_user() {
    let (db, _temp) = setup_test_db().await;

    let user = db
        .create_user("test@example.com", Some("hash".to_string()), UserRole::User)
        .await
        .unwrap();

    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.role(), UserRole::User);
    assert!(user.last_login_at.is_none());
    assert!(!user.id.is_empty());
}

#[tokio::test]
async fn test_get_user_by_email_and_id() {
    let (db, _temp) = setup_test_db().await;

    let created = db
        .create_user("findme@example.com", None, UserRole::Admin)
        .await
        .unwrap();

    let found = db.get_user_by_email("findme@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(created.id.clone()));

    let by_id = db.get_user_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(by_id.role(), UserRole::Admin);

    assert!(db.get_user_by_email("nobody@example.com").await.unwrap().is_none());
    assert!(db.get_user_by_id("nonexistent-id").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_account_normalizes_email() {
    let (db, _temp) = setup_test_db().await;

    let user = db
        .create_account("  New.User@Example.COM ", "long enough password")
        .await
        .unwrap();

    assert_eq!(user.email, "new.user@example.com");
    assert_ne!(user.hashed_password.as_deref(), Some("long enough password"));
}

#[tokio::test]
async fn test_duplicate_email_reports_conflict() {
    let (db, _temp) = setup_test_db().await;

    db.create_account("dup@example.com", "long enough password")
        .await
        .unwrap();

    let err = db
        .create_account("DUP@example.com", "another password")
        .await
        .unwrap_err();

    match err {
        AuthError::Conflict { field } => assert_eq!(field, "email"),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_authenticate() {
    let (db, _temp) = setup_test_db().await;

    let created = db
        .create_account("login@example.com", "long enough password")
        .await
        .unwrap();

    let user = db
        .authenticate("Login@Example.com", "long enough password")
        .await
        .unwrap();
    assert_eq!(user.id, created.id);

    let refreshed = db.get_user(&created.id).await.unwrap().unwrap();
    assert!(refreshed.last_login_at.is_some());
}

#[tokio::test]
async fn test_authenticate_rejects_bad_credentials() {
    let (db, _temp) = setup_test_db().await;

    db.create_account("login@example.com", "long enough password")
        .await
        .unwrap();

    let wrong_password = db.authenticate("login@example.com", "wrong password").await;
    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));

    let unknown = db.authenticate("ghost@example.com", "long enough password").await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_account_without_password_cannot_log_in() {
    let (db, _temp) = setup_test_db().await;

    db.create_user("nopass@example.com", None, UserRole::User)
        .await
        .unwrap();

    let result = db.authenticate("nopass@example.com", "").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}
