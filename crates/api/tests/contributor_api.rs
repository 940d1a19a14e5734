//! HTTP-level integration tests for the membership ledger endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, seed_project, seed_user};
use sqlx::PgPool;
use softdesk_db::repositories::ContributorRepo;

/// Adding by username records provenance; re-adding the same user via the
/// other lookup key is an "already a contributor" field error and leaves
/// exactly one ledger row.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_add_contributor_and_duplicate(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (bob, _) = seed_user(&pool, "bob", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors"),
        &alice_token,
        serde_json::json!({ "username": "bob" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "bob");
    assert_eq!(json["added_by"], "alice");

    // Same user, this time by email.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors"),
        &alice_token,
        serde_json::json!({ "email": "bob@test.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["user"].is_array());

    // Exactly one row in the ledger.
    assert!(ContributorRepo::is_member(&pool, bob.id, alpha).await.unwrap());
    let rows = ContributorRepo::list_for_project(&pool, alpha).await.unwrap();
    assert_eq!(rows.len(), 1);
}

/// Zero or two lookup keys are validation errors, never a silent pick.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_add_contributor_lookup_key_is_exclusive(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    seed_user(&pool, "bob", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors"),
        &alice_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors"),
        &alice_token,
        serde_json::json!({ "username": "bob", "email": "bob@test.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A lookup key that matches nobody is a 404, distinct from validation.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_add_contributor_unknown_user_is_404(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors"),
        &alice_token,
        serde_json::json!({ "username": "ghost" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Only the project author (or staff) may add contributors; a plain
/// contributor gets 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_add_contributor_is_author_only(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (_, bob_token) = seed_user(&pool, "bob", false).await;
    seed_user(&pool, "carol", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    common::seed_contributor(&pool, &alice_token, alpha, "bob").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors"),
        &bob_token,
        serde_json::json!({ "username": "carol" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The owner's membership row can never be removed.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_owner_cannot_be_removed(pool: PgPool) {
    let (alice, alice_token) = seed_user(&pool, "alice", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors/{}", alice.id),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The ledger row survives.
    assert!(ContributorRepo::is_member(&pool, alice.id, alpha).await.unwrap());
}

/// Removing a contributor works for the author and 404s on a non-member.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_remove_contributor(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (bob, _) = seed_user(&pool, "bob", false).await;
    let (carol, _) = seed_user(&pool, "carol", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    common::seed_contributor(&pool, &alice_token, alpha, "bob").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors/{}", bob.id),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Carol was never a member: 404.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors/{}", carol.id),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob lost visibility on the very next request.
    let app = common::build_test_app(pool.clone());
    let bob_token = softdesk_api::auth::jwt::generate_access_token(
        bob.id,
        false,
        &common::test_config().jwt,
    )
    .unwrap();
    let response = get_auth(app, &format!("/api/v1/projects/{alpha}"), &bob_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Contributor listing requires membership; strangers get 404 for the
/// whole project, not an empty list.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_contributor_list_hidden_from_strangers(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (_, dave_token) = seed_user(&pool, "dave", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors"),
        &dave_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
