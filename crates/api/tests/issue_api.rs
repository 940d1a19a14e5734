//! HTTP-level integration tests for issue CRUD, assignees, and the
//! author-is-contributor invariant.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_contributor,
    seed_issue, seed_project, seed_user,
};
use sqlx::PgPool;

/// A contributor (not the author) may create an issue; the project comes
/// from the URL.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_contributor_can_create_issue(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (bob, bob_token) = seed_user(&pool, "bob", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    seed_contributor(&pool, &alice_token, alpha, "bob").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues"),
        &bob_token,
        serde_json::json!({ "title": "Bug1", "priority": "HIGH", "tag": "BUG" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Bug1");
    assert_eq!(json["author_id"], bob.id);
    assert_eq!(json["status"], "TODO");
    assert_eq!(json["project_id"], alpha);
}

/// A stranger cannot create an issue -- the project itself 404s.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_stranger_cannot_create_issue(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (_, dave_token) = seed_user(&pool, "dave", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues"),
        &dave_token,
        serde_json::json!({ "title": "Sneaky" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A body `project` field that contradicts the URL is a hard validation
/// error, not a silent override.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_conflicting_parent_in_body_rejected(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    let beta = seed_project(&pool, &alice_token, "Beta").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues"),
        &alice_token,
        serde_json::json!({ "title": "Bug1", "project": beta }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["project"].is_array());
}

/// An unknown priority is a field error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_priority_rejected(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues"),
        &alice_token,
        serde_json::json!({ "title": "Bug1", "priority": "URGENT" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Stranger requesting a nested issue gets 404 (project invisible), while a
/// contributor denied a write gets 403. The two cases must not blur.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_404_vs_403_contract(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (_, bob_token) = seed_user(&pool, "bob", false).await;
    let (_, dave_token) = seed_user(&pool, "dave", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    seed_contributor(&pool, &alice_token, alpha, "bob").await;
    let bug = seed_issue(&pool, &alice_token, alpha, "Bug1").await;

    // Dave (stranger): the issue reads as nonexistent.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues/{bug}"),
        &dave_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob (contributor, not author): visible, readable, but not deletable.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues/{bug}"),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues/{bug}"),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The issue author keeps update/delete rights even after a staff edit.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_author_rights_survive_staff_edit(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (_, bob_token) = seed_user(&pool, "bob", false).await;
    let (_, staff_token) = seed_user(&pool, "root", true).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    seed_contributor(&pool, &alice_token, alpha, "bob").await;
    let bug = seed_issue(&pool, &bob_token, alpha, "Bug1").await;

    // Staff edits the issue.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues/{bug}"),
        &staff_token,
        serde_json::json!({ "status": "IN_PROGRESS" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Bob is still the author and may delete.
    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues/{bug}"),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

/// The author-is-contributor invariant is re-checked on every save: once
/// the author loses membership, even a staff edit of their issue is
/// rejected with a field error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_rechecks_author_membership(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (bob, bob_token) = seed_user(&pool, "bob", false).await;
    let (_, staff_token) = seed_user(&pool, "root", true).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    seed_contributor(&pool, &alice_token, alpha, "bob").await;
    let bug = seed_issue(&pool, &bob_token, alpha, "Bug1").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors/{}", bob.id),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/projects/{alpha}/issues/{bug}"),
        &staff_token,
        serde_json::json!({ "title": "Renamed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["author"].is_array());
}

/// Status accepts any legal value in any order -- it is a data field, not a
/// guarded workflow.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_status_has_no_transition_guard(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    let bug = seed_issue(&pool, &alice_token, alpha, "Bug1").await;

    // Straight to COMPLETED, then back to TODO.
    for status in ["COMPLETED", "TODO", "IN_PROGRESS"] {
        let app = common::build_test_app(pool.clone());
        let response = put_json_auth(
            app,
            &format!("/api/v1/projects/{alpha}/issues/{bug}"),
            &alice_token,
            serde_json::json!({ "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], status);
    }
}

/// The global issue listing is scoped like the project listing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_global_issue_list_scoped(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (_, bob_token) = seed_user(&pool, "bob", false).await;
    let (_, staff_token) = seed_user(&pool, "root", true).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    let beta = seed_project(&pool, &bob_token, "Beta").await;
    seed_issue(&pool, &alice_token, alpha, "A1").await;
    seed_issue(&pool, &bob_token, beta, "B1").await;
    seed_issue(&pool, &bob_token, beta, "B2").await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/issues", &alice_token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "A1");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/issues", &bob_token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/issues", &staff_token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Assignees
// ---------------------------------------------------------------------------

/// Only the issue author manages assignees; the target must be a
/// contributor; duplicates are field errors.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_assignee_rules(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (bob, bob_token) = seed_user(&pool, "bob", false).await;
    let (carol, _) = seed_user(&pool, "carol", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    seed_contributor(&pool, &alice_token, alpha, "bob").await;
    let bug = seed_issue(&pool, &alice_token, alpha, "Bug1").await;

    // Bob (contributor, not issue author) may not assign.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/issues/{bug}/assignees"),
        &bob_token,
        serde_json::json!({ "user_id": bob.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Carol is not a contributor: field error.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/issues/{bug}/assignees"),
        &alice_token,
        serde_json::json!({ "user_id": carol.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Bob can be assigned, once.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/issues/{bug}/assignees"),
        &alice_token,
        serde_json::json!({ "user_id": bob.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "bob");
    assert_eq!(json["assigned_by"], "alice");

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/issues/{bug}/assignees"),
        &alice_token,
        serde_json::json!({ "user_id": bob.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Removal by the author; removing a non-assignee 404s.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/issues/{bug}/assignees/{}", bob.id),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/issues/{bug}/assignees/{}", carol.id),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Removing a contributor does not retroactively unassign them.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_assignment_survives_membership_removal(pool: PgPool) {
    let (_, alice_token) = seed_user(&pool, "alice", false).await;
    let (bob, _) = seed_user(&pool, "bob", false).await;
    let alpha = seed_project(&pool, &alice_token, "Alpha").await;
    seed_contributor(&pool, &alice_token, alpha, "bob").await;
    let bug = seed_issue(&pool, &alice_token, alpha, "Bug1").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/issues/{bug}/assignees"),
        &alice_token,
        serde_json::json!({ "user_id": bob.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/projects/{alpha}/contributors/{}", bob.id),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The assignment row is still there.
    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/issues/{bug}/assignees"), &alice_token).await,
    )
    .await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["username"], "bob");
}
