//! Access guards: resolve a target to its owning project, apply the
//! visibility contract, and convert engine denials into HTTP errors.
//!
//! The contract, applied uniformly per resource type:
//! - target absent OR outside the principal's visible set -> 404, the two
//!   cases deliberately indistinguishable;
//! - target visible but the action denied by the engine -> 403 with the
//!   engine's reason.
//!
//! Loaders resolve the containment chain (Project -> self, Issue ->
//! `issue.project`, Comment -> `comment.issue.project`) and snapshot the
//! principal's membership from current storage state. Nothing is cached
//! across requests: a membership change is honored on the very next call.

use sqlx::PgPool;
use uuid::Uuid;

use softdesk_core::authz::{can, AccessContext, Action, Principal};
use softdesk_core::error::CoreError;
use softdesk_core::types::DbId;
use softdesk_core::visibility::is_visible;
use softdesk_db::models::comment::Comment;
use softdesk_db::models::issue::Issue;
use softdesk_db::models::project::Project;
use softdesk_db::repositories::{CommentRepo, ContributorRepo, IssueRepo, ProjectRepo};

use crate::error::{AppError, AppResult};

/// A project the principal is allowed to see, plus the membership snapshot
/// used for subsequent authorization checks.
pub struct ProjectAccess {
    pub project: Project,
    pub is_member: bool,
}

impl ProjectAccess {
    /// Context for actions on the project itself.
    pub fn project_ctx(&self) -> AccessContext {
        AccessContext::project(self.project.author_id, self.is_member)
    }

    /// Context for actions on the project's membership ledger.
    pub fn membership_ctx(&self) -> AccessContext {
        AccessContext::membership(self.project.author_id, self.is_member)
    }
}

/// An issue the principal is allowed to see, with its owning project.
pub struct IssueAccess {
    pub issue: Issue,
    pub project: Project,
    pub is_member: bool,
}

impl IssueAccess {
    /// Context for actions on the issue itself.
    pub fn issue_ctx(&self) -> AccessContext {
        AccessContext::issue(self.project.author_id, self.is_member, self.issue.author_id)
    }

    /// Context for actions on the issue's assignee links.
    pub fn assignment_ctx(&self) -> AccessContext {
        AccessContext::assignment(self.project.author_id, self.is_member, self.issue.author_id)
    }
}

/// A comment the principal is allowed to see, with its full parent chain.
pub struct CommentAccess {
    pub comment: Comment,
    pub issue: Issue,
    pub project: Project,
    pub is_member: bool,
}

impl CommentAccess {
    pub fn comment_ctx(&self) -> AccessContext {
        AccessContext::comment(
            self.project.author_id,
            self.is_member,
            self.comment.author_id,
        )
    }
}

/// Convert an engine decision into a handler result.
pub fn authorize(principal: &Principal, action: Action, ctx: &AccessContext) -> AppResult<()> {
    match can(principal, action, Some(ctx)) {
        softdesk_core::authz::Decision::Allow => Ok(()),
        softdesk_core::authz::Decision::Deny(reason) => {
            Err(AppError::Core(CoreError::Forbidden(reason.to_string())))
        }
    }
}

/// Load a project by id, applying the visibility contract.
pub async fn load_project(
    pool: &PgPool,
    principal: &Principal,
    project_id: DbId,
) -> AppResult<ProjectAccess> {
    let Some(project) = ProjectRepo::find_by_id(pool, project_id).await? else {
        return Err(not_found("Project"));
    };

    let is_member = ContributorRepo::is_member(pool, principal.id, project.id).await?;
    let access = ProjectAccess { project, is_member };

    if !is_visible(principal, &access.project_ctx()) {
        return Err(not_found("Project"));
    }
    Ok(access)
}

/// Load an issue by id (global navigation), applying the visibility contract
/// transitively through its owning project.
pub async fn load_issue(
    pool: &PgPool,
    principal: &Principal,
    issue_id: DbId,
) -> AppResult<IssueAccess> {
    let Some(issue) = IssueRepo::find_by_id(pool, issue_id).await? else {
        return Err(not_found("Issue"));
    };
    resolve_issue(pool, principal, issue).await
}

/// Load an issue within a project navigation context.
///
/// An issue that exists but belongs to a different project is reported as
/// absent, exactly like an invisible one.
pub async fn load_issue_in_project(
    pool: &PgPool,
    principal: &Principal,
    project_id: DbId,
    issue_id: DbId,
) -> AppResult<IssueAccess> {
    let Some(issue) = IssueRepo::find_by_id(pool, issue_id).await? else {
        return Err(not_found("Issue"));
    };
    if issue.project_id != project_id {
        return Err(not_found("Issue"));
    }
    resolve_issue(pool, principal, issue).await
}

/// Load a comment within its issue navigation context.
pub async fn load_comment(
    pool: &PgPool,
    principal: &Principal,
    issue_id: DbId,
    comment_id: Uuid,
) -> AppResult<CommentAccess> {
    let Some(comment) = CommentRepo::find_by_id(pool, comment_id).await? else {
        return Err(not_found("Comment"));
    };
    if comment.issue_id != issue_id {
        return Err(not_found("Comment"));
    }

    // Resolve the parent chain; the issue is guarded by the same contract,
    // so an invisible issue hides its comments with it.
    let parent = load_issue(pool, principal, comment.issue_id).await.map_err(|err| {
        match err {
            AppError::Core(CoreError::NotFound { .. }) => not_found("Comment"),
            other => other,
        }
    })?;

    let access = CommentAccess {
        comment,
        issue: parent.issue,
        project: parent.project,
        is_member: parent.is_member,
    };

    if !is_visible(principal, &access.comment_ctx()) {
        return Err(not_found("Comment"));
    }
    Ok(access)
}

async fn resolve_issue(
    pool: &PgPool,
    principal: &Principal,
    issue: Issue,
) -> AppResult<IssueAccess> {
    // The FK guarantees the project exists; a miss here means the row was
    // deleted mid-request, which reads the same as an absent issue.
    let Some(project) = ProjectRepo::find_by_id(pool, issue.project_id).await? else {
        return Err(not_found("Issue"));
    };

    let is_member = ContributorRepo::is_member(pool, principal.id, project.id).await?;
    let access = IssueAccess {
        issue,
        project,
        is_member,
    };

    if !is_visible(principal, &access.issue_ctx()) {
        return Err(not_found("Issue"));
    }
    Ok(access)
}

fn not_found(entity: &'static str) -> AppError {
    AppError::Core(CoreError::NotFound { entity })
}
