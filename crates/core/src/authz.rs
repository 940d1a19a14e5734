//! Authorization engine.
//!
//! A pure decision function: given an authenticated principal, an action,
//! and a resolved target snapshot, answer Allow or Deny. One rule table
//! covers every resource type; the staff override is evaluated exactly
//! once, before anything else. The engine never decides between 403 and
//! 404 -- that split belongs to [`crate::visibility`].
//!
//! Project creation and collection listings are intentionally absent from
//! the table: both are open to any authenticated principal, with listings
//! scoped by the visibility layer instead of denied here.

use crate::types::DbId;

/// An authenticated principal, as produced by the token layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// The user's internal database id.
    pub id: DbId,
    /// Global override flag: staff bypass all ownership/membership checks.
    pub is_staff: bool,
}

/// The resource types the engine knows how to guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Project,
    Membership,
    Issue,
    Assignment,
    Comment,
}

/// Object-level actions requiring an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Retrieve,
    Update,
    Delete,
    CreateIssue,
    CreateComment,
    ListContributors,
    AddContributor,
    RemoveContributor,
    ListAssignees,
    AddAssignee,
    RemoveAssignee,
}

/// Snapshot of a target resolved to its owning project.
///
/// The caller (the service layer) resolves the containment chain --
/// Project is its own project, Issue via `issue.project`, Comment via
/// `comment.issue.project`, Assignment/Membership via their parents --
/// and fills this in from current storage state. The engine itself never
/// touches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessContext {
    pub kind: ResourceKind,
    /// Author of the owning project.
    pub project_author_id: DbId,
    /// Whether the principal holds a membership row for the owning project.
    pub is_contributor: bool,
    /// Author of the specific resource, where one exists (issue, comment).
    pub resource_author_id: Option<DbId>,
}

impl AccessContext {
    pub fn project(project_author_id: DbId, is_contributor: bool) -> Self {
        Self {
            kind: ResourceKind::Project,
            project_author_id,
            is_contributor,
            resource_author_id: Some(project_author_id),
        }
    }

    pub fn membership(project_author_id: DbId, is_contributor: bool) -> Self {
        Self {
            kind: ResourceKind::Membership,
            project_author_id,
            is_contributor,
            resource_author_id: None,
        }
    }

    pub fn issue(project_author_id: DbId, is_contributor: bool, issue_author_id: DbId) -> Self {
        Self {
            kind: ResourceKind::Issue,
            project_author_id,
            is_contributor,
            resource_author_id: Some(issue_author_id),
        }
    }

    /// Assignments are guarded by the parent issue's author.
    pub fn assignment(
        project_author_id: DbId,
        is_contributor: bool,
        issue_author_id: DbId,
    ) -> Self {
        Self {
            kind: ResourceKind::Assignment,
            project_author_id,
            is_contributor,
            resource_author_id: Some(issue_author_id),
        }
    }

    pub fn comment(
        project_author_id: DbId,
        is_contributor: bool,
        comment_author_id: DbId,
    ) -> Self {
        Self {
            kind: ResourceKind::Comment,
            project_author_id,
            is_contributor,
            resource_author_id: Some(comment_author_id),
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Denied, with a human-readable reason for the 403 payload.
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }
}

/// The role a non-staff principal must hold for a given (kind, action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    /// Member of the owning project (the author always qualifies).
    Contributor,
    /// Author of the owning project.
    ProjectAuthor,
    /// Author of the specific resource (issue author for assignments).
    ResourceAuthor,
}

/// The rule table. `None` means the combination is not a supported
/// operation for that resource type and is denied outright.
fn required(kind: ResourceKind, action: Action) -> Option<Requirement> {
    use Action::*;
    use Requirement::*;
    use ResourceKind::*;

    match (kind, action) {
        (Project, Retrieve) => Some(Contributor),
        (Project, Update | Delete) => Some(ProjectAuthor),
        (Project, CreateIssue) => Some(Contributor),

        (Membership, ListContributors) => Some(Contributor),
        (Membership, AddContributor | RemoveContributor) => Some(ProjectAuthor),

        (Issue, Retrieve) => Some(Contributor),
        (Issue, Update | Delete) => Some(ResourceAuthor),
        (Issue, CreateComment) => Some(Contributor),

        (Assignment, ListAssignees) => Some(Contributor),
        (Assignment, AddAssignee | RemoveAssignee) => Some(ResourceAuthor),

        (Comment, Retrieve) => Some(Contributor),
        (Comment, Update | Delete) => Some(ResourceAuthor),

        _ => None,
    }
}

/// Deny reason for a failed requirement, phrased per resource type.
fn deny_reason(kind: ResourceKind, requirement: Requirement) -> &'static str {
    match requirement {
        Requirement::Contributor => {
            "You must be a contributor of this project to access this resource."
        }
        Requirement::ProjectAuthor => "Only the project author may perform this action.",
        Requirement::ResourceAuthor => match kind {
            ResourceKind::Issue => "Only the issue author may modify or delete it.",
            ResourceKind::Comment => "Only the comment author may modify or delete it.",
            ResourceKind::Assignment => "Only the issue author may manage assignees.",
            _ => "Only the author of this resource may perform this action.",
        },
    }
}

/// Decide whether `principal` may perform `action` on the resolved target.
///
/// `None` as the target means the object could not be resolved to an
/// owning project; that is a Deny, never an error, so defensive checks on
/// unexpected input cannot crash a request.
pub fn can(principal: &Principal, action: Action, target: Option<&AccessContext>) -> Decision {
    // Staff override: checked once, before any role evaluation.
    if principal.is_staff {
        return Decision::Allow;
    }

    let Some(ctx) = target else {
        return Decision::Deny("This resource does not belong to any project.");
    };

    let Some(requirement) = required(ctx.kind, action) else {
        return Decision::Deny("This action is not supported for this resource.");
    };

    let satisfied = match requirement {
        // The project author is always a contributor by invariant; the
        // explicit author check keeps the rule correct even against a
        // ledger that predates that invariant.
        Requirement::Contributor => ctx.is_contributor || principal.id == ctx.project_author_id,
        Requirement::ProjectAuthor => principal.id == ctx.project_author_id,
        Requirement::ResourceAuthor => ctx.resource_author_id == Some(principal.id),
    };

    if satisfied {
        Decision::Allow
    } else {
        Decision::Deny(deny_reason(ctx.kind, requirement))
    }
}
