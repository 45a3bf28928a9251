//! Authorization Policy
//!
//! One explicit table (resource kind × action × relation-to-principal)
//! evaluated by a single pure function, instead of per-endpoint permission
//! classes. Every handler that mutates or lists a resource calls
//! [`authorize`] before touching the store.

use crate::error::app_error::{AppError, AppResult};
use crate::principal::Principal;

/// The kinds of resources the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Category,
    Genre,
    Title,
    Review,
    Comment,
}

/// What the principal is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    #[inline]
    pub const fn is_read(&self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// Relation of the principal to the concrete resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// No ownership relation (or not applicable, e.g. Create/List)
    None,
    /// The principal authored the resource
    Owner,
}

/// Evaluate the policy table.
///
/// Denials distinguish between missing authentication (401) and
/// insufficient privilege (403).
///
/// Rules:
/// - `User`: every action is admin-only. Self-access (`/users/me`) is a
///   dedicated path that does not go through this table.
/// - `Category`/`Genre`/`Title`: reads open to anyone including anonymous;
///   writes admin-only.
/// - `Review`/`Comment`: reads open; Create requires authentication;
///   Update/Delete require the author, a moderator, or an admin.
pub fn authorize(
    principal: &Principal,
    action: Action,
    resource: Resource,
    relation: Relation,
) -> AppResult<()> {
    let allowed = match resource {
        Resource::User => principal.is_admin(),
        Resource::Category | Resource::Genre | Resource::Title => {
            action.is_read() || principal.is_admin()
        }
        Resource::Review | Resource::Comment => match action {
            Action::List | Action::Retrieve => true,
            Action::Create => principal.is_authenticated(),
            Action::Update | Action::Delete => {
                relation == Relation::Owner || principal.is_moderator() || principal.is_admin()
            }
        },
    };

    if allowed {
        return Ok(());
    }

    if principal.is_authenticated() {
        Err(AppError::forbidden(
            "You do not have permission to perform this action",
        ))
    } else {
        Err(AppError::unauthorized(
            "Authentication credentials were not provided",
        ))
    }
}
