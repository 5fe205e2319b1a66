//! Authorization policy domain service.
//!
//! Role-based and ownership-based checks are centralized here instead of
//! being scattered across handlers: every mutation maps to an [`Action`]
//! and is evaluated against the acting user before it runs.

use crate::domain::entities::UserRole;

/// The acting user, as seen by authorization.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: i64, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// An operation on a resource, carrying the ownership data the decision
/// needs.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    /// Enumerate all user accounts.
    ListUsers,
    /// Edit a user account's fields.
    UpdateUser { target_id: i64 },
    /// Remove a user account.
    DeleteUser,
    /// Change a user's password.
    ChangePassword { target_id: i64 },
    /// Edit a post.
    UpdatePost { author_id: i64 },
    /// Remove a post.
    DeletePost { author_id: i64 },
    /// Edit a comment.
    UpdateComment { author_id: i64 },
    /// Remove a comment.
    DeleteComment { author_id: i64 },
}

/// Authorization outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Stateless policy evaluation service.
pub struct PolicyService;

impl PolicyService {
    /// Map (actor, action) to allow/deny.
    ///
    /// Rules: account listing and deletion are admin-only; account and
    /// password edits are owner-only; posts may be deleted by their owner
    /// or an admin; comments additionally by moderators.
    pub fn evaluate(actor: &Actor, action: Action) -> Decision {
        let allowed = match action {
            Action::ListUsers | Action::DeleteUser => actor.role == UserRole::Admin,
            Action::UpdateUser { target_id } | Action::ChangePassword { target_id } => {
                actor.id == target_id
            }
            Action::UpdatePost { author_id } | Action::UpdateComment { author_id } => {
                actor.id == author_id
            }
            Action::DeletePost { author_id } => {
                actor.id == author_id || actor.role == UserRole::Admin
            }
            Action::DeleteComment { author_id } => {
                actor.id == author_id
                    || actor.role == UserRole::Admin
                    || actor.role == UserRole::Moderator
            }
        };

        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    /// Convenience wrapper returning true on Allow.
    pub fn allows(actor: &Actor, action: Action) -> bool {
        Self::evaluate(actor, action) == Decision::Allow
    }
}
