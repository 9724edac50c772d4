//! Ticket status transitions.
//!
//! The permission table below is the whole state machine: a transition is
//! legal iff `(role, from, to)` appears in it. Nothing else about a ticket
//! is consulted. Each legal pair maps to exactly one backend operation.

pub mod engine;
pub mod plan;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ALL_STATUSES, Role, TicketStatus};

pub use engine::TransitionEngine;
pub use plan::{Outcome, ReasonRequest, TransitionPlan, TransitionRequest, plan_transition};

/// Backend operation that performs a status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketOperation {
    StartWork,
    FinishWork,
    OpenTicket,
    Approve,
    Reject,
}

/// Whether an operation takes a reason/comment from the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonPolicy {
    None,
    Optional,
    Required,
}

impl TicketOperation {
    /// Path segment under `/tickets/{id}/`
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketOperation::StartWork => "start_work",
            TicketOperation::FinishWork => "finish_work",
            TicketOperation::OpenTicket => "open_ticket",
            TicketOperation::Approve => "approve",
            TicketOperation::Reject => "reject",
        }
    }

    pub fn reason_policy(&self) -> ReasonPolicy {
        match self {
            TicketOperation::Approve => ReasonPolicy::Optional,
            TicketOperation::Reject => ReasonPolicy::Required,
            _ => ReasonPolicy::None,
        }
    }
}

impl fmt::Display for TicketOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `(role, from, to)` triples that are allowed
const PERMISSIONS: &[(Role, TicketStatus, TicketStatus)] = &[
    (Role::Developer, TicketStatus::Opened, TicketStatus::InProgress),
    (Role::Developer, TicketStatus::InProgress, TicketStatus::Resolved),
    (Role::Admin, TicketStatus::New, TicketStatus::Opened),
    (Role::SuperAdmin, TicketStatus::New, TicketStatus::Opened),
    (Role::Client, TicketStatus::Resolved, TicketStatus::Closed),
    (Role::Client, TicketStatus::Resolved, TicketStatus::Rejected),
];

const ENDPOINTS: &[(TicketStatus, TicketStatus, TicketOperation)] = &[
    (TicketStatus::Opened, TicketStatus::InProgress, TicketOperation::StartWork),
    (TicketStatus::InProgress, TicketStatus::Resolved, TicketOperation::FinishWork),
    (TicketStatus::New, TicketStatus::Opened, TicketOperation::OpenTicket),
    (TicketStatus::Resolved, TicketStatus::Closed, TicketOperation::Approve),
    (TicketStatus::Resolved, TicketStatus::Rejected, TicketOperation::Reject),
];

/// Check whether `role` may move a ticket from `from` to `to`.
///
/// Same-status pairs are never allowed.
pub fn is_transition_allowed(role: Role, from: TicketStatus, to: TicketStatus) -> bool {
    from != to
        && PERMISSIONS
            .iter()
            .any(|&(r, f, t)| r == role && f == from && t == to)
}

/// Like [`is_transition_allowed`] but takes the raw session role string.
///
/// An unrecognized role authorizes nothing.
pub fn is_role_transition_allowed(role: &str, from: TicketStatus, to: TicketStatus) -> bool {
    Role::normalize(role).is_some_and(|role| is_transition_allowed(role, from, to))
}

/// Map a transition pair to the backend operation that performs it
pub fn resolve_endpoint(from: TicketStatus, to: TicketStatus) -> Option<TicketOperation> {
    ENDPOINTS
        .iter()
        .find(|&&(f, t, _)| f == from && t == to)
        .map(|&(_, _, op)| op)
}

/// Statuses a ticket in `from` may be dropped onto by `role`
pub fn allowed_targets(role: Role, from: TicketStatus) -> Vec<TicketStatus> {
    ALL_STATUSES
        .iter()
        .copied()
        .filter(|&to| is_transition_allowed(role, from, to))
        .collect()
}

/// One row of the permission table, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionEntry {
    pub role: Role,
    pub from: TicketStatus,
    pub to: TicketStatus,
    pub operation: TicketOperation,
}

/// The permission table, optionally restricted to one role
pub fn permission_table(role: Option<Role>) -> Vec<PermissionEntry> {
    PERMISSIONS
        .iter()
        .filter(|(r, _, _)| role.is_none_or(|role| role == *r))
        .filter_map(|&(role, from, to)| {
            resolve_endpoint(from, to).map(|operation| PermissionEntry {
                role,
                from,
                to,
                operation,
            })
        })
        .collect()
}
