//! Pure transition planning.
//!
//! `plan_transition` decides what a drag-end means without touching any
//! state: nothing to do, a local refusal, a pause for the actor's reason, or
//! a request to submit. Applying the plan is the board's job.

use std::fmt;

use serde::Serialize;

use super::{ReasonPolicy, TicketOperation, is_transition_allowed, resolve_endpoint};
use crate::types::{Role, Ticket, TicketStatus};

/// Shown when a failed request carries no usable message
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to update ticket status. Please try again.";

/// A transition ready to be sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRequest {
    /// Board-assigned sequence number, used to discard stale completions
    pub seq: u64,
    pub ticket_id: u64,
    pub from: TicketStatus,
    pub to: TicketStatus,
    pub operation: TicketOperation,
    pub reason: Option<String>,
}

/// A transition paused until the actor supplies a reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonRequest {
    pub ticket_id: u64,
    pub from: TicketStatus,
    pub to: TicketStatus,
    pub operation: TicketOperation,
}

impl ReasonRequest {
    /// Whether submission must carry a non-blank reason
    pub fn is_reason_required(&self) -> bool {
        self.operation.reason_policy() == ReasonPolicy::Required
    }

    /// Attach the actor's reason, producing a submittable request.
    ///
    /// The reason is trimmed and a blank optional reason is dropped. A blank
    /// required reason hands the request back unchanged.
    pub fn with_reason(self, reason: &str) -> Result<TransitionRequest, ReasonRequest> {
        let reason = reason.trim();
        if reason.is_empty() && self.is_reason_required() {
            return Err(self);
        }
        Ok(TransitionRequest {
            seq: 0,
            ticket_id: self.ticket_id,
            from: self.from,
            to: self.to,
            operation: self.operation,
            reason: (!reason.is_empty()).then(|| reason.to_string()),
        })
    }
}

/// What a requested status change resolves to before any I/O
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Dropped back onto its own column
    Unchanged,
    /// The role may not perform this transition
    Forbidden { from: TicketStatus, to: TicketStatus },
    /// No backend operation exists for this pair
    InvalidTransition { from: TicketStatus, to: TicketStatus },
    /// Needs a reason before it can be submitted
    AwaitingReason(ReasonRequest),
    /// Ready to apply optimistically and submit
    Submit(TransitionRequest),
}

/// Plan a status change of `ticket` to `to` on behalf of `role`
pub fn plan_transition(ticket: &Ticket, to: TicketStatus, role: Role) -> TransitionPlan {
    let from = ticket.status;
    if from == to {
        return TransitionPlan::Unchanged;
    }
    if !is_transition_allowed(role, from, to) {
        return TransitionPlan::Forbidden { from, to };
    }
    let Some(operation) = resolve_endpoint(from, to) else {
        return TransitionPlan::InvalidTransition { from, to };
    };

    match operation.reason_policy() {
        ReasonPolicy::None => TransitionPlan::Submit(TransitionRequest {
            seq: 0,
            ticket_id: ticket.id,
            from,
            to,
            operation,
            reason: None,
        }),
        ReasonPolicy::Optional | ReasonPolicy::Required => {
            TransitionPlan::AwaitingReason(ReasonRequest {
                ticket_id: ticket.id,
                from,
                to,
                operation,
            })
        }
    }
}

/// Final result of a transition attempt, handed to the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Same-status drop; nothing submitted
    Unchanged,
    /// Role lacks permission; nothing submitted or mutated
    Forbidden { from: TicketStatus, to: TicketStatus },
    /// Pair has no backend operation; nothing submitted or mutated
    InvalidTransition { from: TicketStatus, to: TicketStatus },
    /// Suspended until a reason is supplied
    AwaitingReason(ReasonRequest),
    /// A required reason was blank; the request is still waiting
    ReasonRequired(ReasonRequest),
    /// A write for this ticket is already in flight
    InFlight { ticket_id: u64 },
    /// Ticket is not on the board
    UnknownTicket { ticket_id: u64 },
    /// No transition is waiting for a reason on this ticket
    NothingPending { ticket_id: u64 },
    /// Backend accepted the transition
    Confirmed { ticket_id: u64, status: TicketStatus },
    /// Backend call failed and the local status was rolled back
    Reverted {
        ticket_id: u64,
        restored: TicketStatus,
        message: String,
    },
}

impl Outcome {
    /// Stable identifier for machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Unchanged => "unchanged",
            Outcome::Forbidden { .. } => "forbidden",
            Outcome::InvalidTransition { .. } => "invalid_transition",
            Outcome::AwaitingReason(_) => "awaiting_reason",
            Outcome::ReasonRequired(_) => "reason_required",
            Outcome::InFlight { .. } => "in_flight",
            Outcome::UnknownTicket { .. } => "unknown_ticket",
            Outcome::NothingPending { .. } => "nothing_pending",
            Outcome::Confirmed { .. } => "confirmed",
            Outcome::Reverted { .. } => "reverted",
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Outcome::Confirmed { .. })
    }

    /// Outcomes that should be shown to the actor as an error
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Outcome::Forbidden { .. }
                | Outcome::InvalidTransition { .. }
                | Outcome::ReasonRequired(_)
                | Outcome::InFlight { .. }
                | Outcome::UnknownTicket { .. }
                | Outcome::NothingPending { .. }
                | Outcome::Reverted { .. }
        )
    }

    /// Human-readable message for the UI, if the outcome warrants one
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Unchanged => None,
            Outcome::Forbidden { from, to } => Some(format!(
                "You do not have permission to move a ticket from {} to {}",
                from.label(),
                to.label()
            )),
            Outcome::InvalidTransition { from, to } => Some(format!(
                "Cannot move a ticket from {} to {}",
                from.label(),
                to.label()
            )),
            Outcome::AwaitingReason(request) => Some(if request.is_reason_required() {
                "Please provide a reason".to_string()
            } else {
                "Add a comment (optional)".to_string()
            }),
            Outcome::ReasonRequired(_) => Some("A reason is required to reject a ticket".to_string()),
            Outcome::InFlight { ticket_id } => Some(format!(
                "Ticket #{ticket_id} is already being updated"
            )),
            Outcome::UnknownTicket { ticket_id } => {
                Some(format!("Ticket #{ticket_id} is not on the board"))
            }
            Outcome::NothingPending { ticket_id } => Some(format!(
                "No status change is waiting for a reason on ticket #{ticket_id}"
            )),
            Outcome::Confirmed { ticket_id, status } => Some(format!(
                "Ticket #{ticket_id} moved to {}",
                status.label()
            )),
            Outcome::Reverted { message, .. } => Some(message.clone()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{message}"),
            None => write!(f, "unchanged"),
        }
    }
}
