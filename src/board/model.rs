//! Board model types for testable state management
//!
//! `BoardState` is the explicit application state behind the ticket board:
//! the ticket list as last fetched, the optimistic status writes layered on
//! top of it, and transitions paused for a reason. All methods here are
//! synchronous; network I/O lives in the transition engine.

use std::collections::HashMap;

use serde::Serialize;

use crate::api::ApiFailure;
use crate::transition::{
    Outcome, ReasonRequest, TransitionPlan, TransitionRequest, allowed_targets, plan_transition,
};
use crate::types::{ALL_STATUSES, Role, Ticket, TicketStatus};

/// Per-ticket reconciliation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncState {
    /// Local status matches the last server view
    #[default]
    Synced,
    /// Local status is optimistic; `previous` is what to restore on failure
    PendingWrite { previous: TicketStatus, seq: u64 },
    /// A failed write was rolled back; waiting for the next fetch
    Reverting,
}

/// What the caller must do after a gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing to send; this is the final outcome
    Settled(Outcome),
    /// The optimistic write is applied; send this request
    Submit(TransitionRequest),
}

/// Raw board state
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    tickets: Vec<Ticket>,
    sync: HashMap<u64, SyncState>,
    awaiting_reason: HashMap<u64, ReasonRequest>,
    next_seq: u64,
}

/// A column of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub status: TicketStatus,
    pub label: &'static str,
    pub cards: Vec<CardView>,
}

/// A ticket card within a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: u64,
    pub title: String,
    /// A status write for this ticket is in flight
    pub pending: bool,
}

impl BoardState {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            ..Self::default()
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn ticket(&self, id: u64) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    fn ticket_mut(&mut self, id: u64) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }

    pub fn sync_state(&self, id: u64) -> SyncState {
        self.sync.get(&id).copied().unwrap_or_default()
    }

    pub fn is_in_flight(&self, id: u64) -> bool {
        matches!(self.sync_state(id), SyncState::PendingWrite { .. })
    }

    pub fn awaiting_reason(&self, id: u64) -> Option<&ReasonRequest> {
        self.awaiting_reason.get(&id)
    }

    /// Gesture entry point: a ticket was dropped onto the `to` column.
    ///
    /// Refusals leave every piece of state untouched. A submittable
    /// transition is applied to the local ticket before this returns.
    pub fn on_transition_requested(&mut self, id: u64, to: TicketStatus, role: Role) -> Dispatch {
        let Some(ticket) = self.ticket(id) else {
            return Dispatch::Settled(Outcome::UnknownTicket { ticket_id: id });
        };
        let plan = plan_transition(ticket, to, role);
        tracing::debug!(ticket_id = id, %to, %role, ?plan, "planned transition");

        match plan {
            TransitionPlan::Unchanged => Dispatch::Settled(Outcome::Unchanged),
            TransitionPlan::Forbidden { from, to } => {
                Dispatch::Settled(Outcome::Forbidden { from, to })
            }
            TransitionPlan::InvalidTransition { from, to } => {
                Dispatch::Settled(Outcome::InvalidTransition { from, to })
            }
            TransitionPlan::AwaitingReason(_) | TransitionPlan::Submit(_)
                if self.is_in_flight(id) =>
            {
                Dispatch::Settled(Outcome::InFlight { ticket_id: id })
            }
            TransitionPlan::AwaitingReason(request) => {
                self.awaiting_reason.insert(id, request.clone());
                Dispatch::Settled(Outcome::AwaitingReason(request))
            }
            TransitionPlan::Submit(request) => {
                self.awaiting_reason.remove(&id);
                self.begin(request)
            }
        }
    }

    /// Resume a transition paused in `AwaitingReason`.
    ///
    /// A blank reason for a reject keeps the request waiting.
    pub fn submit_reason(&mut self, id: u64, reason: &str) -> Dispatch {
        let Some(request) = self.awaiting_reason.remove(&id) else {
            return Dispatch::Settled(Outcome::NothingPending { ticket_id: id });
        };
        let Some(current) = self.ticket(id).map(|t| t.status) else {
            return Dispatch::Settled(Outcome::UnknownTicket { ticket_id: id });
        };
        // Refetched since the prompt was opened and the ticket moved on
        if current != request.from {
            return Dispatch::Settled(Outcome::InvalidTransition {
                from: current,
                to: request.to,
            });
        }
        if self.is_in_flight(id) {
            return Dispatch::Settled(Outcome::InFlight { ticket_id: id });
        }

        match request.with_reason(reason) {
            Ok(request) => self.begin(request),
            Err(request) => {
                self.awaiting_reason.insert(id, request.clone());
                Dispatch::Settled(Outcome::ReasonRequired(request))
            }
        }
    }

    /// Gesture entry point: the drag or the reason prompt was abandoned.
    ///
    /// Returns whether a waiting transition was dropped.
    pub fn on_transition_cancelled(&mut self, id: u64) -> bool {
        self.awaiting_reason.remove(&id).is_some()
    }

    /// Apply the optimistic write and hand back the numbered request
    fn begin(&mut self, mut request: TransitionRequest) -> Dispatch {
        self.next_seq += 1;
        request.seq = self.next_seq;

        if let Some(ticket) = self.ticket_mut(request.ticket_id) {
            ticket.status = request.to;
        }
        self.sync.insert(
            request.ticket_id,
            SyncState::PendingWrite {
                previous: request.from,
                seq: request.seq,
            },
        );
        Dispatch::Submit(request)
    }

    /// Record the backend's answer to a submitted request.
    ///
    /// Local state only changes when `request` is still the ticket's
    /// outstanding write; late answers are reported but not applied.
    pub fn settle(
        &mut self,
        request: &TransitionRequest,
        result: Result<Option<Ticket>, ApiFailure>,
    ) -> Outcome {
        let id = request.ticket_id;
        let previous = match self.sync_state(id) {
            SyncState::PendingWrite { previous, seq } if seq == request.seq => Some(previous),
            _ => None,
        };
        if previous.is_none() {
            tracing::debug!(ticket_id = id, seq = request.seq, "ignoring stale completion");
        }

        match result {
            Ok(updated) => {
                if previous.is_some() {
                    self.sync.remove(&id);
                    // An echo that disagrees with the confirmed status is not
                    // authoritative; the next fetch settles it
                    if let Some(updated) = updated.filter(|t| t.id == id && t.status == request.to)
                        && let Some(ticket) = self.ticket_mut(id)
                    {
                        *ticket = updated;
                    }
                }
                tracing::info!(ticket_id = id, operation = %request.operation, to = %request.to, "transition confirmed");
                Outcome::Confirmed {
                    ticket_id: id,
                    status: request.to,
                }
            }
            Err(failure) => {
                let restored = match previous {
                    Some(previous) => {
                        if let Some(ticket) = self.ticket_mut(id) {
                            ticket.status = previous;
                        }
                        self.sync.insert(id, SyncState::Reverting);
                        previous
                    }
                    None => self.ticket(id).map(|t| t.status).unwrap_or(request.from),
                };
                tracing::warn!(
                    ticket_id = id,
                    operation = %request.operation,
                    %restored,
                    "transition failed: {failure}"
                );
                Outcome::Reverted {
                    ticket_id: id,
                    restored,
                    message: failure.user_message(),
                }
            }
        }
    }

    /// Replace the ticket list with a fresh server fetch.
    ///
    /// Last fetch wins, except that a ticket with a write still in flight
    /// keeps its optimistic status and adopts the fetched status as the one
    /// to restore if the write fails.
    pub fn reconcile(&mut self, mut fetched: Vec<Ticket>) {
        let mut sync = HashMap::new();
        for ticket in &mut fetched {
            if let SyncState::PendingWrite { seq, .. } = self.sync_state(ticket.id) {
                let optimistic = self.ticket(ticket.id).map(|t| t.status);
                sync.insert(
                    ticket.id,
                    SyncState::PendingWrite {
                        previous: ticket.status,
                        seq,
                    },
                );
                if let Some(optimistic) = optimistic {
                    ticket.status = optimistic;
                }
            }
        }

        self.awaiting_reason
            .retain(|id, request| fetched.iter().any(|t| t.id == *id && t.status == request.from));
        self.sync = sync;
        self.tickets = fetched;
    }

    /// Tickets grouped into columns in board order
    pub fn columns(&self) -> Vec<ColumnView> {
        ALL_STATUSES
            .iter()
            .map(|&status| ColumnView {
                status,
                label: status.label(),
                cards: self
                    .tickets
                    .iter()
                    .filter(|t| t.status == status)
                    .map(|t| CardView {
                        id: t.id,
                        title: t.title.clone(),
                        pending: self.is_in_flight(t.id),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Columns the ticket may currently be dropped onto by `role`
    pub fn droppable_columns(&self, id: u64, role: Role) -> Vec<TicketStatus> {
        match self.ticket(id) {
            Some(ticket) if !self.is_in_flight(id) => allowed_targets(role, ticket.status),
            _ => Vec::new(),
        }
    }
}
