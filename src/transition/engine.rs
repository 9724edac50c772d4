//! Effect executor for ticket transitions.
//!
//! The board decides and mutates; the engine only performs the network
//! calls those decisions require and feeds the answers back. The board lock
//! is taken for each synchronous step and released before any await.

use parking_lot::Mutex;

use super::plan::{Outcome, TransitionRequest};
use crate::api::{ApiFailure, TicketApi};
use crate::board::{BoardState, Dispatch};
use crate::types::{Role, Ticket, TicketStatus};

pub struct TransitionEngine<A> {
    api: A,
    refresh_after_transition: bool,
}

impl<A: TicketApi> TransitionEngine<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            refresh_after_transition: true,
        }
    }

    /// Whether to refetch the ticket list after each confirmed transition.
    ///
    /// Failed transitions are always followed by a refetch.
    pub fn with_refresh_after_transition(mut self, refresh: bool) -> Self {
        self.refresh_after_transition = refresh;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch the canonical ticket list and reconcile the board with it
    pub async fn refresh(&self, board: &Mutex<BoardState>) -> Result<usize, ApiFailure> {
        let tickets = self.api.list_tickets().await?;
        let count = tickets.len();
        board.lock().reconcile(tickets);
        Ok(count)
    }

    /// Handle a drop of `ticket_id` onto the `to` column
    pub async fn request_transition(
        &self,
        board: &Mutex<BoardState>,
        ticket_id: u64,
        to: TicketStatus,
        role: Role,
    ) -> Outcome {
        let dispatch = board.lock().on_transition_requested(ticket_id, to, role);
        self.drive(board, dispatch).await
    }

    /// Continue a transition that was waiting for a reason
    pub async fn submit_reason(
        &self,
        board: &Mutex<BoardState>,
        ticket_id: u64,
        reason: &str,
    ) -> Outcome {
        let dispatch = board.lock().submit_reason(ticket_id, reason);
        self.drive(board, dispatch).await
    }

    /// Abandon a transition that was waiting for a reason
    pub fn cancel(&self, board: &Mutex<BoardState>, ticket_id: u64) -> bool {
        board.lock().on_transition_cancelled(ticket_id)
    }

    /// Send one request to the backend
    pub async fn execute(&self, request: &TransitionRequest) -> Result<Option<Ticket>, ApiFailure> {
        self.api
            .perform(
                request.ticket_id,
                request.operation,
                request.reason.as_deref(),
            )
            .await
    }

    async fn drive(&self, board: &Mutex<BoardState>, dispatch: Dispatch) -> Outcome {
        let request = match dispatch {
            Dispatch::Settled(outcome) => return outcome,
            Dispatch::Submit(request) => request,
        };

        let result = self.execute(&request).await;
        let outcome = board.lock().settle(&request, result);

        // A revert always refetches; confirmations only when configured
        let refresh = self.refresh_after_transition || matches!(outcome, Outcome::Reverted { .. });
        if refresh && let Err(e) = self.refresh(board).await
        {
            tracing::warn!(ticket_id = request.ticket_id, "failed to refresh tickets: {e}");
        }

        outcome
    }
}
