//! In-memory `TicketApi` for driving the transition engine in tests.

use std::sync::Arc;

use helpdesk::api::{ApiFailure, TicketApi};
use helpdesk::board::SharedBoard;
use helpdesk::transition::TicketOperation;
use helpdesk::types::{Ticket, TicketStatus};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// A backend call as the fake received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub ticket_id: u64,
    pub operation: TicketOperation,
    pub reason: Option<String>,
    /// Board status of the ticket at the moment the call was made
    pub observed: Option<TicketStatus>,
}

#[derive(Default)]
struct FakeState {
    tickets: Vec<Ticket>,
    calls: Vec<Call>,
    list_calls: usize,
    failure: Option<ApiFailure>,
    list_failure: Option<ApiFailure>,
    echo: bool,
    observer: Option<SharedBoard>,
    gate: Option<Arc<Notify>>,
}

/// Server double. Clones share state.
#[derive(Clone, Default)]
pub struct FakeTicketApi {
    state: Arc<Mutex<FakeState>>,
}

fn target_status(operation: TicketOperation) -> TicketStatus {
    match operation {
        TicketOperation::StartWork => TicketStatus::InProgress,
        TicketOperation::FinishWork => TicketStatus::Resolved,
        TicketOperation::OpenTicket => TicketStatus::Opened,
        TicketOperation::Approve => TicketStatus::Closed,
        TicketOperation::Reject => TicketStatus::Rejected,
    }
}

impl FakeTicketApi {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        let api = Self::default();
        api.state.lock().tickets = tickets;
        api
    }

    /// Make every transition call fail with `failure`
    pub fn fail_with(&self, failure: ApiFailure) {
        self.state.lock().failure = Some(failure);
    }

    pub fn fail_list_with(&self, failure: ApiFailure) {
        self.state.lock().list_failure = Some(failure);
    }

    /// Return the updated ticket from transition calls
    pub fn echo_tickets(&self) {
        self.state.lock().echo = true;
    }

    /// Record the board's view of each ticket when it is submitted
    pub fn observe(&self, board: SharedBoard) {
        self.state.lock().observer = Some(board);
    }

    /// Hold transition calls until the returned handle is notified
    pub fn gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().gate = Some(gate.clone());
        gate
    }

    /// Change a ticket behind the client's back
    pub fn set_server_status(&self, id: u64, status: TicketStatus) {
        if let Some(ticket) = self.state.lock().tickets.iter_mut().find(|t| t.id == id) {
            ticket.status = status;
        }
    }

    pub fn server_status(&self, id: u64) -> Option<TicketStatus> {
        self.state
            .lock()
            .tickets
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.status)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }
}

impl TicketApi for FakeTicketApi {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, ApiFailure> {
        let mut state = self.state.lock();
        state.list_calls += 1;
        match &state.list_failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(state.tickets.clone()),
        }
    }

    async fn perform(
        &self,
        ticket_id: u64,
        operation: TicketOperation,
        reason: Option<&str>,
    ) -> Result<Option<Ticket>, ApiFailure> {
        let gate = {
            let mut state = self.state.lock();
            let observed = state
                .observer
                .as_ref()
                .and_then(|board| board.lock().ticket(ticket_id).map(|t| t.status));
            state.calls.push(Call {
                ticket_id,
                operation,
                reason: reason.map(str::to_string),
                observed,
            });
            state.gate.clone()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock();
        if let Some(failure) = &state.failure {
            return Err(failure.clone());
        }
        let echo = state.echo;
        let ticket = state.tickets.iter_mut().find(|t| t.id == ticket_id);
        match ticket {
            Some(ticket) => {
                ticket.status = target_status(operation);
                Ok(echo.then(|| ticket.clone()))
            }
            None => Err(ApiFailure::Rejected {
                status: 404,
                message: Some("Not found.".to_string()),
            }),
        }
    }
}
