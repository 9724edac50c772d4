pub mod api;
pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod paths;
pub mod session;
pub mod transition;
pub mod types;

pub use api::{ApiFailure, HttpTicketApi, TicketApi};
pub use board::{BoardState, SharedBoard, SyncState};
pub use config::Config;
pub use error::{HelpdeskError, Result};
pub use session::Session;
pub use transition::{
    Outcome, TicketOperation, TransitionEngine, is_transition_allowed, resolve_endpoint,
};
pub use types::{Role, Ticket, TicketStatus};
