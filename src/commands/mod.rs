mod board;
mod config;
mod ls;
mod move_ticket;
mod transitions;

pub use board::cmd_board;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use ls::cmd_ls;
pub use move_ticket::{MoveOptions, cmd_move};
pub use transitions::cmd_transitions;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::api::HttpTicketApi;
use crate::board::{BoardState, SharedBoard, shared};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::transition::TransitionEngine;
use crate::types::{Ticket, TicketStatus};

/// Result of a command, printable as JSON or as text
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print to stdout. Falls back to JSON when no text form was given.
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// Build an engine against the configured API
pub(crate) fn connect(config: &Config) -> Result<TransitionEngine<HttpTicketApi>> {
    let api = HttpTicketApi::from_config(config)?;
    Ok(TransitionEngine::new(api).with_refresh_after_transition(config.refresh_after_transition()))
}

/// Fetch the ticket list into a fresh board
pub(crate) async fn load_board(engine: &TransitionEngine<HttpTicketApi>) -> Result<SharedBoard> {
    let board = shared(BoardState::default());
    engine.refresh(&board).await?;
    Ok(board)
}

/// `[IN_PROGRESS]`, colored by status
pub fn format_status_badge(status: TicketStatus) -> String {
    let badge = format!("[{status}]");
    match status {
        TicketStatus::New => badge.yellow().to_string(),
        TicketStatus::Opened => badge.blue().to_string(),
        TicketStatus::InProgress => badge.magenta().to_string(),
        TicketStatus::Resolved => badge.green().to_string(),
        TicketStatus::Closed => badge.dimmed().to_string(),
        TicketStatus::Rejected => badge.red().to_string(),
    }
}

pub(crate) fn ticket_to_json(ticket: &Ticket) -> Value {
    serde_json::json!({
        "id": ticket.id,
        "status": ticket.status,
        "title": ticket.title,
    })
}
