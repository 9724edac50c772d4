//! Status change command (`helpdesk move`)
//!
//! Runs one drop gesture through the transition engine: fetch the board,
//! request the move as the session role, answer the reason prompt from
//! `--reason` when the operation asks for one.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, connect, format_status_badge, load_board};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{HelpdeskError, Result};
use crate::session::Session;
use crate::transition::Outcome;
use crate::types::TicketStatus;

pub struct MoveOptions {
    pub ticket_id: u64,
    pub to: TicketStatus,
    pub reason: Option<String>,
}

pub async fn cmd_move(options: MoveOptions, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let session = Session::from_config(&config)?;
    let engine = connect(&config)?;
    let board = load_board(&engine).await?;
    let id = options.ticket_id;

    let mut outcome = engine
        .request_transition(&board, id, options.to, session.role)
        .await;

    if let Outcome::AwaitingReason(request) = outcome.clone() {
        outcome = match options.reason.as_deref() {
            Some(reason) => engine.submit_reason(&board, id, reason).await,
            None if !request.is_reason_required() => engine.submit_reason(&board, id, "").await,
            None => {
                engine.cancel(&board, id);
                Outcome::ReasonRequired(request)
            }
        };
    }

    let status = board.lock().ticket(id).map(|t| t.status);
    let message = outcome.message();

    let json_output = json!({
        "id": id,
        "action": "move",
        "outcome": outcome.kind(),
        "status": status,
        "message": message,
    });

    if outcome.is_error() {
        if output.json {
            CommandOutput::new(json_output).print(output)?;
        }
        let mut message = message.unwrap_or_else(|| outcome.kind().to_string());
        if matches!(outcome, Outcome::ReasonRequired(_)) {
            message.push_str(" (pass --reason)");
        }
        return Err(HelpdeskError::Transition(message));
    }

    let text = match (&outcome, status) {
        (Outcome::Unchanged, Some(status)) => format!(
            "Ticket {} is already {}",
            format!("#{id}").cyan(),
            format_status_badge(status)
        ),
        (_, Some(status)) => format!(
            "Moved {} to {}",
            format!("#{id}").cyan(),
            format_status_badge(status)
        ),
        (_, None) => message.unwrap_or_default(),
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}
