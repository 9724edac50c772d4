use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, connect, load_board, ticket_to_json};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::types::TicketStatus;

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Title")]
    title: String,
}

/// List all tickets, optionally filtered by status
pub async fn cmd_ls(status_filter: Option<TicketStatus>, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let engine = connect(&config)?;
    let board = load_board(&engine).await?;

    let tickets: Vec<_> = board
        .lock()
        .tickets()
        .iter()
        .filter(|t| status_filter.is_none_or(|status| t.status == status))
        .cloned()
        .collect();

    let json_output = serde_json::Value::Array(tickets.iter().map(ticket_to_json).collect());

    let text = if tickets.is_empty() {
        "No tickets found.".to_string()
    } else {
        let rows = tickets.iter().map(|t| TicketRow {
            id: t.id,
            status: t.status.label().to_string(),
            title: t.title.clone(),
        });
        let mut table = Table::new(rows);
        table.with(Style::modern());
        table.to_string()
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}
