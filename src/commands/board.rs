//! Board command (`helpdesk board`)
//!
//! Prints the tickets grouped into one column per status, in board order.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, connect, format_status_badge, load_board};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;

pub async fn cmd_board(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let engine = connect(&config)?;
    let board = load_board(&engine).await?;
    let columns = board.lock().columns();

    let json_output = json!({ "columns": columns });

    let mut text = String::new();
    for column in &columns {
        text.push_str(&format!(
            "{} {}\n",
            format_status_badge(column.status),
            format!("{} ({})", column.label, column.cards.len()).bold()
        ));
        if column.cards.is_empty() {
            text.push_str(&format!("  {}\n", "(empty)".dimmed()));
        }
        for card in &column.cards {
            text.push_str(&format!(
                "  {} {}\n",
                format!("#{:<6}", card.id).cyan(),
                card.title
            ));
        }
        text.push('\n');
    }

    CommandOutput::new(json_output)
        .with_text(text.trim_end())
        .print(output)
}
