use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::str::FromStr;

use crate::types::{Role, TicketStatus, VALID_STATUSES};

const VALID_ROLES: &[&str] = &["client", "developer", "admin", "super_admin"];

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "Helpdesk ticket board with role-gated status transitions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format shared by every command
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show tickets grouped into status columns
    Board {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// List tickets
    Ls {
        /// Filter by status (new, opened, in_progress, resolved, closed, rejected)
        #[arg(long, value_parser = parse_status)]
        status: Option<TicketStatus>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Move a ticket to another status column
    #[command(visible_alias = "mv")]
    Move {
        /// Ticket ID
        #[arg(value_parser = parse_ticket_id)]
        id: u64,

        /// Target status (new, opened, in_progress, resolved, closed, rejected)
        #[arg(value_parser = parse_status)]
        status: TicketStatus,

        /// Reason or comment, for approving or rejecting a resolved ticket
        #[arg(short, long)]
        reason: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show which status changes each role may make
    Transitions {
        /// Only show transitions for this role
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api.url, api.timeout, auth.token, auth.role, board.refresh_after_transition)
        key: String,
        /// Value to set
        value: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            MoveOptions, cmd_board, cmd_config_get, cmd_config_set, cmd_config_show, cmd_ls,
            cmd_move, cmd_transitions,
        };

        match self {
            Commands::Board { output } => cmd_board(output).await,
            Commands::Ls { status, output } => cmd_ls(status, output).await,
            Commands::Move {
                id,
                status,
                reason,
                output,
            } => {
                let options = MoveOptions {
                    ticket_id: id,
                    to: status,
                    reason,
                };
                cmd_move(options, output).await
            }
            Commands::Transitions { role, output } => cmd_transitions(role, output),

            Commands::Config { action } => match action {
                ConfigAction::Show { output } => cmd_config_show(output),
                ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
                ConfigAction::Get { key, output } => cmd_config_get(&key, output),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_status(s: &str) -> Result<TicketStatus, String> {
    parse_with_validation(
        s,
        |v| TicketStatus::from_str(v).map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}

fn parse_role(s: &str) -> Result<Role, String> {
    parse_with_validation(
        s,
        |v| Role::from_str(v).map_err(|_| String::new()),
        "role",
        VALID_ROLES,
    )
}

fn parse_ticket_id(s: &str) -> Result<u64, String> {
    let trimmed = s.trim().trim_start_matches('#');
    if trimmed.is_empty() {
        return Err("ID cannot be empty".to_string());
    }
    trimmed
        .parse()
        .map_err(|_| format!("Invalid ticket ID '{s}'. Must be a positive integer"))
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "helpdesk", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_valid() {
        assert_eq!(parse_status("new").unwrap(), TicketStatus::New);
        assert_eq!(
            parse_status("in_progress").unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(parse_status("In Progress").unwrap(), TicketStatus::InProgress);
        assert_eq!(parse_status("REJECTED").unwrap(), TicketStatus::Rejected);
    }

    #[test]
    fn test_parse_status_error_lists_values() {
        let err = parse_status("done").unwrap_err();
        assert!(err.contains("Invalid status"));
        assert!(err.contains("IN_PROGRESS"));
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("developer").unwrap(), Role::Developer);
        assert_eq!(parse_role("superadmin").unwrap(), Role::SuperAdmin);
        assert!(parse_role("owner").unwrap_err().contains("super_admin"));
    }

    #[test]
    fn test_parse_ticket_id() {
        assert_eq!(parse_ticket_id("42").unwrap(), 42);
        assert_eq!(parse_ticket_id("#7").unwrap(), 7);
        assert!(parse_ticket_id("").is_err());
        assert!(parse_ticket_id("-3").is_err());
        assert!(parse_ticket_id("abc").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
