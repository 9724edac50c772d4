use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::transition::permission_table;
use crate::types::Role;

#[derive(Tabled)]
struct PermissionRow {
    #[tabled(rename = "Role")]
    role: Role,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Operation")]
    operation: String,
}

/// Print the permission table, optionally for a single role
pub fn cmd_transitions(role: Option<Role>, output: OutputOptions) -> Result<()> {
    let entries = permission_table(role);
    let json_output = serde_json::to_value(&entries)?;

    let text = if entries.is_empty() {
        "No transitions allowed.".to_string()
    } else {
        let rows = entries.iter().map(|e| PermissionRow {
            role: e.role,
            from: e.from.label().to_string(),
            to: e.to.label().to_string(),
            operation: e.operation.to_string(),
        });
        let mut table = Table::new(rows);
        table.with(Style::modern());
        table.to_string()
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}
