//! Configuration commands for managing helpdesk settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Read one value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{HelpdeskError, Result};

/// Validate a config key and suggest dot notation for underscore keys
fn validate_config_key(key: &str) -> Result<&str> {
    if key.contains('.') {
        return Ok(key);
    }
    if let Some(pos) = key.find('_') {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        return Err(HelpdeskError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dot_version}'"
        )));
    }
    Ok(key)
}

fn configured(value: bool) -> String {
    if value {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    }
}

/// Show current configuration, with environment overrides applied
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let api_url = config.api_url();
    let role = config.role();
    let token_configured = config.api_token().is_some();

    let json_output = json!({
        "api": {
            "url": api_url,
            "timeout": config.api_timeout().as_secs(),
        },
        "auth": {
            "token_configured": token_configured,
            "role": role,
        },
        "board": {
            "refresh_after_transition": config.refresh_after_transition(),
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text.push_str(&format!("{}:\n", "api".cyan()));
    match &api_url {
        Some(url) => text.push_str(&format!("  url: {url}\n")),
        None => text.push_str(&format!("  url: {}\n", "not configured".dimmed())),
    }
    text.push_str(&format!("  timeout: {}s\n\n", config.api_timeout().as_secs()));

    text.push_str(&format!("{}:\n", "auth".cyan()));
    text.push_str(&format!("  token: {}\n", configured(token_configured)));
    match &role {
        Some(role) => text.push_str(&format!("  role: {role}\n\n")),
        None => text.push_str(&format!("  role: {}\n\n", "not configured".dimmed())),
    }

    text.push_str(&format!("{}:\n", "board".cyan()));
    text.push_str(&format!(
        "  refresh_after_transition: {}\n\n",
        config.refresh_after_transition()
    ));

    text.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = config.get(key)?.unwrap_or_default();
    let json_output = json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    });
    let text = format!("Set {} to {}", key.cyan(), shown);

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Get a configuration value as stored in the config file
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let config = Config::load()?;
    let value = config.get(key)?;

    let json_output = json!({
        "key": key,
        "value": value,
    });
    let text = value.unwrap_or_else(|| "not set".to_string());

    CommandOutput::new(json_output).with_text(text).print(output)
}
