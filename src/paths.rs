use std::path::PathBuf;

/// Returns the root helpdesk directory path.
///
/// Resolution order:
/// 1. `HELPDESK_ROOT` environment variable (if set)
/// 2. Current working directory + `.helpdesk`
pub fn helpdesk_root() -> PathBuf {
    if let Ok(root) = std::env::var("HELPDESK_ROOT") {
        PathBuf::from(root)
    } else {
        PathBuf::from(".helpdesk")
    }
}

/// Returns the path to the config file.
pub fn config_path() -> PathBuf {
    helpdesk_root().join("config.yaml")
}
