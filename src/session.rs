//! Identity of the current actor.

use crate::config::Config;
use crate::error::{HelpdeskError, Result};
use crate::types::Role;

/// The authenticated actor, as far as transitions are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Resolve the session from the environment and config file
    pub fn from_config(config: &Config) -> Result<Self> {
        let raw = config.role().ok_or_else(|| {
            HelpdeskError::NotAuthenticated(
                "no role configured. Set HELPDESK_ROLE or run: helpdesk config set auth.role <role>"
                    .to_string(),
            )
        })?;
        let role: Role = raw.parse()?;
        Ok(Self { role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_session_from_config() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::remove_var(crate::config::ROLE_ENV) };

        let mut config = Config::default();
        assert!(matches!(
            Session::from_config(&config),
            Err(HelpdeskError::NotAuthenticated(_))
        ));

        config.auth.role = Some("SuperAdmin".to_string());
        assert_eq!(Session::from_config(&config).unwrap().role, Role::SuperAdmin);

        config.auth.role = Some("auditor".to_string());
        assert!(matches!(
            Session::from_config(&config),
            Err(HelpdeskError::InvalidRole(_))
        ));
    }
}
