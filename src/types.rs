use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use unicase::UniCase;

use crate::error::HelpdeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    New,
    Opened,
    InProgress,
    Resolved,
    Closed,
    Rejected,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "NEW",
            TicketStatus::Opened => "OPENED",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Resolved => "RESOLVED",
            TicketStatus::Closed => "CLOSED",
            TicketStatus::Rejected => "REJECTED",
        }
    }

    /// Human-readable column label
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::Opened => "Opened",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
            TicketStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "NEW" => Ok(TicketStatus::New),
            "OPENED" => Ok(TicketStatus::Opened),
            "IN_PROGRESS" => Ok(TicketStatus::InProgress),
            "RESOLVED" => Ok(TicketStatus::Resolved),
            "CLOSED" => Ok(TicketStatus::Closed),
            "REJECTED" => Ok(TicketStatus::Rejected),
            _ => Err(HelpdeskError::InvalidStatus(s.to_string())),
        }
    }
}

/// All statuses in board column order
pub const ALL_STATUSES: [TicketStatus; 6] = [
    TicketStatus::New,
    TicketStatus::Opened,
    TicketStatus::InProgress,
    TicketStatus::Resolved,
    TicketStatus::Closed,
    TicketStatus::Rejected,
];

pub const VALID_STATUSES: &[&str] = &[
    "NEW",
    "OPENED",
    "IN_PROGRESS",
    "RESOLVED",
    "CLOSED",
    "REJECTED",
];

/// Permission class of the authenticated actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Client,
    Developer,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Normalize a raw role string from the session.
    ///
    /// Matching is case-insensitive and `SUPERADMIN` is accepted as an alias
    /// for `SUPER_ADMIN`. Returns `None` for anything unrecognized.
    pub fn normalize(raw: &str) -> Option<Role> {
        let raw = UniCase::new(raw.trim());
        if raw == UniCase::new("CLIENT") {
            Some(Role::Client)
        } else if raw == UniCase::new("DEVELOPER") {
            Some(Role::Developer)
        } else if raw == UniCase::new("ADMIN") {
            Some(Role::Admin)
        } else if raw == UniCase::new("SUPER_ADMIN") || raw == UniCase::new("SUPERADMIN") {
            Some(Role::SuperAdmin)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Developer => "DEVELOPER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::normalize(s).ok_or_else(|| HelpdeskError::InvalidRole(s.to_string()))
    }
}

pub const ALL_ROLES: [Role; 4] = [Role::Client, Role::Developer, Role::Admin, Role::SuperAdmin];

/// A ticket as returned by the Ticket API.
///
/// Only `id` and `status` drive transitions, and both are required. The
/// title is decoded for display and every other field is carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,

    pub status: TicketStatus,

    #[serde(default)]
    pub title: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Ticket {
    pub fn new(id: u64, status: TicketStatus, title: impl Into<String>) -> Self {
        Self {
            id,
            status,
            title: title.into(),
            extra: serde_json::Map::new(),
        }
    }
}
