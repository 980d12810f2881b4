//! Read-only roster of people on the board.

use serde::{Deserialize, Serialize};

/// Someone currently on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Free-form role label such as `owner` or `active`.
    #[serde(default)]
    pub role: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            avatar: None,
            role: String::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

/// Supplies the roster. The engine only reads it.
pub trait PresenceSource {
    fn participants(&self) -> Vec<Participant>;
}

/// A fixed roster.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    participants: Vec<Participant>,
}

impl StaticRoster {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    /// Roster with nobody on it.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl PresenceSource for StaticRoster {
    fn participants(&self) -> Vec<Participant> {
        self.participants.clone()
    }
}
