use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Info,
    Alert,
    Urgent,
}

/// A user-facing announcement. The engine appends these fire-and-forget;
/// delivery and display belong to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub priority: Priority,
    pub message: String,
}

impl Notification {
    pub fn new(priority: Priority, message: impl Into<String>) -> Self {
        Self {
            priority,
            message: message.into(),
        }
    }
}
