use serde::{Deserialize, Serialize};
use std::fmt;

/// Written by the editor every time it mirrors a transform.
pub const EDITOR_LAST_UPDATE_KEY: &str = "editorLastUpdate";
/// Written by the main application on its status timer.
pub const MAIN_APP_LAST_UPDATE_KEY: &str = "mainAppLastUpdate";

/// Which of the two cooperating contexts a process is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextRole {
    Editor,
    MainApp,
}

impl ContextRole {
    pub fn heartbeat_key(&self) -> &'static str {
        match self {
            ContextRole::Editor => EDITOR_LAST_UPDATE_KEY,
            ContextRole::MainApp => MAIN_APP_LAST_UPDATE_KEY,
        }
    }

    pub fn peer(&self) -> ContextRole {
        match self {
            ContextRole::Editor => ContextRole::MainApp,
            ContextRole::MainApp => ContextRole::Editor,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => f.write_str("connected"),
            ConnectionStatus::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// A change to one storage key, as seen by an observer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
}
