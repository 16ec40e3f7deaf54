//! `with-session` section: attach to a remote orchestrator.

use serde::{Deserialize, Serialize};

/// Orchestrated-mode settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// WebSocket URL of the orchestrator.
    pub url: String,
}
