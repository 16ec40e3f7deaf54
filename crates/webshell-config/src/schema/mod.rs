//! Configuration schema types.
//!
//! All section structs use `serde(default)` so partial documents work.

mod go_url;
mod session;
mod window;

pub use go_url::*;
pub use session::*;
pub use window::*;

use std::path::Path;

use serde::{Deserialize, Serialize};
use webshell_common::ConfigError;

/// Root of a configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "go-url", default, skip_serializing_if = "Option::is_none")]
    pub go_url: Option<GoUrlConfig>,
    #[serde(rename = "with-session", default, skip_serializing_if = "Option::is_none")]
    pub with_session: Option<SessionConfig>,
}

/// How the process is driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Open one window from these options; exit when it closes.
    Direct(WindowOptions),
    /// Attach to the orchestrator; windows are opened remotely.
    Orchestrated(SessionConfig),
}

impl ConfigDocument {
    /// Pick the run mode. `go-url` wins when both sections are present.
    pub fn run_mode(&self, path: &Path) -> Result<RunMode, ConfigError> {
        if let Some(go_url) = &self.go_url {
            return Ok(RunMode::Direct(WindowOptions::from(go_url)));
        }
        if let Some(session) = &self.with_session {
            return Ok(RunMode::Orchestrated(session.clone()));
        }
        Err(ConfigError::NoMode(path.to_path_buf()))
    }
}
