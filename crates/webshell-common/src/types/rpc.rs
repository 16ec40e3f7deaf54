use serde::{Deserialize, Serialize};

use super::value::{RpcParams, RpcValue};

/// Outcome of one remote command.
///
/// `error_message` is present exactly when the command failed; `extra_info`
/// only ever accompanies a success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResult {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extra_info: Option<RpcParams>,
}

impl RpcResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: None,
            extra_info: None,
        }
    }

    pub fn ok_with(extra_info: RpcParams) -> Self {
        Self {
            success: true,
            error_message: None,
            extra_info: Some(extra_info),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            extra_info: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn extra_info(&self) -> Option<&RpcParams> {
        self.extra_info.as_ref()
    }
}

/// Fire-and-forget notification sent to the remote peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPostMessage {
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<RpcParams>,
}

impl ClientPostMessage {
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            extension: None,
        }
    }

    /// Notification whose extension carries a single `name` field.
    pub fn for_window(event_name: impl Into<String>, window_name: &str) -> Self {
        let mut ext = RpcParams::new();
        ext.insert("name".into(), RpcValue::from(window_name));
        Self {
            event_name: event_name.into(),
            extension: Some(ext),
        }
    }
}
