//! JSON frames exchanged with the orchestrator, tagged by `type`.

use serde::{Deserialize, Serialize};
use webshell_common::{ClientPostMessage, RpcParams, RpcResult};

/// Frames the orchestrator sends to us.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Hello {
        session_id: String,
        server_id: String,
        #[serde(default)]
        session_info: String,
    },

    Rpc {
        id: String,
        action: String,
        #[serde(default)]
        params: RpcParams,
    },

    Bye {
        #[serde(default)]
        reason: Option<String>,
    },

    Error { message: String },
}

/// Frames we send to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    RpcResult {
        id: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        extra_info: Option<RpcParams>,
    },

    Post {
        event_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        extension: Option<RpcParams>,
    },
}

impl ServerFrame {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl ClientFrame {
    pub fn rpc_result(id: impl Into<String>, result: &RpcResult) -> Self {
        Self::RpcResult {
            id: id.into(),
            success: result.is_success(),
            error_message: result.error_message().map(str::to_string),
            extra_info: result.extra_info().cloned(),
        }
    }

    pub fn post(message: ClientPostMessage) -> Self {
        Self::Post {
            event_name: message.event_name,
            extension: message.extension,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
