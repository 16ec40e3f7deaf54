//! Scripts injected into every page, and the messages pages send back.
//!
//! - **JS -> Rust**: `window.webshell.ipc.send(kind, payload)` posts a JSON
//!   object through `window.ipc.postMessage`, surfacing as
//!   [`SurfaceEvent::IpcMessage`](crate::events::SurfaceEvent).
//! - **Session constants**: [`session_constants_script`] defines read-only
//!   identity fields on `window.webshell`.

use serde::{Deserialize, Serialize};
use webshell_common::SessionInfo;

/// A typed IPC message from JavaScript to Rust.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    /// The message type / command name.
    pub kind: String,
    #[serde(default)]
    pub payload: IpcPayload,
}

/// Payload of an IPC message: a plain string, structured JSON, or nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcPayload {
    Text(String),
    Json(serde_json::Value),
    #[default]
    None,
}

impl IpcPayload {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Json(serde_json::Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string (from JS postMessage).
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Sets up `window.webshell.ipc` on the JS side.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    window.webshell = window.webshell || {};
    Object.defineProperty(window.webshell, 'ipc', {
        enumerable: true,
        value: Object.freeze({
            send: function(kind, payload) {
                window.ipc.postMessage(JSON.stringify({
                    kind: kind,
                    payload: payload === undefined ? null : payload
                }));
            }
        })
    });
})();
"#;

/// Script exposing the window name and session identity as read-only fields
/// of `window.webshell`. Fields are empty strings outside a session.
pub fn session_constants_script(window_name: &str, session: &SessionInfo) -> String {
    let constants = serde_json::json!({
        "windowName": window_name,
        "serverId": session.server_id,
        "sessionId": session.session_id,
        "sessionInfo": session.session_info,
        "serverUrl": session.server_url,
    });
    format!(
        r#"(function() {{
    var c = {constants};
    window.webshell = window.webshell || {{}};
    Object.keys(c).forEach(function(k) {{
        Object.defineProperty(window.webshell, k, {{ value: c[k], enumerable: true, writable: false }});
    }});
}})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_message_with_payload() {
        let msg = IpcMessage::from_json(r#"{"kind":"reattach_answer","payload":true}"#).unwrap();
        assert_eq!(msg.kind, "reattach_answer");
        assert_eq!(msg.payload.as_bool(), Some(true));
    }

    #[test]
    fn missing_payload_is_none() {
        let msg = IpcMessage::from_json(r#"{"kind":"ping"}"#).unwrap();
        assert!(matches!(msg.payload, IpcPayload::None));
        assert_eq!(msg.payload.as_bool(), None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(IpcMessage::from_json("nope").is_none());
        assert!(IpcMessage::from_json(r#"{"payload":1}"#).is_none());
    }

    #[test]
    fn constants_script_embeds_identity() {
        let session = SessionInfo {
            session_id: "s-42".into(),
            server_id: "srv-1".into(),
            session_info: "{\"user\":\"x\"}".into(),
            server_url: "ws://127.0.0.1:9000".into(),
        };
        let js = session_constants_script("main", &session);
        assert!(js.contains(r#""windowName":"main""#));
        assert!(js.contains(r#""sessionId":"s-42""#));
        assert!(js.contains(r#""serverUrl":"ws://127.0.0.1:9000""#));
        // Quotes inside values are escaped.
        assert!(js.contains(r#""sessionInfo":"{\"user\":\"x\"}""#));
        assert!(js.contains("writable: false"));
    }

    #[test]
    fn constants_are_empty_without_session() {
        let js = session_constants_script("main", &SessionInfo::default());
        assert!(js.contains(r#""sessionId":"""#));
        assert!(js.contains(r#""serverId":"""#));
    }

    #[test]
    fn ipc_bridge_posts_json() {
        assert!(IPC_INIT_SCRIPT.contains("window.ipc.postMessage(JSON.stringify"));
        assert!(IPC_INIT_SCRIPT.contains("window.webshell"));
    }
}
