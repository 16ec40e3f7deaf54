use serde::{Deserialize, Serialize};

/// Identity of the orchestrator session this process is attached to.
///
/// Read once after the session client connects and never changes afterwards.
/// Every field is an empty string in direct mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub server_id: String,
    pub session_info: String,
    pub server_url: String,
}

impl SessionInfo {
    /// True when no session was ever established.
    pub fn is_empty(&self) -> bool {
        self.session_id.is_empty() && self.server_id.is_empty() && self.server_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(SessionInfo::default().is_empty());
    }

    #[test]
    fn populated_is_not_empty() {
        let info = SessionInfo {
            session_id: "s-1".into(),
            server_id: "srv".into(),
            session_info: String::new(),
            server_url: "ws://127.0.0.1:9000".into(),
        };
        assert!(!info.is_empty());
    }
}
