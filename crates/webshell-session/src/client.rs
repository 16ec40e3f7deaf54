use std::sync::Arc;

use webshell_common::{ClientPostMessage, SessionError, SessionInfo};

use crate::handler::SessionHandler;

/// A connection to the orchestrator.
///
/// Identity fields are empty until the first handshake completes and never
/// change afterwards.
pub trait SessionClient: Send {
    /// Connect in the background and start delivering callbacks to `handler`.
    fn start(&mut self, handler: Arc<dyn SessionHandler>) -> Result<(), SessionError>;

    /// Close the connection and wait for background work to finish.
    fn stop(&mut self);

    /// Queue a notification for the peer. Fire and forget.
    fn send_post_message(&self, message: ClientPostMessage) -> Result<(), SessionError>;

    /// Snapshot of the session identity.
    fn identity(&self) -> SessionInfo;

    fn session_id(&self) -> String {
        self.identity().session_id
    }

    fn server_id(&self) -> String {
        self.identity().server_id
    }

    fn session_info(&self) -> String {
        self.identity().session_info
    }

    fn server_url(&self) -> String {
        self.identity().server_url
    }
}
