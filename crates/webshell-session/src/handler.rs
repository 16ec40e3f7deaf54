use webshell_common::{RpcParams, RpcResult};

/// Callbacks a [`SessionClient`](crate::SessionClient) makes into the
/// application. Called from background threads.
pub trait SessionHandler: Send + Sync {
    /// Informational event from the session layer.
    fn on_info(&self, location: &str, message: &str);

    /// Protocol or transport error. Never fatal on its own.
    fn on_error(&self, location: &str, error: &str);

    /// The session ended; the process should terminate.
    fn on_client_exit(&self);

    /// Execute a remote command and return its outcome. Blocks until done.
    fn handle_rpc(&self, action: &str, params: RpcParams) -> RpcResult;

    /// Whether to reconnect after an unexpected drop. Blocks until decided.
    fn should_reattach(&self) -> bool;
}
