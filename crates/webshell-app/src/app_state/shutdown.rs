//! Graceful shutdown: resolve the prompt, stop the session, close windows.

use winit::event_loop::ActiveEventLoop;

use webshell_session::ReattachReply;

use super::core::WebshellApp;
use super::host::WinitHost;
use super::session_service::OwnerContext;

// =============================================================================
// SHUTDOWN
// =============================================================================

impl WebshellApp {
    /// Perform graceful shutdown of all subsystems. Idempotent.
    ///
    /// Order matters:
    /// 1. Cancel any reattach question (unblocks the session thread)
    /// 2. Stop the session, running commands already queued
    /// 3. Drop every window
    pub(super) fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        tracing::info!("Initiating graceful shutdown");

        self.prompt.cancel();
        self.notice = None;

        if let Some(mut adapter) = self.session.take() {
            let manager = &self.manager;
            let prompt = self.prompt.as_mut();
            let mut ctx = OwnerContext {
                host: WinitHost {
                    event_loop,
                    manager,
                    session: &self.session_info,
                },
                shell: &mut self.shell,
                ask_reattach: |reply: ReattachReply| prompt.ask(event_loop, manager, reply),
                client_exited: &mut self.client_exited,
            };
            adapter.stop(&mut ctx);
        }

        self.shell.teardown();
        self.should_exit = true;

        tracing::info!(state = ?self.shell.state(), "Graceful shutdown complete");
    }
}
