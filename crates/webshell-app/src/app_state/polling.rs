//! Polling for session requests and web view events.

use std::time::Instant;

use winit::event_loop::{ActiveEventLoop, ControlFlow};

use webshell_session::ReattachReply;
use webshell_webview::SurfaceEvent;

use super::core::WebshellApp;
use super::host::WinitHost;
use super::notice;
use super::session_service::OwnerContext;
use super::types::POLL_INTERVAL;

impl WebshellApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll(event_loop);
        }

        if self.should_exit {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// One full pass: session inbox, web view events, then lifecycle effects.
    pub(super) fn poll(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            return;
        }
        self.poll_session(event_loop);
        self.poll_webview_events(event_loop);
        self.settle(event_loop);
    }

    /// Execute everything the session queued for this thread.
    fn poll_session(&mut self, event_loop: &ActiveEventLoop) {
        let Some(adapter) = self.session.as_mut() else {
            return;
        };
        if self.session_info.is_empty() {
            self.session_info = adapter.identity();
        }

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
        let served = adapter.serve(&mut ctx);
        if served > 0 {
            tracing::trace!(served, "Session requests served");
        }
    }

    /// Route pending web view events to the dialogs or the shell.
    fn poll_webview_events(&mut self, event_loop: &ActiveEventLoop) {
        for event in self.manager.drain_events() {
            match &event {
                SurfaceEvent::IpcMessage { surface_id, body } if self.owns_notice(*surface_id) => {
                    if notice::is_dismissal(body) {
                        self.dismiss_notice(event_loop);
                    }
                }
                SurfaceEvent::IpcMessage { surface_id, body }
                    if self.prompt.handle_ipc(*surface_id, body) => {}
                SurfaceEvent::Ready { surface_id }
                    if self.prompt.owns(*surface_id) || self.owns_notice(*surface_id) => {}
                _ => self.shell.on_surface_event(&event),
            }
        }
    }

    /// Turn registry events and a finished session into effects and run them.
    pub(super) fn settle(&mut self, event_loop: &ActiveEventLoop) {
        let mut effects = self.shell.settle();
        if std::mem::take(&mut self.client_exited) {
            tracing::info!("Session client exited");
            effects.extend(self.shell.on_client_exit());
        }
        if !effects.is_empty() {
            self.apply_effects(event_loop, effects);
        }
    }
}
