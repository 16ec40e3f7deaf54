//! Window registry plus lifecycle, independent of winit.
//!
//! Everything the event loop does to windows goes through [`Shell`], which
//! turns registry events into [`Effect`]s for the loop to carry out.

use webshell_common::{RpcParams, RpcResult, WindowError};
use webshell_config::{RunMode, WindowOptions};
use webshell_webview::{PageLoadState, SurfaceEvent, WindowHost, WindowRegistry, WindowSurface};

use super::lifecycle::{Effect, Lifecycle, LifecycleState};
use super::rpc_dispatch;
use super::types::MAIN_WINDOW;

pub struct Shell<S> {
    registry: WindowRegistry<S>,
    lifecycle: Lifecycle,
}

impl<S: WindowSurface> Shell<S> {
    pub fn new(mode: RunMode) -> Self {
        Self {
            registry: WindowRegistry::new(),
            lifecycle: Lifecycle::new(mode),
        }
    }

    pub fn start(&mut self) -> Vec<Effect> {
        self.lifecycle.start()
    }

    /// Open the direct-mode window.
    pub fn open_main<H: WindowHost<Surface = S>>(
        &mut self,
        host: &mut H,
        options: WindowOptions,
    ) -> Result<(), WindowError> {
        self.registry.create(host, MAIN_WINDOW, options).map(|_| ())
    }

    /// Run one remote command against the registry.
    pub fn handle_rpc<H: WindowHost<Surface = S>>(
        &mut self,
        host: &mut H,
        action: &str,
        params: &RpcParams,
    ) -> RpcResult {
        rpc_dispatch::dispatch(&mut self.registry, host, action, params)
    }

    /// Feed a web view event into the registry.
    pub fn on_surface_event(&mut self, event: &SurfaceEvent) {
        match event {
            SurfaceEvent::Ready { surface_id } => {
                if let Some(name) = self.name_of(*surface_id) {
                    self.registry.on_surface_ready(&name);
                }
            }
            SurfaceEvent::PageLoad {
                surface_id,
                state: PageLoadState::Finished,
                url,
            } => {
                tracing::debug!(surface_id, url = %url, "Page loaded");
            }
            SurfaceEvent::IpcMessage { surface_id, body } => {
                tracing::debug!(surface_id, len = body.len(), "Unhandled page message");
            }
            SurfaceEvent::PageLoad { .. } => {}
        }
    }

    /// The user asked to close the window with this native id.
    pub fn user_close_requested(&mut self, surface_id: u64) -> bool {
        match self.name_of(surface_id) {
            Some(name) => self.registry.user_close_requested(&name),
            None => false,
        }
    }

    /// The native window went away without going through the registry.
    pub fn on_window_destroyed(&mut self, surface_id: u64) -> bool {
        match self.name_of(surface_id) {
            Some(name) => self.registry.on_window_closed(&name),
            None => false,
        }
    }

    /// Turn queued registry events into effects.
    pub fn settle(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        for event in self.registry.drain_events() {
            effects.extend(self.lifecycle.on_registry_event(&event));
        }
        effects
    }

    pub fn on_client_exit(&mut self) -> Vec<Effect> {
        self.lifecycle.on_client_exit()
    }

    pub fn fail_startup(&mut self) -> Vec<Effect> {
        self.lifecycle.on_startup_failed()
    }

    /// Drop every remaining window and mark the process terminated.
    pub fn teardown(&mut self) {
        self.registry.close_all();
        self.lifecycle.finish();
    }

    pub fn registry(&self) -> &WindowRegistry<S> {
        &self.registry
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_orchestrated(&self) -> bool {
        self.lifecycle.is_orchestrated()
    }

    fn name_of(&self, surface_id: u64) -> Option<String> {
        self.registry.find_by_surface(surface_id).map(str::to_string)
    }
}

// =============================================================================
// TESTS
// =============================================================================
