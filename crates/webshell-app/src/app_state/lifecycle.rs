//! Process lifecycle: what registry events and session end mean per run mode.

use webshell_common::ClientPostMessage;
use webshell_config::{RunMode, SessionConfig, WindowOptions};
use webshell_webview::RegistryEvent;

use super::types::{EVENT_ALL_WINDOW_CLOSED, EVENT_CORE_LOADED, EVENT_WINDOW_CLOSED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    /// Direct mode, main window open.
    Running,
    /// Orchestrated mode, session started.
    Connected,
    Terminating,
    Terminated,
}

/// Work the event loop must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenMainWindow(WindowOptions),
    StartSession(SessionConfig),
    Notify(ClientPostMessage),
    Exit,
}

pub struct Lifecycle {
    mode: RunMode,
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            state: LifecycleState::Starting,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_orchestrated(&self) -> bool {
        matches!(self.mode, RunMode::Orchestrated(_))
    }

    fn is_ending(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::Terminating | LifecycleState::Terminated
        )
    }

    /// Leave `Starting`. Runs once.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.state != LifecycleState::Starting {
            return Vec::new();
        }
        match &self.mode {
            RunMode::Direct(options) => {
                self.state = LifecycleState::Running;
                vec![Effect::OpenMainWindow(options.clone())]
            }
            RunMode::Orchestrated(session) => {
                self.state = LifecycleState::Connected;
                vec![Effect::StartSession(session.clone())]
            }
        }
    }

    /// React to a registry event.
    ///
    /// Direct mode terminates when the last window closes. Orchestrated mode
    /// forwards every event to the peer and keeps running.
    pub fn on_registry_event(&mut self, event: &RegistryEvent) -> Vec<Effect> {
        if self.is_ending() {
            return Vec::new();
        }
        match (&self.mode, event) {
            (RunMode::Direct(_), RegistryEvent::AllWindowsClosed) => self.terminate(),
            (RunMode::Direct(_), _) => Vec::new(),
            (RunMode::Orchestrated(_), RegistryEvent::SurfaceReady { name }) => vec![Effect::Notify(
                ClientPostMessage::for_window(EVENT_CORE_LOADED, name),
            )],
            (RunMode::Orchestrated(_), RegistryEvent::WindowClosed { name }) => vec![Effect::Notify(
                ClientPostMessage::for_window(EVENT_WINDOW_CLOSED, name),
            )],
            (RunMode::Orchestrated(_), RegistryEvent::AllWindowsClosed) => {
                vec![Effect::Notify(ClientPostMessage::new(EVENT_ALL_WINDOW_CLOSED))]
            }
        }
    }

    /// The session ended. Terminates whatever windows remain open.
    pub fn on_client_exit(&mut self) -> Vec<Effect> {
        if self.is_ending() {
            return Vec::new();
        }
        self.terminate()
    }

    /// Startup could not complete.
    pub fn on_startup_failed(&mut self) -> Vec<Effect> {
        if self.is_ending() {
            return Vec::new();
        }
        self.terminate()
    }

    /// The process finished tearing down.
    pub fn finish(&mut self) {
        self.state = LifecycleState::Terminated;
    }

    fn terminate(&mut self) -> Vec<Effect> {
        self.state = LifecycleState::Terminating;
        vec![Effect::Exit]
    }
}

// =============================================================================
// TESTS
// =============================================================================
