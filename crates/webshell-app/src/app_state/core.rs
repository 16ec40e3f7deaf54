//! WebshellApp struct definition and constructor.

use std::time::Instant;

use winit::event_loop::EventLoopProxy;

use webshell_common::SessionInfo;
use webshell_config::RunMode;
use webshell_session::{ProtocolAdapter, WsSessionClient};
use webshell_webview::WebViewManager;

use super::host::BrowserWindow;
use super::notice::ErrorNotice;
use super::reattach::{DialogPrompt, ReattachPrompt};
use super::shell::Shell;
use super::types::UserEvent;

/// Top-level application state.
pub struct WebshellApp {
    // Windows and lifecycle
    pub(super) shell: Shell<BrowserWindow>,
    pub(super) manager: WebViewManager,

    // Orchestrator session (orchestrated mode only)
    pub(super) session: Option<ProtocolAdapter<WsSessionClient>>,
    pub(super) session_info: SessionInfo,
    pub(super) prompt: Box<dyn ReattachPrompt>,
    pub(super) client_exited: bool,

    // Fatal startup error on screen; exit waits for it
    pub(super) notice: Option<ErrorNotice>,
    pub(super) exit_after_notice: bool,

    pub(super) proxy: EventLoopProxy<UserEvent>,

    pub(super) started: bool,
    // Whether the app should exit
    pub(super) should_exit: bool,
    pub(super) last_poll: Instant,
}

impl WebshellApp {
    pub fn new(mode: RunMode, proxy: EventLoopProxy<UserEvent>) -> Self {
        Self::with_prompt(mode, proxy, Box::new(DialogPrompt::new()))
    }

    pub fn with_prompt(
        mode: RunMode,
        proxy: EventLoopProxy<UserEvent>,
        prompt: Box<dyn ReattachPrompt>,
    ) -> Self {
        Self {
            shell: Shell::new(mode),
            manager: WebViewManager::new(),
            session: None,
            session_info: SessionInfo::default(),
            prompt,
            client_exited: false,
            notice: None,
            exit_after_notice: false,
            proxy,
            started: false,
            should_exit: false,
            last_poll: Instant::now(),
        }
    }
}
