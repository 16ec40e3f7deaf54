//! Startup and carrying out lifecycle effects.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use winit::event_loop::ActiveEventLoop;

use webshell_common::SessionError;
use webshell_config::{SessionConfig, WindowOptions};
use webshell_session::{ProtocolAdapter, Waker, WsSessionClient};

use super::core::WebshellApp;
use super::host::WinitHost;
use super::lifecycle::Effect;
use super::session_service::notify;
use super::types::UserEvent;

impl WebshellApp {
    /// Leave the starting state. Safe to call on every `resumed`.
    pub(super) fn start(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;
        tracing::info!(orchestrated = self.shell.is_orchestrated(), "Starting");

        let effects = self.shell.start();
        self.apply_effects(event_loop, effects);
    }

    /// Carry out effects in order, including any raised while doing so.
    pub(super) fn apply_effects(&mut self, event_loop: &ActiveEventLoop, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::OpenMainWindow(options) => {
                    if let Err(e) = self.open_main_window(event_loop, options) {
                        tracing::error!(location = "startup", error = %e, "Failed to open main window");
                        self.show_notice(event_loop, &format!("Failed to open main window: {e}"));
                        queue.extend(self.shell.fail_startup());
                    }
                }
                Effect::StartSession(config) => {
                    if let Err(e) = self.start_session(&config) {
                        tracing::error!(location = "startup", url = %config.url, error = %e, "Failed to start session");
                        self.show_notice(
                            event_loop,
                            &format!("Failed to start session with {}: {e}", config.url),
                        );
                        queue.extend(self.shell.fail_startup());
                    }
                }
                Effect::Notify(message) => notify(self.session.as_ref(), message),
                Effect::Exit if self.notice.is_some() => {
                    tracing::info!("Exit requested; waiting for the error notice");
                    self.exit_after_notice = true;
                }
                Effect::Exit => self.request_exit(event_loop),
            }
        }
    }

    pub(super) fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        tracing::info!("Exit requested");
        self.should_exit = true;
        event_loop.exit();
    }

    fn open_main_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        options: WindowOptions,
    ) -> Result<(), webshell_common::WindowError> {
        let mut host = WinitHost {
            event_loop,
            manager: &self.manager,
            session: &self.session_info,
        };
        self.shell.open_main(&mut host, options)
    }

    fn start_session(&mut self, config: &SessionConfig) -> Result<(), SessionError> {
        let proxy = Mutex::new(self.proxy.clone());
        let waker: Waker = Arc::new(move || {
            if let Ok(proxy) = proxy.lock() {
                // Fails only once the loop has exited.
                let _ = proxy.send_event(UserEvent::SessionWake);
            }
        });

        let mut adapter = ProtocolAdapter::new(WsSessionClient::new(config.url.clone()), waker);
        adapter.start()?;
        tracing::info!(url = %config.url, "Session started");
        self.session = Some(adapter);
        Ok(())
    }
}
