//! Owning-thread executor for session requests.

use webshell_common::{ClientPostMessage, RpcParams, RpcResult};
use webshell_session::{OwnerService, ProtocolAdapter, ReattachReply, SessionClient};
use webshell_webview::WindowHost;

use super::shell::Shell;

/// Borrows the app state for one drain of the session inbox.
///
/// `ask_reattach` receives every reattach question; it must answer the
/// reply eventually, not necessarily before returning.
pub(super) struct OwnerContext<'a, H: WindowHost, A> {
    pub host: H,
    pub shell: &'a mut Shell<H::Surface>,
    pub ask_reattach: A,
    pub client_exited: &'a mut bool,
}

impl<H, A> OwnerService for OwnerContext<'_, H, A>
where
    H: WindowHost,
    A: FnMut(ReattachReply),
{
    fn rpc(&mut self, action: &str, params: &RpcParams) -> RpcResult {
        self.shell.handle_rpc(&mut self.host, action, params)
    }

    fn reattach(&mut self, reply: ReattachReply) {
        (self.ask_reattach)(reply);
    }

    fn client_exit(&mut self) {
        *self.client_exited = true;
    }
}

/// Send a notification to the peer, if a session is running.
pub(super) fn notify<C: SessionClient>(
    session: Option<&ProtocolAdapter<C>>,
    message: ClientPostMessage,
) {
    let Some(adapter) = session else {
        tracing::debug!(event = %message.event_name, "No session; notification dropped");
        return;
    };
    let event = message.event_name.clone();
    match adapter.send_post_message(message) {
        Ok(()) => tracing::debug!(event = %event, "Notification sent"),
        Err(e) => tracing::warn!(location = "notify", event = %event, error = %e, "Failed to send notification"),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    use webshell_common::{RpcValue, SessionError, SessionInfo};
    use webshell_config::{RunMode, SessionConfig};
    use webshell_session::SessionHandler;
    use webshell_webview::testing::{RecordingHost, RecordingSurface};

    use crate::app_state::lifecycle::{Effect, LifecycleState};

    type HandlerSlot = Arc<Mutex<Option<Arc<dyn SessionHandler>>>>;

    /// Client that hands its handler to the test and keeps every post.
    #[derive(Default)]
    struct LoopbackClient {
        handler: HandlerSlot,
        posted: Arc<Mutex<Vec<ClientPostMessage>>>,
    }

    impl SessionClient for LoopbackClient {
        fn start(&mut self, handler: Arc<dyn SessionHandler>) -> Result<(), SessionError> {
            *self.handler.lock().unwrap() = Some(handler);
            Ok(())
        }

        fn stop(&mut self) {
            self.handler.lock().unwrap().take();
        }

        fn send_post_message(&self, message: ClientPostMessage) -> Result<(), SessionError> {
            self.posted.lock().unwrap().push(message);
            Ok(())
        }

        fn identity(&self) -> SessionInfo {
            SessionInfo::default()
        }
    }

    struct Harness {
        adapter: ProtocolAdapter<LoopbackClient>,
        handler: Arc<dyn SessionHandler>,
        posted: Arc<Mutex<Vec<ClientPostMessage>>>,
        shell: Shell<RecordingSurface>,
        host: RecordingHost,
        client_exited: bool,
    }

    impl Harness {
        fn start() -> Self {
            let client = LoopbackClient::default();
            let slot = Arc::clone(&client.handler);
            let posted = Arc::clone(&client.posted);
            let mut adapter = ProtocolAdapter::new(client, Arc::new(|| {}));
            adapter.start().unwrap();
            let handler = slot.lock().unwrap().clone().unwrap();

            let mut shell = Shell::new(RunMode::Orchestrated(SessionConfig {
                url: "ws://127.0.0.1:9000".into(),
            }));
            shell.start();

            Self {
                adapter,
                handler,
                posted,
                shell,
                host: RecordingHost::new(),
                client_exited: false,
            }
        }

        /// Serve the inbox until `worker` is done, then once more for
        /// fire-and-forget requests it left behind.
        fn serve_until<T>(&mut self, worker: &JoinHandle<T>) {
            loop {
                let done = worker.is_finished();
                let mut ctx = OwnerContext {
                    host: self.host.clone(),
                    shell: &mut self.shell,
                    ask_reattach: |reply: ReattachReply| reply.answer(true),
                    client_exited: &mut self.client_exited,
                };
                self.adapter.serve(&mut ctx);
                if done {
                    return;
                }
                thread::sleep(Duration::from_millis(5));
            }
        }

        /// Carry out lifecycle effects the way the event loop does.
        fn settle(&mut self) -> Vec<Effect> {
            let mut rest = Vec::new();
            let mut effects = self.shell.settle();
            if std::mem::take(&mut self.client_exited) {
                effects.extend(self.shell.on_client_exit());
            }
            for effect in effects {
                match effect {
                    Effect::Notify(message) => notify(Some(&self.adapter), message),
                    other => rest.push(other),
                }
            }
            rest
        }
    }

    fn named(name: &str) -> RpcParams {
        let mut p = RpcParams::new();
        p.insert("name".into(), RpcValue::from(name));
        p
    }

    #[test]
    fn remote_window_commands_end_in_notifications() {
        let mut h = Harness::start();

        let remote = Arc::clone(&h.handler);
        let worker = thread::spawn(move || {
            (
                remote.handle_rpc("new_window", named("a")),
                remote.handle_rpc("close_window", named("a")),
            )
        });
        h.serve_until(&worker);
        let (opened, closed) = worker.join().unwrap();

        assert!(opened.is_success());
        assert!(closed.is_success());
        assert_eq!(h.host.opened(), vec!["a".to_string()]);
        assert!(h.settle().is_empty());
        assert_eq!(
            *h.posted.lock().unwrap(),
            vec![
                ClientPostMessage::for_window("window_closed", "a"),
                ClientPostMessage::new("all_window_closed"),
            ]
        );
        assert_eq!(h.shell.state(), LifecycleState::Connected);
    }

    #[test]
    fn rejected_command_reaches_the_caller() {
        let mut h = Harness::start();

        let remote = Arc::clone(&h.handler);
        let worker = thread::spawn(move || remote.handle_rpc("close_window", named("ghost")));
        h.serve_until(&worker);

        let result = worker.join().unwrap();
        assert!(!result.is_success());
        assert!(h.settle().is_empty());
        assert!(h.posted.lock().unwrap().is_empty());
    }

    #[test]
    fn reattach_question_is_answered_on_the_owning_thread() {
        let mut h = Harness::start();

        let remote = Arc::clone(&h.handler);
        let worker = thread::spawn(move || remote.should_reattach());
        h.serve_until(&worker);

        assert!(worker.join().unwrap());
    }

    #[test]
    fn client_exit_ends_the_process() {
        let mut h = Harness::start();

        let remote = Arc::clone(&h.handler);
        let worker = thread::spawn(move || {
            remote.handle_rpc("new_window", named("a"));
            remote.on_client_exit();
        });
        h.serve_until(&worker);
        worker.join().unwrap();

        assert!(h.client_exited);
        assert_eq!(h.settle(), vec![Effect::Exit]);
        assert_eq!(h.shell.state(), LifecycleState::Terminating);
        assert!(h.posted.lock().unwrap().is_empty());
    }
}
