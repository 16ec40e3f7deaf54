//! Bridges a [`SessionClient`] to the owning thread.
//!
//! The client calls into [`AdapterHandler`] from background threads. Remote
//! commands and reattach questions are marshaled onto the owning thread one
//! at a time; the owning thread executes them when it calls
//! [`ProtocolAdapter::serve`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};
use webshell_common::{
    new_correlation_id, ClientPostMessage, RpcParams, RpcResult, SessionError, SessionInfo,
};

use crate::client::SessionClient;
use crate::handler::SessionHandler;
use crate::owner::{
    owner_channel, OwnerHandle, OwnerInbox, OwnerRequest, OwnerService, ReattachReply, Waker,
};

/// Background-facing half of the adapter.
pub struct AdapterHandler {
    owner: OwnerHandle,
    /// Held for the whole rendezvous: one marshaled call in flight.
    gate: Mutex<()>,
    stopping: AtomicBool,
}

impl AdapterHandler {
    fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }

    /// Error text for a rendezvous that could not complete.
    fn unavailable(&self) -> String {
        if self.is_stopping() {
            SessionError::Stopped.to_string()
        } else {
            SessionError::OwnerUnavailable.to_string()
        }
    }

    fn marshal_rpc(&self, id: &str, action: &str, params: RpcParams) -> RpcResult {
        if self.is_stopping() {
            return RpcResult::fail(SessionError::Stopped.to_string());
        }
        let _gate = match self.gate.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.is_stopping() {
            return RpcResult::fail(SessionError::Stopped.to_string());
        }

        let (tx, rx) = mpsc::sync_channel(1);
        let request = OwnerRequest::Rpc {
            id: id.to_string(),
            action: action.to_string(),
            params,
            reply: tx,
        };
        if self.owner.post(request).is_err() {
            return RpcResult::fail(self.unavailable());
        }
        rx.recv().unwrap_or_else(|_| RpcResult::fail(self.unavailable()))
    }
}

impl SessionHandler for AdapterHandler {
    fn on_info(&self, location: &str, message: &str) {
        info!(location, "{message}");
    }

    fn on_error(&self, location: &str, err: &str) {
        error!(location, error = %err, "session error");
    }

    fn on_client_exit(&self) {
        if self.is_stopping() {
            return;
        }
        if self.owner.post(OwnerRequest::ClientExit).is_err() {
            debug!("client exit after owning thread went away");
        }
    }

    fn handle_rpc(&self, action: &str, params: RpcParams) -> RpcResult {
        let id = new_correlation_id();
        debug!(target: "rpc", %id, action, "rpc request");
        for (key, value) in &params {
            debug!(target: "rpc", %id, param = %key, value = %value, "rpc param");
        }

        let result = self.marshal_rpc(&id, action, params);

        match result.error_message() {
            None if result.is_success() => debug!(target: "rpc", %id, action, "rpc ok"),
            Some(msg) => debug!(target: "rpc", %id, action, error = %msg, "rpc failed"),
            None => debug!(target: "rpc", %id, action, "rpc failed"),
        }
        if let Some(extra) = result.extra_info() {
            for (key, value) in extra {
                debug!(target: "rpc", %id, key = %key, value = %value, "rpc extra info");
            }
        }
        result
    }

    fn should_reattach(&self) -> bool {
        if self.is_stopping() {
            return false;
        }
        let _gate = match self.gate.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.is_stopping() {
            return false;
        }

        let (tx, rx) = mpsc::sync_channel(1);
        let request = OwnerRequest::Reattach {
            reply: ReattachReply::new(tx),
        };
        if self.owner.post(request).is_err() {
            return false;
        }
        let answer = rx.recv().unwrap_or(false);
        info!(answer, "reattach decided");
        answer
    }
}

/// Owning-thread half: owns the client and the request inbox.
pub struct ProtocolAdapter<C: SessionClient> {
    client: C,
    handler: Arc<AdapterHandler>,
    inbox: Option<OwnerInbox>,
}

impl<C: SessionClient> ProtocolAdapter<C> {
    /// `waker` is invoked from background threads whenever work is queued.
    pub fn new(client: C, waker: Waker) -> Self {
        let (owner, inbox) = owner_channel(waker);
        Self {
            client,
            handler: Arc::new(AdapterHandler {
                owner,
                gate: Mutex::new(()),
                stopping: AtomicBool::new(false),
            }),
            inbox: Some(inbox),
        }
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.inbox.is_none() {
            return Err(SessionError::Stopped);
        }
        let handler: Arc<dyn SessionHandler> = Arc::clone(&self.handler) as Arc<dyn SessionHandler>;
        self.client.start(handler)
    }

    /// Execute queued requests on the owning thread. Returns how many ran.
    pub fn serve<S: OwnerService>(&mut self, service: &mut S) -> usize {
        match &self.inbox {
            Some(inbox) => inbox.serve(service),
            None => 0,
        }
    }

    /// Close the adapter.
    ///
    /// New calls fail fast from here on. Requests already queued still run
    /// (reattach questions are answered "no"), then the inbox is released
    /// and the client stopped.
    pub fn stop<S: OwnerService>(&mut self, service: &mut S) {
        let Some(inbox) = self.inbox.take() else {
            return;
        };
        self.handler.stopping.store(true, Ordering::SeqCst);

        let drained = inbox.serve(&mut Draining(service));
        if drained > 0 {
            debug!(drained, "served pending session requests during stop");
        }
        drop(inbox);

        self.client.stop();
        info!("session adapter stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.inbox.is_none()
    }

    pub fn send_post_message(&self, message: ClientPostMessage) -> Result<(), SessionError> {
        if self.is_stopped() {
            return Err(SessionError::Stopped);
        }
        debug!(event = %message.event_name, "posting to session peer");
        self.client.send_post_message(message)
    }

    pub fn identity(&self) -> SessionInfo {
        self.client.identity()
    }

    pub fn session_id(&self) -> String {
        self.client.session_id()
    }

    pub fn server_id(&self) -> String {
        self.client.server_id()
    }

    pub fn session_info(&self) -> String {
        self.client.session_info()
    }

    pub fn server_url(&self) -> String {
        self.client.server_url()
    }
}

impl<C: SessionClient> Drop for ProtocolAdapter<C> {
    fn drop(&mut self) {
        if self.inbox.take().is_some() {
            self.handler.stopping.store(true, Ordering::SeqCst);
            self.client.stop();
        }
    }
}

/// Service wrapper used while stopping: commands still run, the session is
/// never resumed and exit notices are moot.
struct Draining<'a, S>(&'a mut S);

impl<S: OwnerService> OwnerService for Draining<'_, S> {
    fn rpc(&mut self, action: &str, params: &RpcParams) -> RpcResult {
        self.0.rpc(action, params)
    }

    fn reattach(&mut self, reply: ReattachReply) {
        reply.answer(false);
    }

    fn client_exit(&mut self) {}
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{Receiver, RecvTimeoutError};
    use std::thread;
    use std::time::Duration;
    use webshell_common::RpcValue;

    #[derive(Clone, Default)]
    struct MockClient {
        handler: Arc<Mutex<Option<Arc<dyn SessionHandler>>>>,
        posted: Arc<Mutex<Vec<ClientPostMessage>>>,
        stopped: Arc<AtomicBool>,
    }

    impl MockClient {
        fn handler(&self) -> Arc<dyn SessionHandler> {
            self.handler.lock().unwrap().clone().expect("started")
        }
    }

    impl SessionClient for MockClient {
        fn start(&mut self, handler: Arc<dyn SessionHandler>) -> Result<(), SessionError> {
            *self.handler.lock().unwrap() = Some(handler);
            Ok(())
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }

        fn send_post_message(&self, message: ClientPostMessage) -> Result<(), SessionError> {
            self.posted.lock().unwrap().push(message);
            Ok(())
        }

        fn identity(&self) -> SessionInfo {
            SessionInfo {
                session_id: "s-1".into(),
                server_id: "srv".into(),
                session_info: "info".into(),
                server_url: "ws://127.0.0.1:1".into(),
            }
        }
    }

    #[derive(Default)]
    struct Service {
        actions: Vec<String>,
        exits: usize,
        reattach: bool,
    }

    impl OwnerService for Service {
        fn rpc(&mut self, action: &str, params: &RpcParams) -> RpcResult {
            if action == "explode" {
                panic!("owning thread failure");
            }
            self.actions.push(action.to_string());
            match params.get("name").and_then(RpcValue::as_str) {
                Some(name) => RpcResult::fail(format!("no such window named '{name}'")),
                None => RpcResult::ok(),
            }
        }

        fn reattach(&mut self, reply: ReattachReply) {
            reply.answer(self.reattach);
        }

        fn client_exit(&mut self) {
            self.exits += 1;
        }
    }

    fn started_adapter() -> (ProtocolAdapter<MockClient>, MockClient, Receiver<()>) {
        let (wake_tx, wake_rx) = mpsc::channel();
        let wake_tx = Mutex::new(wake_tx);
        let client = MockClient::default();
        let mut adapter = ProtocolAdapter::new(
            client.clone(),
            Arc::new(move || {
                let _ = wake_tx.lock().unwrap().send(());
            }),
        );
        adapter.start().unwrap();
        (adapter, client, wake_rx)
    }

    fn wait_wake(wake_rx: &Receiver<()>) {
        wake_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("owning thread was not woken");
    }

    #[test]
    fn rpc_runs_on_owning_thread() {
        let (mut adapter, client, wake_rx) = started_adapter();
        let handler = client.handler();
        let caller = thread::spawn(move || handler.handle_rpc("minimize", RpcParams::new()));

        wait_wake(&wake_rx);
        let mut service = Service::default();
        assert_eq!(adapter.serve(&mut service), 1);

        let result = caller.join().unwrap();
        assert!(result.is_success());
        assert_eq!(service.actions, vec!["minimize"]);
    }

    #[test]
    fn failed_result_passes_through() {
        let (mut adapter, client, wake_rx) = started_adapter();
        let handler = client.handler();
        let caller = thread::spawn(move || {
            let mut params = RpcParams::new();
            params.insert("name".into(), "ghost".into());
            handler.handle_rpc("close_window", params)
        });

        wait_wake(&wake_rx);
        adapter.serve(&mut Service::default());

        let result = caller.join().unwrap();
        assert_eq!(result.error_message(), Some("no such window named 'ghost'"));
    }

    #[test]
    fn panic_on_owning_thread_becomes_failure() {
        let (mut adapter, client, wake_rx) = started_adapter();
        let handler = client.handler();
        let caller = thread::spawn(move || handler.handle_rpc("explode", RpcParams::new()));

        wait_wake(&wake_rx);
        adapter.serve(&mut Service::default());

        let result = caller.join().unwrap();
        assert!(!result.is_success());
        assert!(result
            .error_message()
            .unwrap()
            .contains("owning thread failure"));
    }

    #[test]
    fn concurrent_callers_are_serialized() {
        let (mut adapter, client, wake_rx) = started_adapter();
        let first = client.handler();
        let second = client.handler();

        let a = thread::spawn(move || first.handle_rpc("minimize", RpcParams::new()));
        wait_wake(&wake_rx);
        let b = thread::spawn(move || second.handle_rpc("toggle_maximize", RpcParams::new()));

        // The second caller waits at the gate; only one request is queued.
        thread::sleep(Duration::from_millis(50));
        assert!(matches!(
            wake_rx.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Timeout)
        ));
        let mut service = Service::default();
        assert_eq!(adapter.serve(&mut service), 1);
        assert!(a.join().unwrap().is_success());

        wait_wake(&wake_rx);
        assert_eq!(adapter.serve(&mut service), 1);
        assert!(b.join().unwrap().is_success());
        assert_eq!(service.actions, vec!["minimize", "toggle_maximize"]);
    }

    #[test]
    fn stop_drains_queued_call() {
        let (mut adapter, client, wake_rx) = started_adapter();
        let handler = client.handler();
        let caller = thread::spawn(move || handler.handle_rpc("minimize", RpcParams::new()));

        wait_wake(&wake_rx);
        let mut service = Service::default();
        adapter.stop(&mut service);

        assert!(caller.join().unwrap().is_success());
        assert_eq!(service.actions, vec!["minimize"]);
        assert!(client.stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn calls_after_stop_fail_fast() {
        let (mut adapter, client, _wake_rx) = started_adapter();
        let handler = client.handler();
        adapter.stop(&mut Service::default());

        let result = handler.handle_rpc("minimize", RpcParams::new());
        assert_eq!(result.error_message(), Some("session adapter stopped"));
        assert!(!handler.should_reattach());
        assert_eq!(
            adapter.send_post_message(ClientPostMessage::new("all_window_closed")),
            Err(SessionError::Stopped)
        );
        assert_eq!(adapter.serve(&mut Service::default()), 0);
    }

    #[test]
    fn stop_answers_pending_reattach_with_no() {
        let (mut adapter, client, wake_rx) = started_adapter();
        let handler = client.handler();
        let caller = thread::spawn(move || handler.should_reattach());

        wait_wake(&wake_rx);
        let mut service = Service {
            reattach: true,
            ..Service::default()
        };
        adapter.stop(&mut service);
        assert!(!caller.join().unwrap());
    }

    #[test]
    fn reattach_answer_comes_from_owner() {
        let (mut adapter, client, wake_rx) = started_adapter();
        let handler = client.handler();
        let caller = thread::spawn(move || handler.should_reattach());

        wait_wake(&wake_rx);
        adapter.serve(&mut Service {
            reattach: true,
            ..Service::default()
        });
        assert!(caller.join().unwrap());
    }

    #[test]
    fn client_exit_reaches_owner() {
        let (mut adapter, client, wake_rx) = started_adapter();
        client.handler().on_client_exit();

        wait_wake(&wake_rx);
        let mut service = Service::default();
        adapter.serve(&mut service);
        assert_eq!(service.exits, 1);
    }

    #[test]
    fn identity_and_posts_delegate_to_client() {
        let (adapter, client, _wake_rx) = started_adapter();
        assert_eq!(adapter.session_id(), "s-1");
        assert_eq!(adapter.server_id(), "srv");
        assert_eq!(adapter.session_info(), "info");
        assert_eq!(adapter.server_url(), "ws://127.0.0.1:1");

        adapter
            .send_post_message(ClientPostMessage::for_window("window_closed", "main"))
            .unwrap();
        assert_eq!(client.posted.lock().unwrap().len(), 1);
    }

    #[test]
    fn start_after_stop_is_rejected() {
        let (mut adapter, _client, _wake_rx) = started_adapter();
        adapter.stop(&mut Service::default());
        assert_eq!(adapter.start(), Err(SessionError::Stopped));
    }
}
