//! WebSocket session client: connects to the orchestrator, serves its
//! commands and reconnects when the user agrees to reattach.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use webshell_common::{ClientPostMessage, RpcResult, SessionError, SessionInfo};

use crate::client::SessionClient;
use crate::handler::SessionHandler;
use crate::wire::{ClientFrame, ServerFrame};

const HELLO_TIMEOUT: Duration = Duration::from_secs(10);
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// [`SessionClient`] speaking JSON frames over a WebSocket.
///
/// Owns a small tokio runtime; all I/O happens there. Handler callbacks
/// that block (`handle_rpc`, `should_reattach`) run on the runtime's
/// blocking pool, one at a time.
pub struct WsSessionClient {
    url: String,
    identity: Arc<OnceLock<SessionInfo>>,
    runtime: Option<Runtime>,
    task: Option<JoinHandle<()>>,
    outbound_tx: Option<mpsc::UnboundedSender<ClientFrame>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl WsSessionClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            identity: Arc::new(OnceLock::new()),
            runtime: None,
            task: None,
            outbound_tx: None,
            shutdown_tx: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SessionClient for WsSessionClient {
    fn start(&mut self, handler: Arc<dyn SessionHandler>) -> Result<(), SessionError> {
        if self.task.is_some() {
            return Err(SessionError::Transport("session client already started".into()));
        }

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("webshell-session")
            .enable_all()
            .build()
            .map_err(|e| SessionError::Connect(format!("failed to create runtime: {e}")))?;

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let config = ConnectionConfig {
            url: self.url.clone(),
            identity: Arc::clone(&self.identity),
        };

        let task = rt.spawn(async move {
            run_session_client(config, handler, outbound_rx, shutdown_rx).await;
        });

        tracing::info!(url = %self.url, "Session client started");
        self.runtime = Some(rt);
        self.task = Some(task);
        self.outbound_tx = Some(outbound_tx);
        self.shutdown_tx = Some(shutdown_tx);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
        self.outbound_tx = None;

        let Some(rt) = self.runtime.take() else {
            return;
        };
        if let Some(task) = self.task.take() {
            let joined = rt.block_on(async { tokio::time::timeout(STOP_TIMEOUT, task).await });
            if joined.is_err() {
                tracing::warn!("Session loop did not stop in time");
            }
        }
        rt.shutdown_timeout(STOP_TIMEOUT);
        tracing::info!("Session client stopped");
    }

    fn send_post_message(&self, message: ClientPostMessage) -> Result<(), SessionError> {
        let tx = self
            .outbound_tx
            .as_ref()
            .ok_or_else(|| SessionError::Transport("session client not running".into()))?;
        tx.send(ClientFrame::post(message))
            .map_err(|_| SessionError::Transport("session loop has ended".into()))
    }

    fn identity(&self) -> SessionInfo {
        self.identity.get().cloned().unwrap_or_default()
    }
}

impl Drop for WsSessionClient {
    fn drop(&mut self) {
        self.stop();
    }
}

struct ConnectionConfig {
    url: String,
    identity: Arc<OnceLock<SessionInfo>>,
}

enum ConnectionOutcome {
    /// Local shutdown requested.
    Shutdown,
    /// The peer ended the session.
    Ended(String),
    /// The connection failed or dropped. `attached` is set when the
    /// handshake had completed.
    Dropped { error: SessionError, attached: bool },
}

/// Run the session with reattach-on-drop.
///
/// A failure before the first handshake ends the session. After that, an
/// unexpected drop asks the handler whether to reattach; once it agrees,
/// connecting is retried with exponential backoff until it succeeds.
async fn run_session_client(
    config: ConnectionConfig,
    handler: Arc<dyn SessionHandler>,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientFrame>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut backoff = INITIAL_BACKOFF;
    let mut ever_attached = false;

    loop {
        handler.on_info("session/connect", &format!("connecting to {}", config.url));

        let outcome = match connect_async(config.url.as_str()).await {
            Ok((ws, _)) => {
                serve_connection(ws, &config, &handler, &mut outbound_rx, &mut shutdown_rx).await
            }
            Err(e) => ConnectionOutcome::Dropped {
                error: SessionError::Connect(e.to_string()),
                attached: false,
            },
        };

        match outcome {
            ConnectionOutcome::Shutdown => {
                tracing::info!("Session client shutting down");
                return;
            }
            ConnectionOutcome::Ended(reason) => {
                handler.on_info("session/bye", &reason);
                handler.on_client_exit();
                return;
            }
            ConnectionOutcome::Dropped { error, attached } => {
                handler.on_error("session/transport", &error.to_string());

                if attached {
                    ever_attached = true;
                    backoff = INITIAL_BACKOFF;
                    if !ask_reattach(&handler).await {
                        handler.on_client_exit();
                        return;
                    }
                } else if !ever_attached {
                    handler.on_client_exit();
                    return;
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = shutdown_rx.recv() => return,
        }

        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}

async fn ask_reattach(handler: &Arc<dyn SessionHandler>) -> bool {
    let h = Arc::clone(handler);
    tokio::task::spawn_blocking(move || h.should_reattach())
        .await
        .unwrap_or(false)
}

/// Handle a single connection: handshake, then serve frames until it ends.
async fn serve_connection(
    ws: WsStream,
    config: &ConnectionConfig,
    handler: &Arc<dyn SessionHandler>,
    outbound_rx: &mut mpsc::UnboundedReceiver<ClientFrame>,
    shutdown_rx: &mut mpsc::Receiver<()>,
) -> ConnectionOutcome {
    let (mut sink, mut stream) = ws.split();

    // 1. Wait for hello
    let hello = tokio::select! {
        hello = tokio::time::timeout(HELLO_TIMEOUT, read_server_frame(&mut stream)) => hello,
        _ = shutdown_rx.recv() => {
            let _ = sink.close().await;
            return ConnectionOutcome::Shutdown;
        }
    };
    let handshake_failed = |reason: String| ConnectionOutcome::Dropped {
        error: SessionError::Handshake(reason),
        attached: false,
    };
    match hello {
        Ok(Some(ServerFrame::Hello {
            session_id,
            server_id,
            session_info,
        })) => {
            let info = SessionInfo {
                session_id,
                server_id,
                session_info,
                server_url: config.url.clone(),
            };
            let recorded = config.identity.get_or_init(|| info.clone());
            if recorded.session_id != info.session_id {
                handler.on_info(
                    "session/hello",
                    &format!(
                        "peer announced session '{}', keeping '{}'",
                        info.session_id, recorded.session_id
                    ),
                );
            }
            handler.on_info(
                "session/hello",
                &format!("attached to session '{}' on '{}'", info.session_id, info.server_id),
            );
        }
        Ok(Some(ServerFrame::Error { message })) => return handshake_failed(message),
        Ok(Some(other)) => return handshake_failed(format!("expected hello, got {other:?}")),
        Ok(None) => return handshake_failed("connection closed before hello".into()),
        Err(_) => return handshake_failed(format!("no hello within {}s", HELLO_TIMEOUT.as_secs())),
    }

    let dropped = |reason: String| ConnectionOutcome::Dropped {
        error: SessionError::Transport(reason),
        attached: true,
    };

    // 2. Serve loop
    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match ServerFrame::parse(&text) {
                        Ok(ServerFrame::Rpc { id, action, params }) => {
                            let h = Arc::clone(handler);
                            let label = action.clone();
                            let result = tokio::task::spawn_blocking(move || h.handle_rpc(&action, params))
                                .await
                                .unwrap_or_else(|e| {
                                    RpcResult::fail(format!("rpc '{label}': handler failed: {e}"))
                                });
                            let reply = match ClientFrame::rpc_result(id, &result).to_json() {
                                Ok(json) => json,
                                Err(e) => {
                                    handler.on_error("session/encode", &e.to_string());
                                    continue;
                                }
                            };
                            if sink.send(Message::Text(reply.into())).await.is_err() {
                                return dropped("failed to send rpc result".into());
                            }
                        }
                        Ok(ServerFrame::Bye { reason }) => {
                            let _ = sink.close().await;
                            return ConnectionOutcome::Ended(
                                reason.unwrap_or_else(|| "peer ended the session".into()),
                            );
                        }
                        Ok(ServerFrame::Error { message }) => {
                            handler.on_error("session/peer", &message);
                        }
                        Ok(ServerFrame::Hello { .. }) => {
                            handler.on_info("session/frame", "duplicate hello ignored");
                        }
                        Err(e) => {
                            handler.on_error("session/frame", &format!("bad frame: {e}"));
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return dropped("peer closed connection".into());
                    }
                    Some(Err(e)) => {
                        return dropped(format!("ws error: {e}"));
                    }
                    _ => {}
                }
            }

            out = outbound_rx.recv() => {
                let Some(frame) = out else {
                    // Every sender is gone: the client is stopping.
                    let _ = sink.close().await;
                    return ConnectionOutcome::Shutdown;
                };
                match frame.to_json() {
                    Ok(json) => {
                        if sink.send(Message::Text(json.into())).await.is_err() {
                            return dropped("failed to send post message".into());
                        }
                    }
                    Err(e) => handler.on_error("session/encode", &e.to_string()),
                }
            }

            _ = shutdown_rx.recv() => {
                let _ = sink.close().await;
                return ConnectionOutcome::Shutdown;
            }
        }
    }
}

/// Read text frames until one parses, answering pings on the way.
///
/// `None` when the stream ends or errors.
async fn read_server_frame(
    stream: &mut futures_util::stream::SplitStream<WsStream>,
) -> Option<ServerFrame> {
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => match ServerFrame::parse(&text) {
                Ok(frame) => return Some(frame),
                Err(e) => tracing::debug!(error = %e, "Ignoring unparsable frame before hello"),
            },
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return None,
            Some(Ok(_)) => {}
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
