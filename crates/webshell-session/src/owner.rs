//! Rendezvous between background session threads and the owning thread.
//!
//! Background threads post [`OwnerRequest`]s into an inbox and wake the
//! owning thread. The owning thread drains the inbox with
//! [`OwnerInbox::serve`], answering each request through its reply slot.
//! The owning thread never waits on a background thread.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::sync::Arc;

use tracing::{error, warn};
use webshell_common::{RpcParams, RpcResult, SessionError};

/// Wakes the owning thread after a request is posted.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Work the owning thread must perform for a background caller.
pub enum OwnerRequest {
    Rpc {
        id: String,
        action: String,
        params: RpcParams,
        reply: SyncSender<RpcResult>,
    },
    Reattach {
        reply: ReattachReply,
    },
    ClientExit,
}

/// One-shot answer slot for a reattach question.
///
/// Dropping it unanswered reads as "do not reattach" on the caller side.
pub struct ReattachReply {
    tx: SyncSender<bool>,
}

impl ReattachReply {
    pub(crate) fn new(tx: SyncSender<bool>) -> Self {
        Self { tx }
    }

    pub fn answer(self, reattach: bool) {
        // The caller may have given up already.
        let _ = self.tx.send(reattach);
    }
}

/// Owning-thread side of the operations a session can request.
pub trait OwnerService {
    /// Execute one remote command.
    fn rpc(&mut self, action: &str, params: &RpcParams) -> RpcResult;

    /// Decide whether to reconnect after an unexpected drop.
    ///
    /// The answer may be given later (after a prompt), by keeping `reply`.
    fn reattach(&mut self, reply: ReattachReply);

    /// The session ended for good.
    fn client_exit(&mut self);
}

/// Background-side handle used to post requests.
#[derive(Clone)]
pub struct OwnerHandle {
    tx: Sender<OwnerRequest>,
    waker: Waker,
}

impl OwnerHandle {
    pub fn post(&self, request: OwnerRequest) -> Result<(), SessionError> {
        self.tx
            .send(request)
            .map_err(|_| SessionError::OwnerUnavailable)?;
        (self.waker)();
        Ok(())
    }
}

/// Owning-thread side: the queue of pending requests.
pub struct OwnerInbox {
    rx: Receiver<OwnerRequest>,
}

/// Create a connected handle/inbox pair.
pub fn owner_channel(waker: Waker) -> (OwnerHandle, OwnerInbox) {
    let (tx, rx) = mpsc::channel();
    (OwnerHandle { tx, waker }, OwnerInbox { rx })
}

impl OwnerInbox {
    /// Execute every queued request in delivery order. Returns how many ran.
    pub fn serve<S: OwnerService>(&self, service: &mut S) -> usize {
        let mut served = 0;
        while let Ok(request) = self.rx.try_recv() {
            execute(service, request);
            served += 1;
        }
        served
    }
}

fn execute<S: OwnerService>(service: &mut S, request: OwnerRequest) {
    match request {
        OwnerRequest::Rpc {
            id,
            action,
            params,
            reply,
        } => {
            let outcome = catch_unwind(AssertUnwindSafe(|| service.rpc(&action, &params)));
            let result = match outcome {
                Ok(result) => result,
                Err(panic) => {
                    let detail = panic_message(panic.as_ref());
                    error!(target: "rpc", %id, action = %action, detail = %detail, "rpc panicked");
                    RpcResult::fail(format!("rpc '{action}': internal error: {detail}"))
                }
            };
            if reply.send(result).is_err() {
                warn!(target: "rpc", %id, action = %action, "rpc caller gone before reply");
            }
        }
        OwnerRequest::Reattach { reply } => {
            let outcome = catch_unwind(AssertUnwindSafe(|| service.reattach(reply)));
            if outcome.is_err() {
                // The reply slot was dropped during the unwind: reads as "no".
                error!("reattach prompt panicked");
            }
        }
        OwnerRequest::ClientExit => service.client_exit(),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
