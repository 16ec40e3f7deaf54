use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::{PageLoadState, SurfaceEvent};

use super::WebViewManager;

type EventSink = Arc<Mutex<Vec<SurfaceEvent>>>;

/// Queue an event, recovering the sink if a handler panicked while holding it.
pub(crate) fn push_event(events: &EventSink, event: SurfaceEvent) {
    match events.lock() {
        Ok(mut evts) => evts.push(event),
        Err(poisoned) => poisoned.into_inner().push(event),
    }
}

/// Whether an IPC body is worth forwarding: a JSON object.
pub fn is_valid_ipc_body(body: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(body),
        Ok(serde_json::Value::Object(_))
    )
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

impl WebViewManager {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: EventSink,
        sid: u64,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();

            if !is_valid_ipc_body(&body) {
                warn!(
                    surface_id = sid,
                    body_len = body.len(),
                    "IPC message rejected: not a JSON object"
                );
                return;
            }

            debug!(surface_id = sid, body_len = body.len(), "IPC message from JS");
            push_event(&events, SurfaceEvent::IpcMessage { surface_id: sid, body });
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: EventSink,
        sid: u64,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(surface_id = sid, ?state, url = %url, "page load");
            push_event(
                &events,
                SurfaceEvent::PageLoad {
                    surface_id: sid,
                    state,
                    url,
                },
            );
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_json_objects() {
        assert!(is_valid_ipc_body(r#"{"kind":"reattach_answer","payload":true}"#));
        assert!(is_valid_ipc_body("{}"));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(!is_valid_ipc_body(""));
        assert!(!is_valid_ipc_body("not json"));
        assert!(!is_valid_ipc_body("[1,2,3]"));
        assert!(!is_valid_ipc_body("\"text\""));
    }

    #[test]
    fn push_survives_poisoned_sink() {
        let sink: EventSink = Arc::new(Mutex::new(Vec::new()));
        let clone = Arc::clone(&sink);
        let _ = std::thread::spawn(move || {
            let _guard = clone.lock().unwrap();
            panic!("poison");
        })
        .join();

        push_event(&sink, SurfaceEvent::Ready { surface_id: 1 });
        let len = match sink.lock() {
            Ok(g) => g.len(),
            Err(p) => p.into_inner().len(),
        };
        assert_eq!(len, 1);
    }
}
