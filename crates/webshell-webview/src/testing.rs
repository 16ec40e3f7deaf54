//! In-memory window host for driving the registry without a display.

use std::cell::RefCell;
use std::rc::Rc;

use webshell_common::WindowError;
use webshell_config::WindowOptions;

use crate::surface::{WindowHost, WindowSurface};

/// A surface operation recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    TitleBar(bool),
    ToggleMaximize,
    Minimize,
    DevTools,
    Close,
}

#[derive(Default)]
struct Log {
    opened: Vec<(String, WindowOptions)>,
    calls: Vec<(String, SurfaceCall)>,
    next_id: u64,
    fail_next: bool,
}

/// Host that hands out [`RecordingSurface`]s and keeps a shared call log.
#[derive(Clone, Default)]
pub struct RecordingHost {
    log: Rc<RefCell<Log>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `open` fail with a surface error.
    pub fn fail_next_open(&mut self) {
        self.log.borrow_mut().fail_next = true;
    }

    /// Names of every window opened so far, in order.
    pub fn opened(&self) -> Vec<String> {
        self.log.borrow().opened.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Options the window `name` was last opened with.
    pub fn options_for(&self, name: &str) -> Option<WindowOptions> {
        self.log
            .borrow()
            .opened
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, o)| o.clone())
    }

    /// Every surface call, tagged with the window name.
    pub fn calls(&self) -> Vec<(String, SurfaceCall)> {
        self.log.borrow().calls.clone()
    }
}

impl WindowHost for RecordingHost {
    type Surface = RecordingSurface;

    fn open(&mut self, name: &str, options: &WindowOptions) -> Result<RecordingSurface, WindowError> {
        let mut log = self.log.borrow_mut();
        if log.fail_next {
            log.fail_next = false;
            return Err(WindowError::Surface(format!("refused to open '{name}'")));
        }
        log.next_id += 1;
        log.opened.push((name.to_string(), options.clone()));
        Ok(RecordingSurface {
            name: name.to_string(),
            id: log.next_id,
            log: Rc::clone(&self.log),
        })
    }
}

/// Surface that records every call into its host's log.
pub struct RecordingSurface {
    name: String,
    id: u64,
    log: Rc<RefCell<Log>>,
}

impl RecordingSurface {
    fn record(&self, call: SurfaceCall) {
        self.log.borrow_mut().calls.push((self.name.clone(), call));
    }
}

impl WindowSurface for RecordingSurface {
    fn surface_id(&self) -> u64 {
        self.id
    }

    fn set_title_bar_visible(&mut self, visible: bool) {
        self.record(SurfaceCall::TitleBar(visible));
    }

    fn toggle_maximize(&mut self) {
        self.record(SurfaceCall::ToggleMaximize);
    }

    fn minimize(&mut self) {
        self.record(SurfaceCall::Minimize);
    }

    fn open_dev_tools(&self) {
        self.record(SurfaceCall::DevTools);
    }

    fn close(&mut self) {
        self.record(SurfaceCall::Close);
    }
}
