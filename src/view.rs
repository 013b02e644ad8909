//! View registry
//!
//! Maps channel names to panes of the UI collaborator and stamps every
//! rendered line with the clock. The status pane `*` always exists.

use tracing::debug;

use crate::error::AppError;
use crate::style::{escape, paint, Color};

/// Name of the status pane
pub const STATUS_PANE: &str = "*";

/// `DD-MM-YYYY HH:MM:SS`
const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// The four calls the core makes into the terminal UI
///
/// `pane_append` must not block on rendering.
pub trait Ui: Send {
    fn pane_create(&mut self, name: &str);
    fn pane_destroy(&mut self, name: &str);
    fn pane_focus(&mut self, name: &str);
    fn pane_append(&mut self, name: &str, styled: &str);
}

/// Source of display timestamps
pub trait Clock: Send {
    fn now(&self) -> String;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> String {
        chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Kind of locally generated line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Neutral information
    Info,
    /// Entering a channel
    Join,
    /// Leaving a channel
    Part,
    /// Something the user asked for could not be done
    Error,
}

impl Feedback {
    fn prefix(self) -> String {
        match self {
            Feedback::Info => paint(Color::White, "--"),
            Feedback::Join => paint(Color::Green, "-->"),
            Feedback::Part => paint(Color::Yellow, "<--"),
            Feedback::Error => paint(Color::Red, "error:"),
        }
    }
}

/// Channel name → pane bookkeeping on top of a `Ui`
pub struct ViewRegistry<U, C> {
    ui: U,
    clock: C,
    /// Channel panes in creation order, status pane excluded
    panes: Vec<String>,
    focused: String,
}

impl<U: Ui, C: Clock> ViewRegistry<U, C> {
    /// Create the registry and the status pane, focused
    pub fn new(mut ui: U, clock: C) -> Self {
        ui.pane_create(STATUS_PANE);
        ui.pane_focus(STATUS_PANE);
        Self {
            ui,
            clock,
            panes: Vec::new(),
            focused: STATUS_PANE.to_string(),
        }
    }

    /// Registered name of a pane, ignoring ASCII case
    fn resolve(&self, name: &str) -> Option<&str> {
        if name == STATUS_PANE {
            return Some(STATUS_PANE);
        }
        self.panes
            .iter()
            .find(|p| p.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Whether a pane with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Currently focused pane
    pub fn focused(&self) -> &str {
        &self.focused
    }

    /// Create a pane; creating an existing one is a no-op
    pub fn create(&mut self, name: &str) -> Result<(), AppError> {
        if name == STATUS_PANE {
            return Err(AppError::ReservedPane);
        }
        if self.contains(name) {
            return Ok(());
        }
        debug!("Creating pane {}", name);
        self.ui.pane_create(name);
        self.panes.push(name.to_string());
        Ok(())
    }

    /// Destroy a pane, moving focus to the status pane if it had it
    pub fn destroy(&mut self, name: &str) -> Result<(), AppError> {
        if name == STATUS_PANE {
            return Err(AppError::ReservedPane);
        }
        let Some(index) = self.panes.iter().position(|p| p.eq_ignore_ascii_case(name)) else {
            return Err(AppError::UnknownChannel(name.to_string()));
        };
        let removed = self.panes.remove(index);
        debug!("Destroying pane {}", removed);
        self.ui.pane_destroy(&removed);
        if self.focused == removed {
            self.focus_status();
        }
        Ok(())
    }

    /// Give a pane the focus
    pub fn focus(&mut self, name: &str) -> Result<(), AppError> {
        let resolved = self
            .resolve(name)
            .ok_or_else(|| AppError::UnknownChannel(name.to_string()))?
            .to_string();
        self.ui.pane_focus(&resolved);
        self.focused = resolved;
        Ok(())
    }

    pub fn focus_status(&mut self) {
        self.ui.pane_focus(STATUS_PANE);
        self.focused = STATUS_PANE.to_string();
    }

    /// Append a timestamped line
    ///
    /// Lines for an unknown pane go to the status pane.
    pub fn append(&mut self, name: &str, body: &str) {
        let line = format!("{} | {}", self.clock.now(), body);
        let pane = self.resolve(name).unwrap_or(STATUS_PANE).to_string();
        self.ui.pane_append(&pane, &line);
    }

    /// Append unstyled text to the status pane, markers shown as typed
    pub fn status(&mut self, text: &str) {
        self.append(STATUS_PANE, &escape(text));
    }

    /// Append a prefix-coloured local line; `text` itself is not styled
    pub fn feedback(&mut self, name: &str, kind: Feedback, text: &str) {
        let body = format!("{} {}", kind.prefix(), escape(text));
        self.append(name, &body);
    }

    /// Report a user-facing error in the focused pane
    pub fn error(&mut self, err: &AppError) {
        let pane = self.focused.clone();
        self.feedback(&pane, Feedback::Error, &err.to_string());
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory UI and fixed clock for tests

    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use super::{Clock, Ui};
    use crate::style::strip;

    pub const FIXED_TIME: &str = "19-10-2026 12:00:00";

    #[derive(Debug, Default)]
    struct Panes {
        lines: BTreeMap<String, Vec<String>>,
        focused: Option<String>,
        orphans: Vec<String>,
    }

    /// Records pane contents as plain text; clones share state
    #[derive(Debug, Clone, Default)]
    pub struct MemoryUi {
        inner: Arc<Mutex<Panes>>,
    }

    impl MemoryUi {
        pub fn lines(&self, pane: &str) -> Vec<String> {
            let inner = self.inner.lock().unwrap();
            inner.lines.get(pane).cloned().unwrap_or_default()
        }

        pub fn has_pane(&self, pane: &str) -> bool {
            self.inner.lock().unwrap().lines.contains_key(pane)
        }

        pub fn focused(&self) -> Option<String> {
            self.inner.lock().unwrap().focused.clone()
        }

        /// Lines appended to panes that did not exist
        pub fn orphans(&self) -> Vec<String> {
            self.inner.lock().unwrap().orphans.clone()
        }

        pub fn contains(&self, pane: &str, needle: &str) -> bool {
            self.lines(pane).iter().any(|l| l.contains(needle))
        }
    }

    impl Ui for MemoryUi {
        fn pane_create(&mut self, name: &str) {
            let mut inner = self.inner.lock().unwrap();
            inner.lines.entry(name.to_string()).or_default();
        }

        fn pane_destroy(&mut self, name: &str) {
            self.inner.lock().unwrap().lines.remove(name);
        }

        fn pane_focus(&mut self, name: &str) {
            self.inner.lock().unwrap().focused = Some(name.to_string());
        }

        fn pane_append(&mut self, name: &str, styled: &str) {
            let mut guard = self.inner.lock().unwrap();
            let inner = &mut *guard;
            let text = strip(styled);
            match inner.lines.get_mut(name) {
                Some(lines) => lines.push(text),
                None => inner.orphans.push(text),
            }
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> String {
            FIXED_TIME.to_string()
        }
    }
}
