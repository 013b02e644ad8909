//! Line-oriented terminal front end
//!
//! A minimal UI collaborator: every pane shares stdout, each line tagged
//! with its pane name. User input is read from stdin on its own thread.

use std::io::{self, BufRead, Write};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::client::ClientEvent;
use crate::style::{paint, strip, to_ansi, Color};
use crate::view::{Ui, STATUS_PANE};

/// Width of the pane tag column
const TAG_WIDTH: usize = 12;

/// Prints panes to stdout
#[derive(Debug)]
pub struct ConsoleUi {
    focused: String,
    color: bool,
}

impl ConsoleUi {
    /// Create a console UI; `color` selects ANSI output over plain text
    pub fn new(color: bool) -> Self {
        Self {
            focused: STATUS_PANE.to_string(),
            color,
        }
    }

    /// Format one pane line for the terminal
    ///
    /// Lines for the focused pane start with `>`.
    pub fn render(&self, pane: &str, styled: &str) -> String {
        let marker = if pane == self.focused { '>' } else { ' ' };
        let width = TAG_WIDTH;
        let line = format!("{marker}{pane:>width$} {styled}");
        if self.color {
            to_ansi(&line)
        } else {
            strip(&line)
        }
    }

    fn print(&self, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!("Failed to write to stdout: {}", e);
        }
    }
}

impl Ui for ConsoleUi {
    fn pane_create(&mut self, name: &str) {
        debug!("Pane {} created", name);
    }

    fn pane_destroy(&mut self, name: &str) {
        debug!("Pane {} destroyed", name);
    }

    fn pane_focus(&mut self, name: &str) {
        if self.focused == name {
            return;
        }
        self.focused = name.to_string();
        let notice = paint(Color::Blue, &format!("now viewing {name}"));
        self.print(&self.render(name, &notice));
    }

    fn pane_append(&mut self, name: &str, styled: &str) {
        self.print(&self.render(name, styled));
    }
}

/// Read stdin lines on a dedicated thread and feed them to the actor
///
/// Stops when the actor is gone; end of input sends `InputClosed`.
pub fn spawn_input(events: mpsc::Sender<ClientEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if events.blocking_send(ClientEvent::Input(line)).is_err() {
                        debug!("Client closed, ending input thread");
                        return;
                    }
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        let _ = events.blocking_send(ClientEvent::InputClosed);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let ui = ConsoleUi::new(false);
        let line = ui.render("#foo", "[blue]alice[-]: hi");
        assert_eq!(line, "         #foo alice: hi");
    }

    #[test]
    fn test_render_marks_focused_pane() {
        let ui = ConsoleUi::new(false);
        assert!(ui.render(STATUS_PANE, "x").starts_with('>'));
    }

    #[test]
    fn test_render_ansi() {
        let ui = ConsoleUi::new(true);
        let line = ui.render("#foo", "[red]error:[-] nope");
        assert!(line.contains("\x1b[31merror:\x1b[0m nope"));
    }

    #[test]
    fn test_focus_tracks_pane() {
        let mut ui = ConsoleUi::new(false);
        ui.pane_focus("#foo");
        assert!(ui.render("#foo", "x").starts_with('>'));
        assert!(ui.render(STATUS_PANE, "x").starts_with(' '));
    }
}
