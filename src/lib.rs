//! Terminal IRC Client Library
//!
//! A learning-oriented IRC client built on tokio, connecting to one server
//! over plain TCP and keeping one pane per joined channel.
//!
//! # Features
//! - NICK/USER registration
//! - Joining, leaving and switching between channels
//! - Channel messages and `/raw` protocol passthrough
//! - Automatic PING/PONG keepalive
//! - Status pane for server output and diagnostics
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `IrcClient` is the central actor owning the session and the view registry
//! - A reader task turns socket bytes into `ClientEvent::Inbound`
//! - The input context turns typed lines into `ClientEvent::Input`
//! - A single writer task owns the write half, so outbound lines never interleave
//!
//! # Example
//! ```ignore
//! use tokio::sync::mpsc;
//! use irc_client::{connection, console, transport, Config, ConsoleUi, LocalClock, ViewRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let stream = transport::dial(&config.host, config.port).await.unwrap();
//!     let (events_tx, events_rx) = mpsc::channel(connection::EVENT_BUFFER);
//!
//!     console::spawn_input(events_tx.clone());
//!     let views = ViewRegistry::new(ConsoleUi::new(true), LocalClock);
//!     let outcome = connection::run(stream, config, views, events_tx, events_rx).await;
//!     std::process::exit(outcome.exit_code());
//! }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod router;
pub mod session;
pub mod style;
pub mod transport;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use client::{ClientEvent, IrcClient};
pub use config::Config;
pub use console::ConsoleUi;
pub use error::{AppError, SendError};
pub use message::{Message, Outbound, ParseError};
pub use session::Session;
pub use types::{Outcome, Phase};
pub use view::{Clock, LocalClock, Ui, ViewRegistry, STATUS_PANE};
