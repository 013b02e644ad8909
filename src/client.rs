//! IrcClient actor implementation
//!
//! The single owner of the session and the view registry. The reader task
//! and the input context both feed it `ClientEvent`s through one mpsc
//! channel, so every state change happens on one task, one event at a time.

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::dispatcher::dispatch;
use crate::error::AppError;
use crate::message::Outbound;
use crate::router::route;
use crate::session::Session;
use crate::transport::LineSender;
use crate::types::{Outcome, Phase};
use crate::view::{Clock, Feedback, Ui, ViewRegistry, STATUS_PANE};

type WriterHandle = JoinHandle<Result<(), AppError>>;

/// Events sent to the IrcClient actor
#[derive(Debug)]
pub enum ClientEvent {
    /// One line typed by the user
    Input(String),
    /// The input source reached end of file
    InputClosed,
    /// One framed line from the server
    Inbound(String),
    /// Reading from the socket failed
    ReadFailed(String),
    /// The server closed the connection
    PeerClosed,
}

/// The IrcClient actor
///
/// Holds the session, the view registry and the outbound queue, and
/// processes events until the session is closed.
pub struct IrcClient<U, C> {
    config: Config,
    session: Session,
    views: ViewRegistry<U, C>,
    /// Outbound queue; dropped to close the transport
    sender: Option<LineSender>,
    /// Writer task, resolves once the queue is drained or a write fails
    writer: Option<WriterHandle>,
    /// Event receiver channel
    receiver: mpsc::Receiver<ClientEvent>,
}

impl<U: Ui, C: Clock> IrcClient<U, C> {
    /// Create a client for an already opened transport
    pub fn new(
        config: Config,
        views: ViewRegistry<U, C>,
        sender: LineSender,
        writer: WriterHandle,
        receiver: mpsc::Receiver<ClientEvent>,
    ) -> Self {
        Self {
            config,
            session: Session::new(),
            views,
            sender: Some(sender),
            writer: Some(writer),
            receiver,
        }
    }

    /// Run the IrcClient event loop
    ///
    /// Registers, then processes events until the user quits, the server
    /// hangs up or the connection fails. Returns how the session ended.
    pub async fn run(mut self) -> Outcome {
        info!("IrcClient started");

        self.views.feedback(
            STATUS_PANE,
            Feedback::Info,
            &format!(
                "Registering as {} on {}",
                self.config.nickname,
                self.config.addr()
            ),
        );
        let registration: Vec<Outbound> = self
            .session
            .opened(&self.config)
            .into_iter()
            .map(Outbound::from)
            .collect();
        let mut outcome = self.send_all(registration).await;

        while outcome.is_none() {
            tokio::select! {
                event = self.receiver.recv() => {
                    let Some(event) = event else {
                        debug!("All event senders dropped");
                        outcome = Some(Outcome::Disconnected);
                        break;
                    };
                    outcome = self.handle_event(event).await;
                }
                result = writer_stopped(&mut self.writer) => {
                    self.writer = None;
                    outcome = Some(self.writer_failed(result));
                }
            }
        }

        self.shutdown(outcome.unwrap_or(Outcome::Disconnected)).await
    }

    /// Process a single event
    ///
    /// Returns the outcome once the event ends the session.
    async fn handle_event(&mut self, event: ClientEvent) -> Option<Outcome> {
        match event {
            ClientEvent::Input(line) => self.handle_input(&line).await,
            ClientEvent::InputClosed => {
                info!("Input closed, quitting");
                self.handle_input("/quit").await
            }
            ClientEvent::Inbound(line) => self.handle_inbound(&line).await,
            ClientEvent::ReadFailed(reason) => Some(self.connection_lost(&reason)),
            ClientEvent::PeerClosed => {
                info!("Server closed the connection");
                self.views.feedback(
                    STATUS_PANE,
                    Feedback::Part,
                    &format!("disconnected from {}", self.config.addr()),
                );
                Some(Outcome::Disconnected)
            }
        }
    }

    /// Handle one line of user input
    async fn handle_input(&mut self, line: &str) -> Option<Outcome> {
        let frames = dispatch(&mut self.session, &mut self.views, line);
        if let Some(outcome) = self.send_all(frames).await {
            return Some(outcome);
        }
        (self.session.phase() == Phase::Closing).then_some(Outcome::Quit)
    }

    /// Handle one line from the server
    async fn handle_inbound(&mut self, line: &str) -> Option<Outcome> {
        match route(&mut self.session, &mut self.views, &self.config, line) {
            Ok(frames) => self.send_all(frames).await,
            Err(AppError::NickInUse(_)) => Some(Outcome::NickInUse),
            Err(err) => {
                error!("Inbound handling failed: {}", err);
                self.session.close();
                Some(Outcome::ConnectionLost)
            }
        }
    }

    /// Queue frames in order
    ///
    /// A closed queue means the writer hit an IO error; the session closes.
    async fn send_all(&mut self, frames: Vec<Outbound>) -> Option<Outcome> {
        let sender = self.sender.as_ref()?;
        for frame in frames {
            let line = frame.to_string();
            if let Err(e) = sender.send(&line).await {
                error!("Failed to queue {:?}: {}", line, e);
                return Some(self.connection_lost("write to server failed"));
            }
        }
        None
    }

    /// The writer ended while the session was still running
    fn writer_failed(&mut self, result: Result<Result<(), AppError>, JoinError>) -> Outcome {
        let reason = match result {
            Ok(Err(e)) => e.to_string(),
            Ok(Ok(())) => "writer stopped".to_string(),
            Err(e) => e.to_string(),
        };
        self.connection_lost(&reason)
    }

    /// Report a failed socket and start closing
    fn connection_lost(&mut self, reason: &str) -> Outcome {
        error!("Connection lost: {}", reason);
        self.views.feedback(
            STATUS_PANE,
            Feedback::Error,
            &format!("connection lost: {reason}"),
        );
        self.session.close();
        Outcome::ConnectionLost
    }

    /// Close the transport, wait for the drain, release everything
    async fn shutdown(mut self, outcome: Outcome) -> Outcome {
        // A peer hang-up goes straight to Closed
        if outcome != Outcome::Disconnected && self.session.close() {
            debug!("Closing after {:?}", outcome);
        }

        // Dropping the last sender lets the writer drain and shut down
        drop(self.sender.take());

        let mut outcome = outcome;
        if let Some(writer) = self.writer.take() {
            match writer.await {
                Ok(Ok(())) => debug!("Outbound queue drained"),
                Ok(Err(e)) => {
                    warn!("Writer ended with error: {}", e);
                    if outcome == Outcome::Quit {
                        outcome = Outcome::ConnectionLost;
                    }
                }
                Err(e) => error!("Writer task failed: {}", e),
            }
        }

        self.session.closed();
        info!("IrcClient finished: {:?}", outcome);
        outcome
    }
}

/// Resolves when the writer task ends; never, once it has been reaped
async fn writer_stopped(
    writer: &mut Option<WriterHandle>,
) -> Result<Result<(), AppError>, JoinError> {
    match writer {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}
