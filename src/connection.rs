//! Connection wiring
//!
//! Splits the socket, starts the writer task and the reader task, and runs
//! the IrcClient actor until the session ends.

use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::client::{ClientEvent, IrcClient};
use crate::config::Config;
use crate::transport;
use crate::types::Outcome;
use crate::view::{Clock, Ui, ViewRegistry};

/// Channel buffer size for client events
pub const EVENT_BUFFER: usize = 256;

/// Run one session over an open stream
///
/// `events_tx` is handed to the reader task; the input context should hold
/// its own clone. The reader is stopped once the session is closed.
pub async fn run<S, U, C>(
    stream: S,
    config: Config,
    views: ViewRegistry<U, C>,
    events_tx: mpsc::Sender<ClientEvent>,
    events_rx: mpsc::Receiver<ClientEvent>,
) -> Outcome
where
    S: AsyncRead + AsyncWrite + Send + 'static,
    U: Ui,
    C: Clock,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let (sender, writer) = transport::spawn_writer(write_half);
    let reader = tokio::spawn(read_loop(read_half, events_tx));

    let client = IrcClient::new(config, views, sender, writer, events_rx);
    let outcome = client.run().await;

    reader.abort();
    debug!("Reader stopped");
    outcome
}

/// Forward inbound frames to the actor until EOF or a read error
async fn read_loop<R>(reader: R, events: mpsc::Sender<ClientEvent>)
where
    R: AsyncRead + Unpin,
{
    let lines = transport::lines(reader);
    tokio::pin!(lines);

    while let Some(item) = lines.next().await {
        let event = match item {
            Ok(line) => {
                debug!("<- {}", line);
                ClientEvent::Inbound(line)
            }
            Err(e) => {
                error!("Read from server failed: {}", e);
                let _ = events.send(ClientEvent::ReadFailed(e.to_string())).await;
                return;
            }
        };
        if events.send(event).await.is_err() {
            debug!("Client closed, ending read task");
            return;
        }
    }

    debug!("Read task reached end of stream");
    let _ = events.send(ClientEvent::PeerClosed).await;
}
