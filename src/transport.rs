//! Line transport
//!
//! Owns the socket halves and the `\r\n` framing. Outbound lines go through
//! a single writer task so concurrent senders never interleave bytes;
//! inbound bytes come out as a lazy stream of frames.

use std::io;

use futures_util::stream::{self, Stream};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::{AppError, SendError};

/// Maximum frame length on the wire, including `\r\n`
pub const MAX_LINE: usize = 512;

/// Maximum frame body, excluding `\r\n`
const MAX_BODY: usize = MAX_LINE - 2;

/// Outbound queue depth
const OUTBOUND_BUFFER: usize = 64;

/// Open the TCP connection to the server
pub async fn dial(host: &str, port: u16) -> Result<TcpStream, AppError> {
    let addr = format!("{host}:{port}");
    let result = TcpStream::connect(&addr).await;
    match result {
        Ok(stream) => {
            debug!("Connected to {}", addr);
            Ok(stream)
        }
        Err(source) => Err(AppError::Dial { addr, source }),
    }
}

/// Frame one outbound line
///
/// Anything from the first CR or LF on is dropped, the body is capped at
/// 510 bytes on a char boundary, and exactly one `\r\n` is appended.
pub fn frame(line: &str) -> String {
    let body = line.split(['\r', '\n']).next().unwrap_or_default();
    format!("{}\r\n", truncate(body, MAX_BODY))
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Handle for queueing outbound lines
///
/// Cheap to clone. Once every handle is dropped the writer task drains
/// what is queued and shuts the write half down.
#[derive(Debug, Clone)]
pub struct LineSender {
    tx: mpsc::Sender<String>,
}

impl LineSender {
    /// Queue one line; `\r\n` is appended here
    ///
    /// Returns an error if the writer task has stopped.
    pub async fn send(&self, line: &str) -> Result<(), SendError> {
        self.tx
            .send(frame(line))
            .await
            .map_err(|_| SendError::ChannelClosed)
    }
}

/// Spawn the single writer task for `writer`
///
/// The returned handle resolves once the queue is drained and the write
/// half is shut down, or with the first write error.
pub fn spawn_writer<W>(writer: W) -> (LineSender, JoinHandle<Result<(), AppError>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);
    let task = tokio::spawn(write_loop(writer, rx));
    (LineSender { tx }, task)
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::Receiver<String>) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = rx.recv().await {
        let written = match writer.write_all(frame.as_bytes()).await {
            Ok(()) => writer.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            error!("Write to server failed: {}", e);
            return Err(AppError::Io(e));
        }
        debug!("-> {}", frame.trim_end());
    }

    if let Err(e) = writer.shutdown().await {
        debug!("Shutdown of write half failed: {}", e);
    }
    debug!("Writer drained");
    Ok(())
}

/// Turn the read half into a stream of frames
///
/// Frames are split on `\n` with a trailing `\r` removed; empty frames are
/// skipped. At most 512 bytes of a frame are buffered, the rest of an
/// oversized frame is discarded. The stream ends at EOF, or after yielding
/// the first read error.
pub fn lines<R>(reader: R) -> impl Stream<Item = Result<String, AppError>>
where
    R: AsyncRead + Unpin,
{
    stream::unfold(Some(BufReader::new(reader)), |state| async move {
        let Some(mut reader) = state else {
            return None;
        };
        loop {
            let mut buf = Vec::new();
            let read = (&mut reader)
                .take(MAX_LINE as u64)
                .read_until(b'\n', &mut buf)
                .await;
            match read {
                Ok(0) => return None,
                Ok(n) => {
                    if n == MAX_LINE && buf.last() != Some(&b'\n') {
                        if let Err(e) = skip_line(&mut reader).await {
                            return Some((Err(AppError::Io(e)), None));
                        }
                    }
                    if let Some(line) = decode_frame(buf) {
                        return Some((Ok(line), Some(reader)));
                    }
                }
                Err(e) => return Some((Err(AppError::Io(e)), None)),
            }
        }
    })
}

/// Discard input up to and including the next `\n`
async fn skip_line<R>(reader: &mut BufReader<R>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    loop {
        let (newline, available) = {
            let buf = reader.fill_buf().await?;
            (buf.iter().position(|&b| b == b'\n'), buf.len())
        };
        match newline {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None if available == 0 => return Ok(()),
            None => reader.consume(available),
        }
    }
}

fn decode_frame(mut buf: Vec<u8>) -> Option<String> {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    if buf.len() > MAX_BODY {
        warn!("Inbound line exceeds {} bytes, truncating", MAX_LINE);
        buf.truncate(MAX_BODY);
    }
    if buf.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(&buf).into_owned())
}
