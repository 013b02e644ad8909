//! Error types for the IRC client
//!
//! Defines application-level errors and outbound queue errors.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::message::ParseError;

/// Application-level errors
///
/// Covers both fatal errors (the session ends) and user errors
/// (rendered as a red line in the current pane, session continues).
#[derive(Debug, Error)]
pub enum AppError {
    /// The initial TCP dial failed (fatal)
    #[error("failed to connect to {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error on the established socket (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A received line could not be parsed
    #[error("protocol error: {0}")]
    Protocol(#[from] ParseError),

    /// Configuration file could not be read or decoded
    #[error("failed to load config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration values are unusable
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Server rejected the nickname during registration (433)
    #[error("nickname {0} is already in use")]
    NickInUse(String),

    /// Command needs a registered connection
    #[error("not registered with the server yet")]
    NotRegistered,

    /// No channel is currently selected
    #[error("you are not in a channel, use /join <channel>")]
    NotInChannel,

    /// Channel already in the joined set
    #[error("already joined {0}")]
    AlreadyJoined(String),

    /// Channel is not in the joined set
    #[error("not joined to {0}")]
    UnknownChannel(String),

    /// Slash command missing its argument
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Slash command not recognised
    #[error("unknown command {0}")]
    UnknownCommand(String),

    /// The status pane cannot be used as a channel
    #[error("the status pane is reserved")]
    ReservedPane,
}

/// Outbound queue errors
///
/// Occurs when attempting to send a line after the writer has stopped.
#[derive(Debug, Error)]
pub enum SendError {
    /// The writer task has ended and dropped its receiver
    #[error("Channel closed")]
    ChannelClosed,
}
