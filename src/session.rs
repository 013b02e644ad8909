//! Session state machine
//!
//! Tracks the lifecycle of the one server connection, the confirmed
//! nickname, the joined channels and the current channel selection.

use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::message::Message;
use crate::types::Phase;

/// State of one connection
///
/// `current` is always either `None` or one of `channels`.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    nickname: Option<String>,
    /// Joined channels in join order
    channels: Vec<String>,
    current: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session in the Dial phase with no channels
    pub fn new() -> Self {
        Self {
            phase: Phase::Dial,
            nickname: None,
            channels: Vec::new(),
            current: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Nickname confirmed by the server, once Ready
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn current_channel(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Look up a joined channel, ignoring ASCII case
    ///
    /// Returns the spelling used when the channel was joined.
    pub fn find_channel(&self, name: &str) -> Option<&str> {
        self.channels
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Transport is open: start registration
    ///
    /// Returns the NICK and USER messages to send, or nothing if the session
    /// has already left the Dial phase.
    pub fn opened(&mut self, config: &Config) -> Vec<Message> {
        if self.phase != Phase::Dial {
            return Vec::new();
        }
        self.set_phase(Phase::Registering);
        vec![
            Message::nick(&config.nickname),
            Message::user(&config.user, &config.realname),
        ]
    }

    /// Server sent 001
    ///
    /// Returns true if this moved the session to Ready.
    pub fn registered(&mut self, nickname: &str) -> bool {
        if self.phase != Phase::Registering {
            return false;
        }
        self.nickname = Some(nickname.to_string());
        self.set_phase(Phase::Ready);
        true
    }

    /// Begin shutting down
    ///
    /// Returns true if this moved an active session to Closing.
    pub fn close(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        self.set_phase(Phase::Closing);
        true
    }

    /// Transport fully released
    pub fn closed(&mut self) {
        if self.phase != Phase::Closed {
            self.set_phase(Phase::Closed);
        }
    }

    /// Add `channel` to the joined set and select it
    pub fn join(&mut self, channel: &str) -> Result<(), AppError> {
        self.require_ready()?;
        if let Some(existing) = self.find_channel(channel) {
            return Err(AppError::AlreadyJoined(existing.to_string()));
        }
        self.channels.push(channel.to_string());
        self.current = Some(channel.to_string());
        Ok(())
    }

    /// Remove the current channel from the joined set
    ///
    /// Returns the channel that was left; no channel is selected afterwards.
    pub fn part_current(&mut self) -> Result<String, AppError> {
        self.require_ready()?;
        let channel = self.current.take().ok_or(AppError::NotInChannel)?;
        self.channels.retain(|c| *c != channel);
        Ok(channel)
    }

    /// Select an already-joined channel
    ///
    /// Returns the channel's joined spelling.
    pub fn switch(&mut self, channel: &str) -> Result<String, AppError> {
        let found = self
            .find_channel(channel)
            .ok_or_else(|| AppError::UnknownChannel(channel.to_string()))?
            .to_string();
        self.current = Some(found.clone());
        Ok(found)
    }

    fn require_ready(&self) -> Result<(), AppError> {
        if self.phase == Phase::Ready {
            Ok(())
        } else {
            Err(AppError::NotRegistered)
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        info!("Session {} -> {}", self.phase, phase);
        self.phase = phase;
    }
}
