//! Basic type definitions for the IRC client
//!
//! Provides the small value types shared across modules:
//! - `Phase`: lifecycle of the one server connection
//! - `Outcome`: how a session ended, and the process exit code for it

/// Connection lifecycle
///
/// Advances strictly forward: Dial → Registering → Ready → Closing → Closed.
/// Registering and Ready may also jump straight to Closed when the peer
/// hangs up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Socket not yet open
    Dial,
    /// NICK/USER sent, waiting for 001
    Registering,
    /// Registered; channel commands allowed
    Ready,
    /// Shutting down, draining queued outbound lines
    Closing,
    /// All resources released
    Closed,
}

impl Phase {
    /// Whether user input and server lines are still acted on
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Registering | Phase::Ready)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Dial => "dial",
            Phase::Registering => "registering",
            Phase::Ready => "ready",
            Phase::Closing => "closing",
            Phase::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user asked to quit (or closed stdin)
    Quit,
    /// The server closed the connection
    Disconnected,
    /// The server rejected our nickname during registration
    NickInUse,
    /// A read or write on the socket failed
    ConnectionLost,
}

impl Outcome {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Quit | Outcome::Disconnected => 0,
            Outcome::NickInUse | Outcome::ConnectionLost => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert!(Phase::Dial < Phase::Registering);
        assert!(Phase::Ready < Phase::Closing);
        assert!(Phase::Closing < Phase::Closed);
    }

    #[test]
    fn test_phase_active() {
        assert!(!Phase::Dial.is_active());
        assert!(Phase::Registering.is_active());
        assert!(Phase::Ready.is_active());
        assert!(!Phase::Closing.is_active());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Quit.exit_code(), 0);
        assert_eq!(Outcome::Disconnected.exit_code(), 0);
        assert_ne!(Outcome::NickInUse.exit_code(), 0);
        assert_ne!(Outcome::ConnectionLost.exit_code(), 0);
    }
}
