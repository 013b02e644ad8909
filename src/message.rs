//! IRC protocol codec
//!
//! Parses one framed line into a typed `Message` and serializes outbound
//! messages back into wire text. No I/O happens here; framing (`\r\n`)
//! belongs to the transport.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Why a line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing but whitespace
    #[error("empty line")]
    Empty,
    /// A source prefix with no command after it
    #[error("missing command after source")]
    MissingCommand,
}

/// A parsed IRC line
///
/// `params` holds the middle parameters in order; `trailing` holds the
/// final `:`-introduced parameter, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Raw prefix without the leading `:`
    pub source: Option<String>,
    /// Command or three-digit numeric, case preserved
    pub command: String,
    /// Middle parameters
    pub params: Vec<String>,
    /// Trailing parameter
    pub trailing: Option<String>,
}

impl Message {
    /// Parse a raw line following the classic IRC grammar
    ///
    /// Tokens are whitespace-delimited; the first token starting with `:`
    /// after the command begins the trailing parameter, which keeps the rest
    /// of the tokens joined by single spaces.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut tokens = line.split_whitespace();

        let mut head = tokens.next().ok_or(ParseError::Empty)?;
        let source = match head.strip_prefix(':') {
            Some(source) => {
                head = tokens.next().ok_or(ParseError::MissingCommand)?;
                Some(source.to_string())
            }
            None => None,
        };
        let command = head.to_string();

        let mut params = Vec::new();
        let mut trailing = None;
        while let Some(token) = tokens.next() {
            if let Some(first) = token.strip_prefix(':') {
                let mut text = first.to_string();
                for rest in tokens.by_ref() {
                    text.push(' ');
                    text.push_str(rest);
                }
                trailing = Some(text);
                break;
            }
            params.push(token.to_string());
        }

        Ok(Message {
            source,
            command,
            params,
            trailing,
        })
    }

    /// Create an outbound message with middle parameters only
    pub fn new(command: &str, params: Vec<&str>) -> Self {
        Self {
            source: None,
            command: command.to_string(),
            params: params.into_iter().map(str::to_string).collect(),
            trailing: None,
        }
    }

    /// Set the trailing parameter
    pub fn with_trailing(mut self, trailing: &str) -> Self {
        self.trailing = Some(trailing.to_string());
        self
    }

    /// `NICK <nick>`
    pub fn nick(nick: &str) -> Self {
        Self::new("NICK", vec![nick])
    }

    /// `USER <user> 0 * :<realname>`
    pub fn user(user: &str, realname: &str) -> Self {
        Self::new("USER", vec![user, "0", "*"]).with_trailing(realname)
    }

    /// `JOIN <channel>`
    pub fn join(channel: &str) -> Self {
        Self::new("JOIN", vec![channel])
    }

    /// `PART <channel> :<reason>`
    pub fn part(channel: &str, reason: &str) -> Self {
        Self::new("PART", vec![channel]).with_trailing(reason)
    }

    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: &str, text: &str) -> Self {
        Self::new("PRIVMSG", vec![target]).with_trailing(text)
    }

    /// `QUIT :<reason>`
    pub fn quit(reason: &str) -> Self {
        Self::new("QUIT", vec![]).with_trailing(reason)
    }

    /// `PONG` echoing every token of a `PING`
    pub fn pong(ping: &Message) -> Self {
        Self {
            source: None,
            command: "PONG".to_string(),
            params: ping.params.clone(),
            trailing: ping.trailing.clone(),
        }
    }

    /// Case-insensitive command match
    pub fn is(&self, command: &str) -> bool {
        self.command.eq_ignore_ascii_case(command)
    }

    /// Nick part of the source (`nick!user@host` → `nick`)
    pub fn source_nick(&self) -> Option<&str> {
        self.source
            .as_deref()
            .map(|source| source.split('!').next().unwrap_or(source))
    }

    /// First middle parameter (the target of PRIVMSG, JOIN, PART)
    pub fn target(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }

    /// Message text: the trailing parameter, or every middle one after
    /// the target joined by spaces
    pub fn text(&self) -> Option<Cow<'_, str>> {
        if let Some(ref trailing) = self.trailing {
            return Some(Cow::Borrowed(trailing));
        }
        match self.params.get(1..) {
            Some(rest) if !rest.is_empty() => Some(Cow::Owned(rest.join(" "))),
            _ => None,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref source) = self.source {
            write!(f, ":{source} ")?;
        }
        write!(f, "{}", self.command)?;
        for param in &self.params {
            write!(f, " {param}")?;
        }
        if let Some(ref trailing) = self.trailing {
            write!(f, " :{trailing}")?;
        }
        Ok(())
    }
}

/// One frame queued for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A message built by the client
    Message(Message),
    /// `/raw` passthrough, sent verbatim
    Raw(String),
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Message(msg) => msg.fmt(f),
            Outbound::Raw(line) => f.write_str(line),
        }
    }
}

impl From<Message> for Outbound {
    fn from(msg: Message) -> Self {
        Outbound::Message(msg)
    }
}
