//! Command dispatcher
//!
//! Turns one line of user input into outbound frames and pane updates.
//! Slash commands drive the session; anything else is a message to the
//! current channel.

use tracing::debug;

use crate::error::AppError;
use crate::message::{Message, Outbound};
use crate::session::Session;
use crate::style::{escape, paint, Color};
use crate::view::{Clock, Feedback, Ui, ViewRegistry, STATUS_PANE};

/// Reason sent with QUIT
pub const QUIT_REASON: &str = "bye";

/// Reason sent with PART when the user gives none
pub const PART_REASON: &str = "leaving";

/// One parsed line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand<'a> {
    /// `/quit`
    Quit,
    /// `/join <channel>`
    Join(Option<&'a str>),
    /// `/part [reason]`
    Part(Option<&'a str>),
    /// `/switch <channel>`
    Switch(Option<&'a str>),
    /// `/channels`
    Channels,
    /// `/raw <line>`, the rest of the input after the command
    Raw(&'a str),
    /// Any other `/word`
    Unknown(&'a str),
    /// Plain text for the current channel
    Say(&'a str),
}

impl<'a> UserCommand<'a> {
    /// Classify a line; returns None for blank input
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut tokens = line.split_whitespace();
        let head = tokens.next()?;

        if !head.starts_with('/') {
            return Some(UserCommand::Say(line));
        }

        let rest = line.trim_start()[head.len()..].trim();
        let rest = (!rest.is_empty()).then_some(rest);
        let command = match head {
            "/quit" => UserCommand::Quit,
            "/join" => UserCommand::Join(tokens.next()),
            "/part" => UserCommand::Part(rest),
            "/switch" => UserCommand::Switch(tokens.next()),
            "/channels" => UserCommand::Channels,
            "/raw" => UserCommand::Raw(rest.unwrap_or_default()),
            other => UserCommand::Unknown(other),
        };
        Some(command)
    }
}

/// Handle one line of user input
///
/// User errors are rendered in the focused pane and produce no frames.
/// Input is ignored once the session is closing.
pub fn dispatch<U: Ui, C: Clock>(
    session: &mut Session,
    views: &mut ViewRegistry<U, C>,
    line: &str,
) -> Vec<Outbound> {
    if !session.phase().is_active() {
        debug!("Ignoring input while {}", session.phase());
        return Vec::new();
    }
    let Some(command) = UserCommand::parse(line) else {
        return Vec::new();
    };

    match execute(session, views, command) {
        Ok(frames) => frames,
        Err(err) => {
            debug!("User error: {}", err);
            views.error(&err);
            Vec::new()
        }
    }
}

fn execute<U: Ui, C: Clock>(
    session: &mut Session,
    views: &mut ViewRegistry<U, C>,
    command: UserCommand<'_>,
) -> Result<Vec<Outbound>, AppError> {
    match command {
        UserCommand::Quit => {
            views.feedback(STATUS_PANE, Feedback::Info, "Disconnecting...");
            session.close();
            Ok(vec![Message::quit(QUIT_REASON).into()])
        }
        UserCommand::Join(None) => Err(AppError::Usage("/join <channel>")),
        UserCommand::Join(Some(channel)) => {
            if channel == STATUS_PANE {
                return Err(AppError::ReservedPane);
            }
            session.join(channel)?;
            views.create(channel)?;
            views.focus(channel)?;
            views.feedback(channel, Feedback::Join, &format!("Joining {channel}"));
            Ok(vec![Message::join(channel).into()])
        }
        UserCommand::Part(reason) => {
            let channel = session.part_current()?;
            views.destroy(&channel)?;
            views.focus_status();
            views.feedback(STATUS_PANE, Feedback::Part, &format!("Left {channel}"));
            let reason = reason.unwrap_or(PART_REASON);
            Ok(vec![Message::part(&channel, reason).into()])
        }
        UserCommand::Switch(None) => Err(AppError::Usage("/switch <channel>")),
        UserCommand::Switch(Some(channel)) => {
            let channel = session.switch(channel)?;
            views.focus(&channel)?;
            views.feedback(&channel, Feedback::Info, &format!("Now talking in {channel}"));
            Ok(Vec::new())
        }
        UserCommand::Channels => {
            let body = if session.channels().is_empty() {
                "No channels joined".to_string()
            } else {
                format!("Channels: {}", session.channels().join(", "))
            };
            let pane = views.focused().to_string();
            views.feedback(&pane, Feedback::Info, &body);
            Ok(Vec::new())
        }
        UserCommand::Raw("") => Err(AppError::Usage("/raw <line>")),
        UserCommand::Raw(raw) => {
            let pane = views.focused().to_string();
            let echo = format!("{} {}", paint(Color::Yellow, "raw >"), escape(raw));
            views.append(&pane, &echo);
            Ok(vec![Outbound::Raw(raw.to_string())])
        }
        UserCommand::Unknown(name) => Err(AppError::UnknownCommand(name.to_string())),
        UserCommand::Say(text) => {
            let Some(channel) = session.current_channel().map(str::to_string) else {
                views.feedback(
                    STATUS_PANE,
                    Feedback::Error,
                    &AppError::NotInChannel.to_string(),
                );
                return Ok(Vec::new());
            };
            let to = paint(Color::Green, &escape(&format!("To {channel}")));
            views.append(&channel, &format!("{to}: {}", escape(text)));
            Ok(vec![Message::privmsg(&channel, text).into()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::Phase;
    use crate::view::testing::{FixedClock, MemoryUi};

    struct Fixture {
        session: Session,
        views: ViewRegistry<MemoryUi, FixedClock>,
        ui: MemoryUi,
    }

    impl Fixture {
        fn registering() -> Self {
            let ui = MemoryUi::default();
            let mut session = Session::new();
            session.opened(&Config::default());
            Self {
                session,
                views: ViewRegistry::new(ui.clone(), FixedClock),
                ui,
            }
        }

        fn ready() -> Self {
            let mut fixture = Self::registering();
            fixture.session.registered("card");
            fixture
        }

        fn input(&mut self, line: &str) -> Vec<String> {
            dispatch(&mut self.session, &mut self.views, line)
                .iter()
                .map(ToString::to_string)
                .collect()
        }

        fn assert_invariants(&self) {
            if let Some(current) = self.session.current_channel() {
                assert!(self.session.channels().iter().any(|c| c == current));
            }
            for channel in self.session.channels() {
                assert!(self.views.contains(channel), "no pane for {channel}");
                assert!(self.ui.has_pane(channel));
            }
            assert!(self.ui.has_pane(STATUS_PANE));
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(UserCommand::parse(""), None);
        assert_eq!(UserCommand::parse("   "), None);
        assert_eq!(UserCommand::parse("/quit"), Some(UserCommand::Quit));
        assert_eq!(UserCommand::parse("/join #a"), Some(UserCommand::Join(Some("#a"))));
        assert_eq!(UserCommand::parse("/join"), Some(UserCommand::Join(None)));
        assert_eq!(UserCommand::parse("/part"), Some(UserCommand::Part(None)));
        assert_eq!(
            UserCommand::parse("/part see you"),
            Some(UserCommand::Part(Some("see you")))
        );
        assert_eq!(
            UserCommand::parse("/raw WHOIS  alice"),
            Some(UserCommand::Raw("WHOIS  alice"))
        );
        assert_eq!(UserCommand::parse("/nick x"), Some(UserCommand::Unknown("/nick")));
        assert_eq!(UserCommand::parse("hi there"), Some(UserCommand::Say("hi there")));
    }

    #[test]
    fn test_join_then_message() {
        let mut fx = Fixture::ready();
        assert_eq!(fx.input("/join #foo"), vec!["JOIN #foo"]);
        assert!(fx.ui.has_pane("#foo"));
        assert_eq!(fx.ui.focused().as_deref(), Some("#foo"));
        assert_eq!(fx.session.current_channel(), Some("#foo"));

        assert_eq!(fx.input("hello world"), vec!["PRIVMSG #foo :hello world"]);
        let last = fx.ui.lines("#foo").pop().unwrap();
        assert!(last.ends_with("To #foo: hello world"), "{last}");
        fx.assert_invariants();
    }

    #[test]
    fn test_typed_markup_is_echoed_literally() {
        let mut fx = Fixture::ready();
        fx.input("/join #foo");
        assert_eq!(fx.input("[red]hi[-]"), vec!["PRIVMSG #foo :[red]hi[-]"]);
        let last = fx.ui.lines("#foo").pop().unwrap();
        assert!(last.ends_with("To #foo: [red]hi[-]"), "{last}");
    }

    #[test]
    fn test_join_missing_argument() {
        let mut fx = Fixture::ready();
        assert!(fx.input("/join").is_empty());
        assert!(fx.ui.contains(STATUS_PANE, "usage: /join <channel>"));
    }

    #[test]
    fn test_join_already_joined() {
        let mut fx = Fixture::ready();
        fx.input("/join #foo");
        assert!(fx.input("/join #foo").is_empty());
        assert!(fx.ui.contains("#foo", "already joined #foo"));
        assert_eq!(fx.session.channels().len(), 1);
        fx.assert_invariants();
    }

    #[test]
    fn test_join_status_pane_rejected() {
        let mut fx = Fixture::ready();
        assert!(fx.input("/join *").is_empty());
        assert!(fx.session.channels().is_empty());
        fx.assert_invariants();
    }

    #[test]
    fn test_join_before_registration() {
        let mut fx = Fixture::registering();
        assert!(fx.input("/join #foo").is_empty());
        assert!(!fx.ui.has_pane("#foo"));
        assert!(fx.ui.contains(STATUS_PANE, "not registered"));
    }

    #[test]
    fn test_part() {
        let mut fx = Fixture::ready();
        fx.input("/join #foo");
        assert_eq!(fx.input("/part"), vec!["PART #foo :leaving"]);
        assert!(!fx.ui.has_pane("#foo"));
        assert!(fx.session.channels().is_empty());
        assert!(fx.session.current_channel().is_none());
        assert_eq!(fx.ui.focused().as_deref(), Some(STATUS_PANE));
        fx.assert_invariants();
    }

    #[test]
    fn test_part_with_reason() {
        let mut fx = Fixture::ready();
        fx.input("/join #foo");
        assert_eq!(fx.input("/part gone fishing"), vec!["PART #foo :gone fishing"]);
    }

    #[test]
    fn test_part_without_channel() {
        let mut fx = Fixture::ready();
        assert!(fx.input("/part").is_empty());
        assert!(fx.ui.contains(STATUS_PANE, "not in a channel"));
    }

    #[test]
    fn test_switch() {
        let mut fx = Fixture::ready();
        fx.input("/join #foo");
        fx.input("/join #bar");
        assert!(fx.input("/switch #foo").is_empty());
        assert_eq!(fx.session.current_channel(), Some("#foo"));
        assert_eq!(fx.ui.focused().as_deref(), Some("#foo"));
        assert_eq!(fx.input("hey"), vec!["PRIVMSG #foo :hey"]);

        assert!(fx.input("/switch #nope").is_empty());
        assert!(fx.ui.contains("#foo", "not joined to #nope"));
        assert_eq!(fx.session.current_channel(), Some("#foo"));
        fx.assert_invariants();
    }

    #[test]
    fn test_channels_lists_names() {
        let mut fx = Fixture::ready();
        fx.input("/channels");
        assert!(fx.ui.contains(STATUS_PANE, "No channels joined"));
        fx.input("/join #foo");
        fx.input("/join #bar");
        fx.input("/channels");
        assert!(fx.ui.contains("#bar", "Channels: #foo, #bar"));
    }

    #[test]
    fn test_raw_passthrough() {
        let mut fx = Fixture::registering();
        assert_eq!(fx.input("/raw WHOIS alice"), vec!["WHOIS alice"]);
        assert!(fx.ui.contains(STATUS_PANE, "raw > WHOIS alice"));
        assert!(fx.input("/raw").is_empty());
        assert!(fx.ui.contains(STATUS_PANE, "usage: /raw <line>"));
    }

    #[test]
    fn test_unknown_command() {
        let mut fx = Fixture::ready();
        assert!(fx.input("/dance").is_empty());
        assert!(fx.ui.contains(STATUS_PANE, "unknown command /dance"));
    }

    #[test]
    fn test_message_without_channel() {
        let mut fx = Fixture::ready();
        assert!(fx.input("hello").is_empty());
        assert!(fx.ui.contains(STATUS_PANE, "not in a channel"));
    }

    #[test]
    fn test_quit() {
        let mut fx = Fixture::ready();
        assert_eq!(fx.input("/quit"), vec!["QUIT :bye"]);
        assert_eq!(fx.session.phase(), Phase::Closing);

        // Nothing more once closing
        assert!(fx.input("/join #foo").is_empty());
        assert!(fx.input("/quit").is_empty());
    }

    #[test]
    fn test_quit_while_registering() {
        let mut fx = Fixture::registering();
        assert_eq!(fx.input("/quit"), vec!["QUIT :bye"]);
        assert_eq!(fx.session.phase(), Phase::Closing);
    }
}
