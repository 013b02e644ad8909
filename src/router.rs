//! Inbound router
//!
//! Decides what each server line means: answer it (PING), advance the
//! session (001, 433), or render it to a pane.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::message::{Message, Outbound};
use crate::session::Session;
use crate::style::{escape, paint, Color};
use crate::types::Phase;
use crate::view::{Clock, Feedback, Ui, ViewRegistry, STATUS_PANE};

/// Registration accepted
pub const RPL_WELCOME: &str = "001";

/// Nickname already in use
pub const ERR_NICKNAMEINUSE: &str = "433";

/// Handle one inbound line
///
/// Returns the frames to send in reply. A nickname rejection during
/// registration moves the session to Closing and is returned as
/// `AppError::NickInUse`; every other problem is rendered and swallowed.
pub fn route<U: Ui, C: Clock>(
    session: &mut Session,
    views: &mut ViewRegistry<U, C>,
    config: &Config,
    line: &str,
) -> Result<Vec<Outbound>, AppError> {
    if !session.phase().is_active() {
        debug!("Dropping line while {}: {}", session.phase(), line);
        return Ok(Vec::new());
    }

    let msg = match Message::parse(line) {
        Ok(msg) => msg,
        Err(err) => {
            let err = AppError::from(err);
            warn!("Unparseable server line {:?}: {}", line, err);
            views.status(line);
            return Ok(Vec::new());
        }
    };

    if msg.is("PING") {
        return Ok(vec![Message::pong(&msg).into()]);
    }

    if msg.is("PRIVMSG") {
        route_privmsg(views, &msg, line);
        return Ok(Vec::new());
    }

    views.status(line);

    if msg.is(RPL_WELCOME) {
        let nickname = msg.target().unwrap_or(&config.nickname);
        if session.registered(nickname) {
            info!("Registered as {}", nickname);
            views.feedback(
                STATUS_PANE,
                Feedback::Info,
                &format!("connected to {} as {}", config.addr(), nickname),
            );
        }
    } else if msg.is(ERR_NICKNAMEINUSE) && session.phase() == Phase::Registering {
        let err = AppError::NickInUse(config.nickname.clone());
        warn!("Registration rejected: {}", err);
        views.feedback(STATUS_PANE, Feedback::Error, &format!("Username taken, {err}"));
        session.close();
        return Err(err);
    }

    Ok(Vec::new())
}

/// Channel messages go to the channel pane; everything else to status
fn route_privmsg<U: Ui, C: Clock>(views: &mut ViewRegistry<U, C>, msg: &Message, line: &str) {
    let (Some(target), Some(text)) = (msg.target(), msg.text()) else {
        views.status(line);
        return;
    };
    if target == STATUS_PANE || !views.contains(target) {
        views.status(line);
        return;
    }
    let nick = msg.source_nick().unwrap_or("?");
    let body = format!("{}: {}", paint(Color::Blue, &escape(nick)), escape(&text));
    views.append(target, &body);
}
