//! Inline colour markup for pane text
//!
//! Styled text uses `[color]…[-]` markers. The UI collaborator decides how
//! to render them; the console renders ANSI escapes or strips them.

/// Colours understood by the markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    White,
}

impl Color {
    /// Marker name as written between brackets
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::White => "white",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "white" => Some(Color::White),
            _ => None,
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::White => "\x1b[37m",
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";

/// Wrap `text` in a colour marker
pub fn paint(color: Color, text: &str) -> String {
    format!("[{}]{}[-]", color.name(), text)
}

enum Marker {
    Start(Color),
    Reset,
}

/// A `[name]` tag at the start of a string
///
/// `[name[]` is the escaped form of `[name]` and renders literally; each
/// extra `[` before the closing bracket is one level of escaping.
struct Tag {
    marker: Marker,
    escapes: usize,
    len: usize,
}

fn tag_at(s: &str) -> Option<Tag> {
    let inner = s.strip_prefix('[')?;
    let end = inner.find(']')?;
    let body = &inner[..end];
    let name = body.trim_end_matches('[');
    let marker = if name == "-" {
        Marker::Reset
    } else {
        Marker::Start(Color::from_name(name)?)
    };
    Some(Tag {
        marker,
        escapes: body.len() - name.len(),
        len: end + 2,
    })
}

fn render(text: &str, ansi: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('[') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match tag_at(rest) {
            Some(tag) if tag.escapes > 0 => {
                out.push_str(&rest[..tag.len - 2]);
                out.push(']');
                rest = &rest[tag.len..];
            }
            Some(tag) => {
                if ansi {
                    out.push_str(match tag.marker {
                        Marker::Start(color) => color.ansi(),
                        Marker::Reset => ANSI_RESET,
                    });
                }
                rest = &rest[tag.len..];
            }
            None => {
                out.push('[');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escape text so any markers in it are displayed, not interpreted
///
/// Used for everything that did not come from the client itself: server
/// lines, nicks, message text and typed input.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('[') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match tag_at(rest) {
            Some(tag) => {
                out.push_str(&rest[..tag.len - 1]);
                out.push_str("[]");
                rest = &rest[tag.len..];
            }
            None => {
                out.push('[');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Remove all colour markers, leaving plain text
pub fn strip(text: &str) -> String {
    render(text, false)
}

/// Replace colour markers with ANSI SGR escapes
pub fn to_ansi(text: &str) -> String {
    render(text, true)
}
