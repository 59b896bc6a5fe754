//! Message rendering
//!
//! The [`Formatter`] turns a level, a caller location and a set of format
//! arguments into the line handed to a [`Sink`](super::Sink). Arguments that
//! need special presentation are wrapped in a [`Value`] variant, which picks
//! its rendering by matching on the variant.

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};
use std::panic::Location;

/// strftime pattern of the header every sink writes in front of a line.
pub const RECORD_HEADER_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

/// strftime pattern used by [`Value::Timestamp`].
pub const VALUE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H:%M:%S";

/// Renders a message into a complete log line.
pub trait Formatter: Send + Sync {
    fn render(&self, level: LogLevel, location: &Location<'_>, args: fmt::Arguments<'_>)
        -> String;
}

/// `<file>:<line>: [E ]<message>`, with the file reduced to its base name.
#[derive(Debug, Clone)]
pub struct DefaultFormatter {
    show_location: bool,
}

impl DefaultFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            show_location: true,
        }
    }

    /// Drop the `<file>:<line>: ` part of every line
    #[must_use]
    pub fn without_location() -> Self {
        Self {
            show_location: false,
        }
    }
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for DefaultFormatter {
    fn render(
        &self,
        level: LogLevel,
        location: &Location<'_>,
        args: fmt::Arguments<'_>,
    ) -> String {
        let mut line = String::new();
        if self.show_location {
            let _ = write!(line, "{}:{}: ", short_file(location.file()), location.line());
        }
        if level == LogLevel::Error {
            line.push_str("E ");
        }
        let _ = line.write_fmt(args);
        line
    }
}

/// Base name of a source path
pub fn short_file(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

/// Header written in front of each record by the built-in sinks.
pub fn record_header(now: &DateTime<Local>) -> String {
    now.format(RECORD_HEADER_FORMAT).to_string()
}

/// Argument with a presentation chosen by its variant.
///
/// ```
/// use rust_vlog::Value;
///
/// assert_eq!(Value::bytes(b"abc").to_string(), "abc");
/// assert_eq!(Value::bytes(&[0x00, 0xff]).to_string(), "00ff");
///
/// let make = || "computed".to_string();
/// assert_eq!(Value::LazyString(&make).to_string(), "computed");
/// ```
pub enum Value<'a> {
    /// Bytes shown as text, each byte read as a Latin-1 character
    PrintableBytes(&'a [u8]),
    /// Bytes shown as lowercase hex
    HexBytes(&'a [u8]),
    /// Wall-clock time shown as `YYYYMMDD-HH:MM:SS`
    Timestamp(DateTime<Local>),
    /// Text produced only when the message is actually rendered
    LazyString(&'a dyn Fn() -> String),
}

impl<'a> Value<'a> {
    /// `PrintableBytes` when every byte is a printable Latin-1 character,
    /// `HexBytes` otherwise.
    #[must_use]
    pub fn bytes(data: &'a [u8]) -> Self {
        if data.iter().copied().all(is_printable) {
            Value::PrintableBytes(data)
        } else {
            Value::HexBytes(data)
        }
    }
}

/// Space, ASCII graphic characters and the Latin-1 graphic range, which
/// leaves out the no-break space (0xA0) and the soft hyphen (0xAD).
fn is_printable(c: u8) -> bool {
    matches!(c, 0x20..=0x7e | 0xa1..=0xac | 0xae..=0xff)
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::PrintableBytes(data) => {
                for &byte in data.iter() {
                    f.write_char(char::from(byte))?;
                }
                Ok(())
            }
            Value::HexBytes(data) => {
                for byte in data.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Timestamp(time) => write!(f, "{}", time.format(VALUE_TIMESTAMP_FORMAT)),
            Value::LazyString(make) => f.write_str(&make()),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::PrintableBytes(data) => f.debug_tuple("PrintableBytes").field(data).finish(),
            Value::HexBytes(data) => f.debug_tuple("HexBytes").field(data).finish(),
            Value::Timestamp(time) => f.debug_tuple("Timestamp").field(time).finish(),
            Value::LazyString(_) => f.write_str("LazyString(..)"),
        }
    }
}

/// Display values separated by single spaces.
///
/// ```
/// use rust_vlog::Joined;
///
/// assert_eq!(Joined(&[&"conn", &42, &true]).to_string(), "conn 42 true");
/// ```
pub struct Joined<'a>(pub &'a [&'a dyn fmt::Display]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::Cell;

    #[test]
    fn test_default_formatter() {
        let location = Location::caller();
        let line = DefaultFormatter::new().render(
            LogLevel::Info,
            location,
            format_args!("{} is 1", 1),
        );
        assert_eq!(line, format!("format.rs:{}: 1 is 1", location.line()));

        let line = DefaultFormatter::without_location().render(
            LogLevel::Error,
            location,
            format_args!("plaintext"),
        );
        assert_eq!(line, "E plaintext");
    }

    #[test]
    fn test_short_file() {
        assert_eq!(short_file("src/core/format.rs"), "format.rs");
        assert_eq!(short_file("C:\\src\\main.rs"), "main.rs");
        assert_eq!(short_file("main.rs"), "main.rs");
    }

    #[test]
    fn test_value_bytes() {
        assert!(matches!(Value::bytes(b"hello world"), Value::PrintableBytes(_)));
        assert!(matches!(Value::bytes(b"tab\there"), Value::HexBytes(_)));
        assert_eq!(Value::bytes(b"caf\xe9").to_string(), "caf\u{e9}");
        assert_eq!(Value::bytes(b"\xa0").to_string(), "a0");
        assert_eq!(Value::bytes(b"soft\xad").to_string(), "736f6674ad");
        assert_eq!(Value::bytes(&[0x7f]).to_string(), "7f");
        assert_eq!(Value::HexBytes(&[0x0a, 0xbc]).to_string(), "0abc");
    }

    #[test]
    fn test_value_timestamp() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(Value::Timestamp(time).to_string(), "20240309-07:05:01");
    }

    #[test]
    fn test_lazy_string_only_called_when_rendered() {
        let called = Cell::new(0);
        let make = || {
            called.set(called.get() + 1);
            "lazy".to_string()
        };
        let value = Value::LazyString(&make);
        assert_eq!(called.get(), 0);
        assert_eq!(format!("f={}", value), "f=lazy");
        assert_eq!(called.get(), 1);
    }

    #[test]
    fn test_joined() {
        assert_eq!(Joined(&[]).to_string(), "");
        assert_eq!(Joined(&[&"a"]).to_string(), "a");
        assert_eq!(Joined(&[&"a", &1.5]).to_string(), "a 1.5");
    }
}
