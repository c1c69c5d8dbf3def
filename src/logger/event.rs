use std::fmt;
use std::process;

use crate::logger::field::{append_field, append_str, Field};
use crate::logger::{Level, Logger};

/// One log line under construction.
///
/// Obtained from [`Logger::event`] and friends, finished by [`msg`],
/// [`msgf`] or [`send`]. A disabled event holds no buffer: adding fields
/// and finishing it cost nothing.
///
/// [`msg`]: Event::msg
/// [`msgf`]: Event::msgf
/// [`send`]: Event::send
#[must_use = "an event is only written by msg, msgf or send"]
pub struct Event<'a> {
    logger: &'a Logger,
    level: Level,
    buf: Option<Vec<u8>>,
}

impl<'a> Event<'a> {
    pub(crate) fn new(logger: &'a Logger, level: Level, buf: Option<Vec<u8>>) -> Self {
        Self { logger, level, buf }
    }
    pub fn enabled(&self) -> bool {
        self.buf.is_some()
    }
    pub fn level(&self) -> Level {
        self.level
    }
    pub fn field<V: Into<Field>>(mut self, key: &str, value: V) -> Self {
        if let Some(buf) = self.buf.as_mut() {
            append_field(buf, key, &value.into());
        }
        self
    }
    pub fn str(self, key: &str, value: &str) -> Self {
        self.field(key, value)
    }
    /// Add the error's message under `e`.
    pub fn err<E: fmt::Display + ?Sized>(mut self, err: &E) -> Self {
        if let Some(buf) = self.buf.as_mut() {
            append_field(buf, "e", &Field::Str(err.to_string()));
        }
        self
    }
    /// Write the line, with `msg` under `m` unless it is empty.
    ///
    /// An enabled [`Level::Fatal`] event flushes the sink and exits the
    /// process with status 1 once written.
    ///
    /// # Panics
    /// An enabled [`Level::Panic`] event panics with `msg` once written.
    pub fn msg(self, msg: &str) {
        let mut buf = match self.buf {
            Some(buf) => buf,
            None => return,
        };
        if !msg.is_empty() {
            buf.extend_from_slice(b",\"m\":");
            append_str(&mut buf, msg);
        }
        buf.extend_from_slice(b"}\n");
        self.logger.write_line(&buf);

        match self.level {
            Level::Fatal => {
                self.logger.flush();
                process::exit(1)
            }
            Level::Panic => panic!("{}", msg),
            _ => {}
        }
    }
    /// Like [`msg`](Event::msg), formatting only when enabled.
    pub fn msgf(self, args: fmt::Arguments<'_>) {
        if self.enabled() {
            self.msg(&fmt::format(args));
        }
    }
    /// Write the line without a message.
    pub fn send(self) {
        self.msg("")
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.level)
            .field("enabled", &self.enabled())
            .finish()
    }
}
