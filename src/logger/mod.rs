//! Structured JSON logger.
//!
//! Every event is one JSON object on its own line. Field names are fixed:
//! `l` for the level, `t` for the timestamp (RFC 3339, local time), `m` for
//! the message and `e` for errors. Durations are integer milliseconds.
//!
//! A logger carries context fields that are repeated on every event it
//! writes. [`Logger::sublogger`] takes a snapshot of the context, so
//! request-scoped fields never leak into the shared parent.
//!
//! ```
//! use lighthttp::logger::{Level, Logger};
//!
//! let mut log = Logger::new(std::io::stderr(), true).level(Level::Info);
//! log.add_kv("service", "accounts").add_kv("port", 8080u16);
//!
//! let req_log = log.sublogger().with_kv("request_id", 42u64);
//! req_log.info("path", "/users");
//! req_log.event(Level::Warn).str("user", "bob").msg("slow query");
//! ```
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, SecondsFormat};

pub use event::Event;
pub use field::Field;
pub use level::{global_level, set_global_level, Level, ParseLevelError};

use field::{append_field, append_str};

pub mod event;
pub mod field;
pub mod level;

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Logger writing newline-delimited JSON to a shared sink.
///
/// Cloning is cheap and clones share the sink. Write errors are ignored.
#[derive(Clone)]
pub struct Logger {
    writer: Sink,
    context: Vec<u8>,
    level: Option<Level>,
    timestamp: bool,
}

impl Logger {
    /// New logger with an empty context. With `with_timestamp`, every event
    /// gets a `t` field.
    pub fn new<W: Write + Send + 'static>(writer: W, with_timestamp: bool) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            context: vec![],
            level: None,
            timestamp: with_timestamp,
        }
    }

    /// Append a field to the context. Keys need not be unique.
    pub fn add_kv<V: Into<Field>>(&mut self, key: &str, value: V) -> &mut Self {
        append_field(&mut self.context, key, &value.into());
        self
    }

    pub fn with_kv<V: Into<Field>>(mut self, key: &str, value: V) -> Self {
        self.add_kv(key, value);
        self
    }

    /// Child logger starting with a copy of the current context. Later
    /// additions on either side are not seen by the other.
    pub fn sublogger(&self) -> Self {
        self.clone()
    }

    /// Minimum level for this logger, overriding the global level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn enabled(&self, level: Level) -> bool {
        let global = global_level();
        if global == Level::Disabled || level == Level::Disabled {
            return false;
        }
        level >= self.level.unwrap_or(global)
    }

    /// Start an event. Nothing is allocated when `level` is disabled.
    pub fn event(&self, level: Level) -> Event<'_> {
        if !self.enabled(level) {
            return Event::new(self, level, None);
        }
        let mut buf = Vec::with_capacity(64 + self.context.len());
        buf.extend_from_slice(b"{\"l\":");
        append_str(&mut buf, level.as_str());
        if self.timestamp {
            buf.extend_from_slice(b",\"t\":");
            append_str(
                &mut buf,
                &Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }
        buf.extend_from_slice(&self.context);
        Event::new(self, level, Some(buf))
    }

    pub fn debug<V: Into<Field>>(&self, key: &str, value: V) {
        self.event(Level::Debug).field(key, value).send()
    }
    pub fn info<V: Into<Field>>(&self, key: &str, value: V) {
        self.event(Level::Info).field(key, value).send()
    }
    pub fn warn<V: Into<Field>>(&self, key: &str, value: V) {
        self.event(Level::Warn).field(key, value).send()
    }
    pub fn error<V: Into<Field>>(&self, key: &str, value: V) {
        self.event(Level::Error).field(key, value).send()
    }
    /// Write the event, then exit the process with status 1.
    pub fn fatal<V: Into<Field>>(&self, key: &str, value: V) {
        self.event(Level::Fatal).field(key, value).send()
    }
    /// Write the event, then panic.
    pub fn panic<V: Into<Field>>(&self, key: &str, value: V) {
        self.event(Level::Panic).field(key, value).send()
    }

    /// Debug event with `msg` as message.
    pub fn print<T: fmt::Display>(&self, msg: T) {
        self.event(Level::Debug).msgf(format_args!("{}", msg))
    }
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.event(Level::Debug).msgf(args)
    }

    /// Install as the `log` crate backend.
    pub fn init(self, max_level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Flush the shared sink.
    pub fn flush(&self) {
        let _ = self.lock_writer().flush();
    }

    fn write_line(&self, line: &[u8]) {
        let _ = self.lock_writer().write_all(line);
    }

    fn lock_writer(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &String::from_utf8_lossy(&self.context))
            .field("level", &self.level)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Records from the `log` facade are written with their target under
/// `target`.
impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        self.event(record.level().into())
            .str("target", record.target())
            .msgf(*record.args())
    }

    fn flush(&self) {
        Logger::flush(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::{level_guard, SharedBuf};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::time::Duration;

    fn logger() -> (SharedBuf, Logger) {
        let out = SharedBuf::default();
        (out.clone(), Logger::new(out, false))
    }

    #[test]
    fn test_print() {
        let _guard = level_guard();
        let (out, log) = logger();
        log.print("hello world23");
        assert_eq!(out.contents(), "{\"l\":\"debug\",\"m\":\"hello world23\"}\n");

        out.clear();
        log.print("");
        assert_eq!(out.contents(), "{\"l\":\"debug\"}\n");
    }

    #[test]
    fn test_printf() {
        let _guard = level_guard();
        let (out, log) = logger();
        log.printf(format_args!("hello world {}", 23));
        assert_eq!(out.contents(), "{\"l\":\"debug\",\"m\":\"hello world 23\"}\n");

        out.clear();
        log.printf(format_args!(""));
        assert_eq!(out.contents(), "{\"l\":\"debug\"}\n");
    }

    #[test]
    fn test_sublogger() {
        let _guard = level_guard();
        let (out, log) = logger();
        let log = log.with_kv("k0", "v0").with_kv("kk", "vv");
        let mut log1 = log.sublogger();
        log1.add_kv("k1", "v123").add_kv("k2", "v2");

        log.print("TestSublogger");
        assert_eq!(
            out.contents(),
            "{\"l\":\"debug\",\"k0\":\"v0\",\"kk\":\"vv\",\"m\":\"TestSublogger\"}\n"
        );

        out.clear();
        log1.print("TestSublogger");
        assert_eq!(
            out.contents(),
            "{\"l\":\"debug\",\"k0\":\"v0\",\"kk\":\"vv\",\"k1\":\"v123\",\"k2\":\"v2\",\"m\":\"TestSublogger\"}\n"
        );
    }

    #[test]
    fn test_parent_additions_invisible_to_sublogger() {
        let _guard = level_guard();
        let (out, mut log) = logger();
        let child = log.sublogger();
        log.add_kv("late", true);
        child.print("child");
        assert_eq!(out.contents(), "{\"l\":\"debug\",\"m\":\"child\"}\n");
    }

    #[test]
    fn test_add_kv_individual() {
        let _guard = level_guard();
        let (out, mut log) = logger();
        log.add_kv("string", "string");
        log.print("TestAddKVIndividual");
        assert_eq!(
            out.contents(),
            "{\"l\":\"debug\",\"string\":\"string\",\"m\":\"TestAddKVIndividual\"}\n"
        );

        let cases: Vec<(Logger, &str)> = vec![
            (
                Logger::new(out.clone(), false)
                    .with_kv("bool", true)
                    .with_kv("bools", vec![true, false]),
                "\"bool\":true,\"bools\":[true,false]",
            ),
            (
                Logger::new(out.clone(), false)
                    .with_kv("int8", -12i8)
                    .with_kv("ints8", vec![10i8, -11]),
                "\"int8\":-12,\"ints8\":[10,-11]",
            ),
            (
                Logger::new(out.clone(), false)
                    .with_kv("uint16", 12u16)
                    .with_kv("uints16", vec![123u16, 124]),
                "\"uint16\":12,\"uints16\":[123,124]",
            ),
            (
                Logger::new(out.clone(), false)
                    .with_kv("float32", 12.32f32)
                    .with_kv("float32", vec![-123f32, 124.1]),
                "\"float32\":12.32,\"float32\":[-123,124.1]",
            ),
            (
                Logger::new(out.clone(), false)
                    .with_kv("float64", 12.32f64)
                    .with_kv("float64", vec![-123f64, 124.1]),
                "\"float64\":12.32,\"float64\":[-123,124.1]",
            ),
            (
                Logger::new(out.clone(), false)
                    .with_kv("duration", Duration::from_secs(1))
                    .with_kv(
                        "duration",
                        vec![Duration::from_secs(1), Duration::from_secs(2)],
                    ),
                "\"duration\":1000,\"duration\":[1000,2000]",
            ),
        ];
        for (log, fields) in cases {
            out.clear();
            log.print("TestAddKVIndividual");
            assert_eq!(
                out.contents(),
                format!(
                    "{{\"l\":\"debug\",{},\"m\":\"TestAddKVIndividual\"}}\n",
                    fields
                )
            );
        }
    }

    #[test]
    fn test_add_kv_time() {
        let _guard = level_guard();
        let (out, mut log) = logger();
        let zero = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        log.add_kv("time", zero).add_kv("time", vec![zero, zero]);
        log.print("TestAddKVIndividual");
        assert_eq!(
            out.contents(),
            "{\"l\":\"debug\",\"time\":\"0001-01-01T00:00:00Z\",\"time\":[\"0001-01-01T00:00:00Z\",\"0001-01-01T00:00:00Z\"],\"m\":\"TestAddKVIndividual\"}\n"
        );
    }

    #[test]
    fn test_add_empty_arrays() {
        let _guard = level_guard();
        let (out, mut log) = logger();
        log.add_kv("string", Vec::<String>::new())
            .add_kv("bool", Vec::<bool>::new())
            .add_kv("int", Vec::<i32>::new())
            .add_kv("uint64", Vec::<u64>::new())
            .add_kv("float64", Vec::<f64>::new())
            .add_kv("duration", Vec::<Duration>::new());
        log.print("TestAddKV");
        assert_eq!(
            out.contents(),
            "{\"l\":\"debug\",\"string\":[],\"bool\":[],\"int\":[],\"uint64\":[],\"float64\":[],\"duration\":[],\"m\":\"TestAddKV\"}\n"
        );
    }

    #[test]
    fn test_add_kv_object() {
        let _guard = level_guard();
        let (out, mut log) = logger();
        log.add_kv(
            "interface",
            json!({"a": "aa", "b": 19, "d": 19, "g": {"c": "c", "d": [1, 2, 3]}}),
        )
        .add_kv("bool", true);
        log.print("done");
        assert_eq!(
            out.contents(),
            "{\"l\":\"debug\",\"interface\":{\"a\":\"aa\",\"b\":19,\"d\":19,\"g\":{\"c\":\"c\",\"d\":[1,2,3]}},\"bool\":true,\"m\":\"done\"}\n"
        );
    }

    #[test]
    fn test_level_methods() {
        let _guard = level_guard();
        let (out, log) = logger();
        log.debug("m", "s1");
        log.info("m", "s1");
        log.warn("m", "s1");
        log.error("m", "s1");
        assert_eq!(
            out.contents(),
            "{\"l\":\"debug\",\"m\":\"s1\"}\n{\"l\":\"info\",\"m\":\"s1\"}\n{\"l\":\"warn\",\"m\":\"s1\"}\n{\"l\":\"error\",\"m\":\"s1\"}\n"
        );
    }

    #[test]
    fn test_global_level() {
        let _guard = level_guard();
        let (out, log) = logger();

        set_global_level(Level::Debug);
        log.event(Level::Error).msg("s1");
        assert_eq!(out.contents(), "{\"l\":\"error\",\"m\":\"s1\"}\n");

        out.clear();
        set_global_level(Level::Fatal);
        log.event(Level::Error).msg("s1");
        assert_eq!(out.contents(), "");

        out.clear();
        set_global_level(Level::Info);
        log.event(Level::Warn).msg("s1");
        assert_eq!(out.contents(), "{\"l\":\"warn\",\"m\":\"s1\"}\n");

        out.clear();
        set_global_level(Level::Disabled);
        log.event(Level::Panic).msg("s1");
        log.print("s1");
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn test_global_level_gates_every_lower_level() {
        let _guard = level_guard();
        let (out, log) = logger();
        let levels = [Level::Debug, Level::Info, Level::Warn, Level::Error];
        for (i, min) in levels.iter().enumerate() {
            set_global_level(*min);
            for (j, level) in levels.iter().enumerate() {
                out.clear();
                log.event(*level).msg("s1");
                assert_eq!(out.contents().is_empty(), j < i, "{} at {}", level, min);
            }
        }
    }

    #[test]
    fn test_logger_level() {
        let _guard = level_guard();
        let (out, log) = logger();
        let log = log.level(Level::Debug);
        log.event(Level::Debug).msg("s1");
        assert_eq!(out.contents(), "{\"l\":\"debug\",\"m\":\"s1\"}\n");

        let log = log.level(Level::Info);
        out.clear();
        log.event(Level::Debug).msg("s1");
        assert_eq!(out.contents(), "");
        log.event(Level::Warn).msg("s1");
        assert_eq!(out.contents(), "{\"l\":\"warn\",\"m\":\"s1\"}\n");

        let log = log.level(Level::Warn);
        out.clear();
        log.event(Level::Info).msg("s1");
        assert_eq!(out.contents(), "");
        log.event(Level::Error).msg("s1");
        assert_eq!(out.contents(), "{\"l\":\"error\",\"m\":\"s1\"}\n");

        let log = log.level(Level::Disabled);
        out.clear();
        log.event(Level::Panic).msg("s1");
        assert_eq!(out.contents(), "");
        assert!(!log.event(Level::Panic).enabled());

        let log = log.level(Level::Error);
        assert!(log.event(Level::Panic).enabled());
        assert!(!log.event(Level::Warn).enabled());
    }

    #[test]
    fn test_logger_level_overrides_global() {
        let _guard = level_guard();
        let (out, log) = logger();
        set_global_level(Level::Error);
        let log = log.level(Level::Debug);
        log.debug("m", "s1");
        assert_eq!(out.contents(), "{\"l\":\"debug\",\"m\":\"s1\"}\n");
    }

    #[test]
    fn test_timestamp() {
        let _guard = level_guard();
        let out = SharedBuf::default();
        let log = Logger::new(out.clone(), true).with_kv("k", 1i32);
        log.print("ts");
        let line: serde_json::Value = serde_json::from_str(out.contents().trim_end()).unwrap();
        let t = line["t"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(t).is_ok(), "{}", t);
        assert!(out.contents().starts_with("{\"l\":\"debug\",\"t\":\""));
        assert!(out.contents().ends_with(",\"k\":1,\"m\":\"ts\"}\n"));
    }

    #[test]
    fn test_log_facade_bridge() {
        let _guard = level_guard();
        let (out, log) = logger();
        let log = log.with_kv("app", "demo");
        log::Log::log(
            &log,
            &log::Record::builder()
                .args(format_args!("listening on {}", 8080))
                .level(log::Level::Trace)
                .target("lighthttp::server")
                .build(),
        );
        assert_eq!(
            out.contents(),
            "{\"l\":\"debug\",\"app\":\"demo\",\"target\":\"lighthttp::server\",\"m\":\"listening on 8080\"}\n"
        );
        assert!(log::Log::enabled(
            &log,
            &log::Metadata::builder().level(log::Level::Info).build()
        ));
    }
}
