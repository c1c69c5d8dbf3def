use std::fmt;
use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, TimeZone};
use serde::Serialize;

/// A typed log field value.
///
/// Every supported Rust type converts into a `Field` with `From`, so
/// `logger.add_kv("port", 8080u16)` and `logger.add_kv("tags", vec!["a", "b"])`
/// both work. Anything else serializable goes through [`Field::object`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Str(String),
    Strs(Vec<String>),
    Bool(bool),
    Bools(Vec<bool>),
    Int(i64),
    Ints(Vec<i64>),
    Uint(u64),
    Uints(Vec<u64>),
    Float32(f32),
    Floats32(Vec<f32>),
    Float64(f64),
    Floats64(Vec<f64>),
    Time(DateTime<FixedOffset>),
    Times(Vec<DateTime<FixedOffset>>),
    /// Encoded as integer milliseconds.
    Dur(Duration),
    Durs(Vec<Duration>),
    Object(serde_json::Value),
}

impl Field {
    /// Nested value encoded with serde. A value that fails to serialize is
    /// logged as a `"marshaling error: ..."` string.
    pub fn object<T: Serialize + ?Sized>(value: &T) -> Field {
        match serde_json::to_value(value) {
            Ok(value) => Field::Object(value),
            Err(err) => Field::Str(format!("marshaling error: {}", err)),
        }
    }

    /// Append the JSON encoding of the value.
    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Field::Str(s) => append_str(buf, s),
            Field::Strs(v) => append_list(buf, v, |buf, s| append_str(buf, s)),
            Field::Bool(b) => append_display(buf, b),
            Field::Bools(v) => append_list(buf, v, append_display),
            Field::Int(i) => append_display(buf, i),
            Field::Ints(v) => append_list(buf, v, append_display),
            Field::Uint(u) => append_display(buf, u),
            Field::Uints(v) => append_list(buf, v, append_display),
            Field::Float32(f) => append_float(buf, *f),
            Field::Floats32(v) => append_list(buf, v, |buf, f| append_float(buf, *f)),
            Field::Float64(f) => append_float(buf, *f),
            Field::Floats64(v) => append_list(buf, v, |buf, f| append_float(buf, *f)),
            Field::Time(t) => append_time(buf, t),
            Field::Times(v) => append_list(buf, v, append_time),
            Field::Dur(d) => append_display(buf, &d.as_millis()),
            Field::Durs(v) => append_list(buf, v, |buf, d| append_display(buf, &d.as_millis())),
            Field::Object(value) => {
                let _ = serde_json::to_writer(&mut *buf, value);
            }
        }
    }
}

/// Append `,"key":value`.
pub(crate) fn append_field(buf: &mut Vec<u8>, key: &str, field: &Field) {
    buf.push(b',');
    append_str(buf, key);
    buf.push(b':');
    field.encode(buf);
}

pub(crate) fn append_str(buf: &mut Vec<u8>, s: &str) {
    let _ = serde_json::to_writer(&mut *buf, s);
}

fn append_display<T: fmt::Display>(buf: &mut Vec<u8>, value: &T) {
    let _ = write!(buf, "{}", value);
}

fn append_time(buf: &mut Vec<u8>, t: &DateTime<FixedOffset>) {
    buf.push(b'"');
    buf.extend_from_slice(t.to_rfc3339_opts(SecondsFormat::Secs, true).as_bytes());
    buf.push(b'"');
}

fn append_list<T, F>(buf: &mut Vec<u8>, values: &[T], mut append: F)
where
    F: FnMut(&mut Vec<u8>, &T),
{
    buf.push(b'[');
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        append(buf, value);
    }
    buf.push(b']');
}

trait JsonFloat: fmt::Display + Copy {
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
    fn is_sign_negative(self) -> bool;
}

macro_rules! json_float {
    ($($t:ty),+) => {
        $(
            impl JsonFloat for $t {
                fn is_nan(self) -> bool {
                    <$t>::is_nan(self)
                }
                fn is_infinite(self) -> bool {
                    <$t>::is_infinite(self)
                }
                fn is_sign_negative(self) -> bool {
                    <$t>::is_sign_negative(self)
                }
            }
        )+
    };
}

json_float!(f32, f64);

// JSON has no NaN or infinities: they are written as strings.
fn append_float<F: JsonFloat>(buf: &mut Vec<u8>, value: F) {
    if value.is_nan() {
        buf.extend_from_slice(b"\"NaN\"");
    } else if value.is_infinite() && value.is_sign_negative() {
        buf.extend_from_slice(b"\"-Inf\"");
    } else if value.is_infinite() {
        buf.extend_from_slice(b"\"+Inf\"");
    } else {
        append_display(buf, &value);
    }
}

macro_rules! from_number {
    ($variant:ident, $list:ident, $target:ty; $($t:ty),+) => {
        $(
            impl From<$t> for Field {
                fn from(value: $t) -> Self {
                    Field::$variant(value as $target)
                }
            }

            impl From<Vec<$t>> for Field {
                fn from(values: Vec<$t>) -> Self {
                    Field::$list(values.into_iter().map(|v| v as $target).collect())
                }
            }

            impl From<&[$t]> for Field {
                fn from(values: &[$t]) -> Self {
                    Field::$list(values.iter().map(|&v| v as $target).collect())
                }
            }
        )+
    };
}

from_number!(Int, Ints, i64; i8, i16, i32, i64, isize);
from_number!(Uint, Uints, u64; u8, u16, u32, u64, usize);
from_number!(Float32, Floats32, f32; f32);
from_number!(Float64, Floats64, f64; f64);

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Str(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Str(value)
    }
}

impl From<&String> for Field {
    fn from(value: &String) -> Self {
        Field::Str(value.clone())
    }
}

impl From<Vec<String>> for Field {
    fn from(values: Vec<String>) -> Self {
        Field::Strs(values)
    }
}

impl From<Vec<&str>> for Field {
    fn from(values: Vec<&str>) -> Self {
        Field::Strs(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Field {
    fn from(values: &[&str]) -> Self {
        Field::Strs(values.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for Field {
    fn from(values: &[String]) -> Self {
        Field::Strs(values.to_vec())
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Field::Bool(value)
    }
}

impl From<Vec<bool>> for Field {
    fn from(values: Vec<bool>) -> Self {
        Field::Bools(values)
    }
}

impl From<&[bool]> for Field {
    fn from(values: &[bool]) -> Self {
        Field::Bools(values.to_vec())
    }
}

fn fixed<Tz: TimeZone>(t: DateTime<Tz>) -> DateTime<FixedOffset> {
    let offset = t.offset().fix();
    t.with_timezone(&offset)
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Field {
    fn from(value: DateTime<Tz>) -> Self {
        Field::Time(fixed(value))
    }
}

impl<Tz: TimeZone> From<Vec<DateTime<Tz>>> for Field {
    fn from(values: Vec<DateTime<Tz>>) -> Self {
        Field::Times(values.into_iter().map(fixed).collect())
    }
}

impl From<Duration> for Field {
    fn from(value: Duration) -> Self {
        Field::Dur(value)
    }
}

impl From<Vec<Duration>> for Field {
    fn from(values: Vec<Duration>) -> Self {
        Field::Durs(values)
    }
}

impl From<&[Duration]> for Field {
    fn from(values: &[Duration]) -> Self {
        Field::Durs(values.to_vec())
    }
}

impl From<serde_json::Value> for Field {
    fn from(value: serde_json::Value) -> Self {
        Field::Object(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn encoded(field: impl Into<Field>) -> String {
        let mut buf = vec![];
        field.into().encode(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encoded("say \"hi\"\n"), r#""say \"hi\"\n""#);
        assert_eq!(encoded(true), "true");
        assert_eq!(encoded(-12i8), "-12");
        assert_eq!(encoded(u64::MAX), "18446744073709551615");
        assert_eq!(encoded(12.32f32), "12.32");
        assert_eq!(encoded(-123.0f64), "-123");
        assert_eq!(encoded(Duration::from_secs(1)), "1000");
    }

    #[test]
    fn test_lists() {
        assert_eq!(encoded(vec!["str1", "str2"]), r#"["str1","str2"]"#);
        assert_eq!(encoded(vec![-123.0f32, 124.1]), "[-123,124.1]");
        assert_eq!(encoded(vec![123u8, 124]), "[123,124]");
        assert_eq!(
            encoded(vec![Duration::from_secs(1), Duration::from_secs(2)]),
            "[1000,2000]"
        );
        assert_eq!(encoded(Vec::<i16>::new()), "[]");
        let empty: &[&str] = &[];
        assert_eq!(encoded(empty), "[]");
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(encoded(f64::NAN), r#""NaN""#);
        assert_eq!(encoded(f32::INFINITY), r#""+Inf""#);
        assert_eq!(encoded(f64::NEG_INFINITY), r#""-Inf""#);
    }

    #[test]
    fn test_time() {
        let zero = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(encoded(zero), r#""0001-01-01T00:00:00Z""#);

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let t = offset.with_ymd_and_hms(2017, 6, 30, 12, 30, 5).unwrap();
        assert_eq!(encoded(vec![t]), r#"["2017-06-30T12:30:05+02:00"]"#);
    }

    #[test]
    fn test_object() {
        let value = json!({"g": {"d": [1, 2, 3], "c": "c"}, "a": "aa"});
        assert_eq!(
            encoded(value),
            r#"{"a":"aa","g":{"c":"c","d":[1,2,3]}}"#
        );

        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }
        assert_eq!(
            encoded(Field::object(&Point { x: 1, y: -1 })),
            r#"{"x":1,"y":-1}"#
        );
    }

    #[test]
    fn test_append_field() {
        let mut buf = vec![];
        append_field(&mut buf, "k\"ey", &Field::from("v"));
        assert_eq!(String::from_utf8(buf).unwrap(), r#","k\"ey":"v""#);
    }
}
