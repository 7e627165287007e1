//! ISO-8601 temporal newtypes: `Date`, `Time`, `DateTime`, `Duration`.
//!
//! Each type's only behavior beyond equality is formatting to, and parsing
//! from, its canonical ISO-8601 string — the wire shape a `T`-sigil carries.

use std::fmt;

use crate::error::DecodeError;

/// A calendar date, `YYYY-MM-DD`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Date { year, month, day }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A wall-clock time with optional nanosecond precision and UTC offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    /// Offset from UTC in seconds, if this is a timezone-aware time.
    pub offset_seconds: Option<i32>,
}

impl Time {
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Self {
        Time {
            hour,
            minute,
            second,
            nanosecond,
            offset_seconds: None,
        }
    }

    pub fn with_offset(mut self, offset_seconds: i32) -> Self {
        self.offset_seconds = Some(offset_seconds);
        self
    }

    fn fmt_core(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:09}",
            self.hour, self.minute, self.second, self.nanosecond
        )
    }

    fn fmt_offset(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(offset) = self.offset_seconds {
            let sign = if offset < 0 { '-' } else { '+' };
            let abs = offset.unsigned_abs();
            write!(f, "{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)?;
        }
        Ok(())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_core(f)?;
        self.fmt_offset(f)
    }
}

/// A calendar date combined with a wall-clock time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

impl DateTime {
    pub fn new(date: Date, time: Time) -> Self {
        DateTime { date, time }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T", self.date)?;
        self.time.fmt_core(f)?;
        self.time.fmt_offset(f)
    }
}

/// A duration decomposed the way the property-graph type system stores it:
/// months and days kept separate from seconds (since month/day lengths are
/// calendar-dependent and not fungible with a fixed-length second count).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration {
    pub months: i64,
    pub days: i64,
    pub seconds: i64,
    pub nanoseconds: i32,
}

impl Duration {
    pub fn new(months: i64, days: i64, seconds: i64, nanoseconds: i32) -> Self {
        Duration {
            months,
            days,
            seconds,
            nanoseconds,
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}M{}DT{}", self.months, self.days, self.seconds)?;
        if self.nanoseconds != 0 {
            write!(f, ".{:09}", self.nanoseconds.unsigned_abs())?;
        }
        write!(f, "S")
    }
}

/// A decoded ISO-8601 temporal value; the variant the `T` sigil hydrates to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Temporal {
    Date(Date),
    Time(Time),
    DateTime(DateTime),
    Duration(Duration),
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::Date(d) => d.fmt(f),
            Temporal::Time(t) => t.fmt(f),
            Temporal::DateTime(dt) => dt.fmt(f),
            Temporal::Duration(d) => d.fmt(f),
        }
    }
}

fn parse_offset(s: &str) -> Option<(&str, Option<i32>)> {
    if let Some(rest) = s.strip_suffix('Z') {
        return Some((rest, Some(0)));
    }
    // Look for a trailing +HH:MM / -HH:MM past the time-of-day portion.
    // Scan from the end for a sign that isn't the very first character.
    let bytes = s.as_bytes();
    for i in (1..bytes.len()).rev() {
        let c = bytes[i] as char;
        if c == '+' || c == '-' {
            let (head, tail) = s.split_at(i);
            let tail = &tail[1..];
            let mut parts = tail.splitn(2, ':');
            let hh: i32 = parts.next()?.parse().ok()?;
            let mm: i32 = parts.next().unwrap_or("0").parse().ok()?;
            let total = hh * 3600 + mm * 60;
            let signed = if c == '-' { -total } else { total };
            return Some((head, Some(signed)));
        }
    }
    Some((s, None))
}

fn parse_fractional_seconds(s: &str) -> Option<(u8, u32)> {
    let mut parts = s.splitn(2, '.');
    let whole: u8 = parts.next()?.parse().ok()?;
    let nanos = match parts.next() {
        None => 0,
        Some(frac) => {
            let mut digits = frac.to_string();
            while digits.len() < 9 {
                digits.push('0');
            }
            digits.truncate(9);
            digits.parse::<u32>().ok()?
        }
    };
    Some((whole, nanos))
}

fn parse_date(s: &str) -> Option<Date> {
    let mut parts = s.rsplitn(3, '-');
    let day: u8 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(Date::new(year, month, day))
}

fn parse_time(s: &str) -> Option<Time> {
    let (body, offset) = parse_offset(s)?;
    let mut fields = body.splitn(3, ':');
    let hour: u8 = fields.next()?.parse().ok()?;
    let minute: u8 = fields.next()?.parse().ok()?;
    let (second, nanosecond) = match fields.next() {
        Some(sec) => parse_fractional_seconds(sec)?,
        None => (0, 0),
    };
    if hour > 23 || minute > 59 || second > 60 {
        return None;
    }
    let mut time = Time::new(hour, minute, second, nanosecond);
    if let Some(offset) = offset {
        time = time.with_offset(offset);
    }
    Some(time)
}

fn parse_date_time(s: &str) -> Option<DateTime> {
    let (date_part, time_part) = s.split_once('T')?;
    let date = parse_date(date_part)?;
    let time = parse_time(time_part)?;
    Some(DateTime::new(date, time))
}

fn parse_duration(s: &str) -> Option<Duration> {
    let rest = s.strip_prefix('P')?;
    let (date_part, time_part) = rest.split_once('T').unwrap_or((rest, ""));

    let mut months: i64 = 0;
    let mut days: i64 = 0;
    let mut num = String::new();
    for c in date_part.chars() {
        if c.is_ascii_digit() || c == '-' {
            num.push(c);
        } else if c == 'M' {
            months += num.parse::<i64>().ok()?;
            num.clear();
        } else if c == 'D' {
            days += num.parse::<i64>().ok()?;
            num.clear();
        } else {
            return None;
        }
    }
    if !num.is_empty() {
        return None;
    }

    let mut seconds: i64 = 0;
    let mut nanoseconds: i32 = 0;
    if !time_part.is_empty() {
        let rest = time_part.strip_suffix('S')?;
        let (whole, frac) = match rest.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (rest, None),
        };
        seconds = whole.parse().ok()?;
        if let Some(frac) = frac {
            let mut digits = frac.to_string();
            while digits.len() < 9 {
                digits.push('0');
            }
            digits.truncate(9);
            nanoseconds = digits.parse().ok()?;
            if seconds < 0 {
                nanoseconds = -nanoseconds;
            }
        }
    }

    Some(Duration::new(months, days, seconds, nanoseconds))
}

/// Try the Date, Time, DateTime, then Duration patterns, in that order, as
/// §4.4.1 requires.
pub fn parse_temporal(s: &str) -> Result<Temporal, DecodeError> {
    if s.starts_with('P') {
        if let Some(d) = parse_duration(s) {
            return Ok(Temporal::Duration(d));
        }
    } else if s.contains('T') {
        if let Some(dt) = parse_date_time(s) {
            return Ok(Temporal::DateTime(dt));
        }
    } else if s.contains(':') {
        if let Some(t) = parse_time(s) {
            return Ok(Temporal::Time(t));
        }
    } else if let Some(d) = parse_date(s) {
        return Ok(Temporal::Date(d));
    }

    Err(DecodeError::malformed_payload(
        "T",
        "not a recognized ISO-8601 date, time, datetime, or duration",
        &serde_json::Value::String(s.to_string()),
    ))
}
