//! The `timestamp` attribute: `yyyy-MM-ddTHH:mm:ss.SSS` optionally followed by
//! a zone offset such as `+0000`, `-07:00` or `Z`.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Timelike};

use crate::error::TimestampError as Error;

/// Length of `yyyy-MM-ddTHH:mm:ss.SSS`, a value of exactly this length has no
/// zone.
pub const LOCAL_FORMAT_LEN: usize = 23;

// get a character from the bytes as a decimal
macro_rules! get_digit {
    ($bytes:ident, $index:expr, $error:ident) => {
        match $bytes.get($index) {
            Some(c) if c.is_ascii_digit() => (c - b'0') as u32,
            _ => return Err(Error::$error),
        }
    };
}

macro_rules! expect_byte {
    ($bytes:ident, $index:expr, $want:expr, $error:ident) => {
        if $bytes.get($index) != Some(&$want) {
            return Err(Error::$error);
        }
    };
}

/// Creation time of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    timezone_specified: bool,
}

impl Timestamp {
    pub fn new(instant: DateTime<FixedOffset>, timezone_specified: bool) -> Self {
        Self {
            instant,
            timezone_specified,
        }
    }

    /// A zoned timestamp that writes back to the same instant, up to
    /// milliseconds. Fails for years outside `0..=9999` and for offsets with
    /// a seconds part.
    pub fn with_zone(instant: DateTime<FixedOffset>) -> Result<Self, Error> {
        if !(0..=9999).contains(&instant.year()) {
            return Err(Error::OutOfRangeYear);
        }
        if instant.offset().local_minus_utc() % 60 != 0 {
            return Err(Error::OutOfRangeTimezone);
        }

        Ok(Self::new(instant, true))
    }

    /// Values without a zone are read as UTC.
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    pub fn is_timezone_specified(&self) -> bool {
        self.timezone_specified
    }

    /// Parse an attribute value. Quoting left over from a date pattern
    /// (`'T'`) is accepted in place of a bare `T`.
    pub fn parse(value: &str) -> Result<Self, Error> {
        let normalized = value.replace("'T'", "T");
        let buf = normalized.as_bytes();

        if buf.len() == LOCAL_FORMAT_LEN {
            let (date, time) = parse_local(buf)?;
            Ok(Self::new(to_datetime(date, time, 0)?, false))
        } else {
            let (date, time) = parse_local(buf)?;
            let offset = parse_offset(buf, LOCAL_FORMAT_LEN)?;
            Ok(Self::new(to_datetime(date, time, offset)?, true))
        }
    }
}

impl fmt::Display for Timestamp {
    /// Writes the attribute form, the zone only when it was specified.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instant = &self.instant;
        // leap seconds carry the extra second in the nanos
        let millis = (instant.nanosecond() / 1_000_000) % 1000;
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            instant.year(),
            instant.month(),
            instant.day(),
            instant.hour(),
            instant.minute(),
            instant.second(),
            millis
        )?;

        if self.timezone_specified {
            let seconds = instant.offset().local_minus_utc();
            let sign = if seconds < 0 { '-' } else { '+' };
            let minutes = seconds.abs() / 60;
            write!(f, "{}{:02}{:02}", sign, minutes / 60, minutes % 60)?;
        }

        Ok(())
    }
}

/// Format `instant` as `yyyy-MM-ddTHH:mm:ss.SSS+hhmm` in its own offset.
///
/// Sub-millisecond precision is dropped. Years outside `0..=9999` and offsets
/// with a seconds part are not representable, see [`Timestamp::with_zone`].
pub fn format_timestamp(instant: &DateTime<FixedOffset>) -> String {
    Timestamp::new(*instant, true).to_string()
}

type Date = (i32, u32, u32);
type Time = (u32, u32, u32, u32);

/// Parse `yyyy-MM-ddTHH:mm:ss.SSS`, the first 23 bytes of `buf`.
fn parse_local(buf: &[u8]) -> Result<(Date, Time), Error> {
    if buf.len() < LOCAL_FORMAT_LEN {
        return Err(Error::TooShort);
    }

    let date = parse_date(buf)?;
    expect_byte!(buf, 10, b'T', InvalidCharDateTimeSep);
    let time = parse_time(buf, 11)?;

    Ok((date, time))
}

fn parse_date(buf: &[u8]) -> Result<Date, Error> {
    let year = get_digit!(buf, 0, InvalidDigit) * 1000
        + get_digit!(buf, 1, InvalidDigit) * 100
        + get_digit!(buf, 2, InvalidDigit) * 10
        + get_digit!(buf, 3, InvalidDigit);
    expect_byte!(buf, 4, b'-', InvalidCharDateTimeSep);

    let month = get_digit!(buf, 5, InvalidDigit) * 10 + get_digit!(buf, 6, InvalidDigit);
    expect_byte!(buf, 7, b'-', InvalidCharDateTimeSep);

    let day = get_digit!(buf, 8, InvalidDigit) * 10 + get_digit!(buf, 9, InvalidDigit);
    let year = year as i32;

    // calculate the maximum number of days in the month, accounting for leap years in the
    // gregorian calendar
    let max_days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => return Err(Error::OutOfRangeMonth),
    };

    if day < 1 || day > max_days {
        return Err(Error::OutOfRangeDay);
    }

    Ok((year, month, day))
}

/// Parse `HH:mm:ss.SSS` starting at `offset`
///     * Hour: 0 to 23
///     * Minute: 0 to 59
///     * Second: 0 to 59
///     * Millisecond: exactly three digits
fn parse_time(buf: &[u8], offset: usize) -> Result<Time, Error> {
    let hour =
        get_digit!(buf, offset, InvalidDigit) * 10 + get_digit!(buf, offset + 1, InvalidDigit);
    if hour > 23 {
        return Err(Error::OutOfRangeHour);
    }
    expect_byte!(buf, offset + 2, b':', InvalidCharDateTimeSep);

    let minute =
        get_digit!(buf, offset + 3, InvalidDigit) * 10 + get_digit!(buf, offset + 4, InvalidDigit);
    if minute > 59 {
        return Err(Error::OutOfRangeMinute);
    }
    expect_byte!(buf, offset + 5, b':', InvalidCharDateTimeSep);

    let second =
        get_digit!(buf, offset + 6, InvalidDigit) * 10 + get_digit!(buf, offset + 7, InvalidDigit);
    if second > 59 {
        return Err(Error::OutOfRangeSecond);
    }
    expect_byte!(buf, offset + 8, b'.', InvalidFraction);

    let millis = get_digit!(buf, offset + 9, InvalidFraction) * 100
        + get_digit!(buf, offset + 10, InvalidFraction) * 10
        + get_digit!(buf, offset + 11, InvalidFraction);

    Ok((hour, minute, second, millis))
}

/// Parse the zone at `position` to seconds east of UTC. Accepts `Z`, `+hhmm`
/// and `+hh:mm`, extra characters at the end are an error.
fn parse_offset(buf: &[u8], mut position: usize) -> Result<i32, Error> {
    let sign = match buf.get(position) {
        Some(b'Z') | Some(b'z') => {
            if buf.len() > position + 1 {
                return Err(Error::ExtraCharacters);
            }
            return Ok(0);
        }
        Some(b'+') => 1,
        Some(b'-') => -1,
        None => return Err(Error::TooShort),
        _ => return Err(Error::InvalidCharTzSign),
    };
    position += 1;

    let h1 = get_digit!(buf, position, InvalidCharTzHour) as i32;
    let h2 = get_digit!(buf, position + 1, InvalidCharTzHour) as i32;

    let m1 = match buf.get(position + 2) {
        Some(b':') => {
            position += 3;
            get_digit!(buf, position, InvalidCharTzMinute) as i32
        }
        Some(c) if c.is_ascii_digit() => {
            position += 2;
            (c - b'0') as i32
        }
        _ => return Err(Error::InvalidCharTzMinute),
    };
    let m2 = get_digit!(buf, position + 1, InvalidCharTzMinute) as i32;

    let minute_seconds = m1 * 600 + m2 * 60;
    if minute_seconds >= 3600 {
        return Err(Error::OutOfRangeTzMinute);
    }

    let offset = sign * (h1 * 36000 + h2 * 3600 + minute_seconds);
    if offset.abs() >= 24 * 3600 {
        return Err(Error::OutOfRangeTimezone);
    }

    if buf.len() > position + 2 {
        return Err(Error::ExtraCharacters);
    }

    Ok(offset)
}

fn to_datetime(date: Date, time: Time, offset: i32) -> Result<DateTime<FixedOffset>, Error> {
    let (year, month, day) = date;
    let (hour, minute, second, millis) = time;

    let offset = FixedOffset::east_opt(offset).ok_or(Error::OutOfRangeTimezone)?;
    let datetime = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(Error::OutOfRangeDay)?
        .and_hms_milli_opt(hour, minute, second, millis)
        .ok_or(Error::OutOfRangeSecond)?;

    offset
        .from_local_datetime(&datetime)
        .single()
        .ok_or(Error::OutOfRangeTimezone)
}
