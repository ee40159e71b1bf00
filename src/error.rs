use thiserror::Error;

/// Grammar failures raised while decoding a service message span.
///
/// Every variant carries the fragment that could not be parsed so callers can
/// report it next to the original text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("property value not found in `{0}`")]
    MissingValue(String),
    #[error("incorrect property name `{0}`")]
    InvalidPropertyName(String),
    #[error("value should start with \"'\": `{0}`")]
    ExpectedOpeningQuote(String),
    #[error("value should end with \"'\": `{0}`")]
    UnterminatedValue(String),
    #[error("invalid attribute name: {0}")]
    InvalidAttributeName(String),
    #[error("cannot extract text message [{0}]")]
    InvalidArgument(String),
    #[error("invalid timestamp `{value}`: {source}")]
    InvalidTimestamp {
        value: String,
        source: TimestampError,
    },
}

/// Field level failures of the `timestamp` attribute parser.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp too short")]
    TooShort,
    #[error("invalid date or time separator")]
    InvalidCharDateTimeSep,
    #[error("invalid character in numeric field")]
    InvalidDigit,
    #[error("year out of range")]
    OutOfRangeYear,
    #[error("month out of range")]
    OutOfRangeMonth,
    #[error("day out of range")]
    OutOfRangeDay,
    #[error("hour out of range")]
    OutOfRangeHour,
    #[error("minute out of range")]
    OutOfRangeMinute,
    #[error("second out of range")]
    OutOfRangeSecond,
    #[error("fraction of second must have exactly 3 digits")]
    InvalidFraction,
    #[error("invalid timezone sign")]
    InvalidCharTzSign,
    #[error("invalid timezone hour")]
    InvalidCharTzHour,
    #[error("invalid timezone minute")]
    InvalidCharTzMinute,
    #[error("timezone minute out of range")]
    OutOfRangeTzMinute,
    #[error("timezone out of range")]
    OutOfRangeTimezone,
    #[error("unexpected characters after timestamp")]
    ExtraCharacters,
}

pub type Result<T> = std::result::Result<T, Error>;
