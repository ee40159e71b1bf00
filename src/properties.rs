//! `name1='value1' name2='value2'` attribute lists.

use crate::attributes::Attributes;
use crate::error::{Error, Result};
use crate::escape::{escape_str, index_of, unescape_str, Escaper};

/// How attribute names are validated while decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameCheck {
    /// Names must be identifiers, see [`is_valid_identifier`].
    #[default]
    Strict,
    /// Any name without a space is accepted.
    NoSpaces,
}

impl NameCheck {
    fn check(self, name: &str) -> Result<()> {
        let valid = match self {
            NameCheck::Strict => is_valid_identifier(name),
            NameCheck::NoSpaces => !name.contains(' '),
        };

        if valid {
            Ok(())
        } else {
            Err(Error::InvalidPropertyName(name.to_string()))
        }
    }
}

/// An ASCII letter, `_` or `$`, followed by any number of ASCII letters,
/// digits, `_` or `$`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => {}
        _ => return false,
    }

    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
}

/// Encode pairs as `name='value'` separated by single spaces. Names and
/// values are both escaped.
pub fn properties_to_string<'a, I, E>(props: I, escaper: &E) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
    E: Escaper,
{
    let mut out = String::new();
    for (name, value) in props {
        if !out.is_empty() {
            out.push(' ');
        }

        out.push_str(&escape_str(name, escaper));
        out.push('=');
        out.push('\'');
        out.push_str(&escape_str(value, escaper));
        out.push('\'');
    }

    out
}

/// Decode `name1='value1' name2='value2' ...` with strict name checks.
pub fn string_to_properties_strict<E: Escaper>(input: &str, escaper: &E) -> Result<Attributes> {
    string_to_properties(input, escaper, NameCheck::Strict)
}

/// Decode `name1='value1' name2='value2' ...`.
///
/// A name seen twice keeps its first position and takes the last value.
pub fn string_to_properties<E: Escaper>(
    input: &str,
    escaper: &E,
    names: NameCheck,
) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    let mut rest = input;

    while !rest.is_empty() {
        let sep = rest
            .find('=')
            .ok_or_else(|| Error::MissingValue(rest.to_string()))?;
        let name = rest[..sep].trim();
        names.check(name)?;

        rest = rest[sep + 1..].trim();
        let quoted = rest
            .strip_prefix('\'')
            .ok_or_else(|| Error::ExpectedOpeningQuote(rest.to_string()))?;

        let end = index_of(quoted, '\'', escaper)
            .ok_or_else(|| Error::UnterminatedValue(rest.to_string()))?;
        let value = unescape_str(&quoted[..end], escaper);
        attributes.insert(name, value);

        rest = quoted[end + 1..].trim();
    }

    Ok(attributes)
}
