use tracing::debug;

use crate::attributes::Attributes;
use crate::error::{Error, Result};
use crate::escape::{index_of, unescape_str, StdEscaper};
use crate::kinds::Message;
use crate::message::{is_reserved_name, ServiceMessage};
use crate::properties::{is_valid_identifier, string_to_properties, NameCheck};
use crate::scanner::{split_text, Segment, Segments};
use crate::{SERVICE_MESSAGE_END, SERVICE_MESSAGE_START};

// `rest` is the part of a span after the message name.

/// Parse text holding exactly one message, `##teamcity[...]`.
///
/// Returns `Ok(None)` when the text does not start with `##teamcity[` and end
/// with `]`, and an error when it does but the interior is malformed.
///
/// # Example
///
/// ```
/// use servicemsg::{parse_message, Message};
///
/// let message = parse_message("##teamcity[testStarted name='smoke']").unwrap().unwrap();
/// match message {
///     Message::TestStarted(started) => assert_eq!(started.test_name(), Some("smoke")),
///     _ => unreachable!(),
/// }
/// ```
pub fn parse_message(text: &str) -> Result<Option<Message>> {
    match text
        .strip_prefix(SERVICE_MESSAGE_START)
        .and_then(|rest| rest.strip_suffix(SERVICE_MESSAGE_END))
    {
        Some(span) => parse_span(span.trim()).map(Some),
        None => Ok(None),
    }
}

/// Parse the interior of one message span into the record registered for
/// its name.
pub fn parse_span(span: &str) -> Result<Message> {
    parse_service_message(span).map(Message::from)
}

/// Parse the interior of one message span into a generic record.
pub fn parse_service_message(span: &str) -> Result<ServiceMessage> {
    let (name, rest) = match span.split_once(' ') {
        Some((name, rest)) => (name, Some(rest.trim())),
        None => (span, None),
    };

    match rest {
        None => Ok(ServiceMessage::new(name)),
        Some(rest) if rest.starts_with('\'') => {
            Ok(ServiceMessage::with_argument(name, parse_argument(rest)?))
        }
        Some(rest) => ServiceMessage::with_attributes(name, parse_attributes(rest)?),
    }
}

/// `'escaped text'`, nothing may follow the closing quote.
fn parse_argument(rest: &str) -> Result<String> {
    let quoted = rest
        .strip_prefix('\'')
        .ok_or_else(|| Error::InvalidArgument(rest.to_string()))?;
    let end = index_of(quoted, '\'', &StdEscaper)
        .ok_or_else(|| Error::InvalidArgument(rest.to_string()))?;

    if !quoted[end + 1..].trim().is_empty() {
        return Err(Error::InvalidArgument(rest.to_string()));
    }

    Ok(unescape_str(&quoted[..end], &StdEscaper).into_owned())
}

/// `a='1' b='2'`. Names must be identifiers unless they are reserved
/// `tc:` names.
fn parse_attributes(rest: &str) -> Result<Attributes> {
    let attributes = string_to_properties(rest, &StdEscaper, NameCheck::NoSpaces)?;

    if let Some(name) = attributes
        .names()
        .find(|name| !is_reserved_name(name) && !is_valid_identifier(name))
    {
        return Err(Error::InvalidAttributeName(name.to_string()));
    }

    Ok(attributes)
}

/// Receives the pieces of a mixed text, in order.
pub trait ParserCallback {
    fn regular_text(&mut self, text: &str);

    fn service_message(&mut self, message: Message);

    /// `text` is the failed span with its delimiters.
    fn parse_error(&mut self, error: Error, text: &str);
}

/// One piece of a parsed mixed text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event<'a> {
    Text(&'a str),
    Message(Message),
    /// A span that looked like a message but did not parse.
    Error { text: String, error: Error },
}

/// Iterator over the [`Event`]s of a text, see [`events`].
#[derive(Clone, Debug)]
pub struct Events<'a> {
    segments: Segments<'a>,
}

impl<'a> Iterator for Events<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = match self.segments.next()? {
            Segment::Text(text) => Event::Text(text),
            Segment::Message(span) => match parse_span(span) {
                Ok(message) => Event::Message(message),
                Err(error) => {
                    debug!(text = span, %error, "failed to parse service message");
                    Event::Error {
                        text: format!("{SERVICE_MESSAGE_START}{span}{SERVICE_MESSAGE_END}"),
                        error,
                    }
                }
            },
        };

        Some(event)
    }
}

/// Lazily parse every message found in `text`. Malformed messages are
/// reported as [`Event::Error`] and scanning carries on after them.
pub fn events(text: &str) -> Events<'_> {
    Events {
        segments: split_text(text),
    }
}

/// Parse a text that may contain messages anywhere, feeding `callback`
/// with plain text, parsed messages and parse failures in input order.
pub fn parse_mixed<C: ParserCallback + ?Sized>(text: &str, callback: &mut C) {
    for event in events(text) {
        match event {
            Event::Text(text) => callback.regular_text(text),
            Event::Message(message) => callback.service_message(message),
            Event::Error { text, error } => callback.parse_error(error, &text),
        }
    }
}
