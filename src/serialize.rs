//! Rendering messages back to their wire form.

use crate::escape::{escape_str, StdEscaper};
use crate::message::ServiceMessage;
use crate::properties::properties_to_string;
use crate::{
    ARG_ATTRIBUTE, SERVICE_MESSAGE_END, SERVICE_MESSAGE_START, TAGS_ATTRIBUTE, TAGS_SEPARATOR,
};

/// Render a message.
///
/// An argument with no tags and no other attributes uses the short
/// `##teamcity[name 'argument']` form. Anything else is written as an
/// attribute list starting with `tc:arg`, then `tc:tags`, then the user
/// attributes in insertion order.
pub fn to_wire(message: &ServiceMessage) -> String {
    if let Some(argument) = message.argument() {
        if message.tags().is_empty() && message.attributes().is_empty() {
            return to_wire_with_argument(message.name(), argument);
        }
    }

    let tags = message.tags().join(TAGS_SEPARATOR);
    let mut reserved = Vec::with_capacity(2);
    if let Some(argument) = message.argument() {
        reserved.push((ARG_ATTRIBUTE, argument));
    }
    if !message.tags().is_empty() {
        reserved.push((TAGS_ATTRIBUTE, tags.as_str()));
    }

    to_wire_with_attributes(
        message.name(),
        reserved.into_iter().chain(message.attributes().iter()),
    )
}

/// `##teamcity[name a='1' b='2']`, or `##teamcity[name]` without attributes.
pub fn to_wire_with_attributes<'a, I>(name: &str, attributes: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let attributes = properties_to_string(attributes, &StdEscaper);

    let mut out = String::with_capacity(
        SERVICE_MESSAGE_START.len() + name.len() + 1 + attributes.len() + SERVICE_MESSAGE_END.len(),
    );
    out.push_str(SERVICE_MESSAGE_START);
    out.push_str(name);
    if !attributes.is_empty() {
        out.push(' ');
        out.push_str(&attributes);
    }
    out.push_str(SERVICE_MESSAGE_END);

    out
}

/// `##teamcity[name 'argument']`
pub fn to_wire_with_argument(name: &str, argument: &str) -> String {
    let argument = escape_str(argument, &StdEscaper);

    let mut out = String::with_capacity(
        SERVICE_MESSAGE_START.len() + name.len() + argument.len() + 3 + SERVICE_MESSAGE_END.len(),
    );
    out.push_str(SERVICE_MESSAGE_START);
    out.push_str(name);
    out.push_str(" '");
    out.push_str(&argument);
    out.push('\'');
    out.push_str(SERVICE_MESSAGE_END);

    out
}
