//! In-memory representation of a single service message.

use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::attributes::Attributes;
use crate::error::{Error, Result};
use crate::properties::is_valid_identifier;
use crate::timestamp::{format_timestamp, Timestamp};
use crate::{
    ARG_ATTRIBUTE, FLOW_ID_ATTRIBUTE, RESERVED_ATTRIBUTE_PREFIX, TAGS_ATTRIBUTE, TAGS_SEPARATOR,
    TIMESTAMP_ATTRIBUTE,
};

/// A `##teamcity[...]` message of any kind.
///
/// Reserved `tc:` attributes are pulled out of the attribute map on
/// construction: `tc:arg` becomes the argument and `tc:tags` the tag list.
/// `timestamp` and `flowId` stay in the map and are also decoded into their
/// own fields.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceMessage {
    name: String,
    attributes: Attributes,
    argument: Option<String>,
    tags: Vec<String>,
    timestamp: Option<Timestamp>,
    flow_id: Option<String>,
}

impl ServiceMessage {
    /// A message with a name only, `##teamcity[name]`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            argument: None,
            tags: Vec::new(),
            timestamp: None,
            flow_id: None,
        }
    }

    /// A message with a single argument, `##teamcity[name 'argument']`.
    pub fn with_argument(name: impl Into<String>, argument: impl Into<String>) -> Self {
        let mut message = Self::new(name);
        message.argument = Some(argument.into());
        message
    }

    /// A message with attributes, `##teamcity[name a='1' b='2']`.
    ///
    /// Fails only when a `timestamp` attribute is present and malformed.
    pub fn with_attributes<I, K, V>(name: impl Into<String>, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut message = Self::new(name);
        message.set_attributes(attributes)?;
        Ok(message)
    }

    /// Build from attributes known to hold no reserved names.
    pub(crate) fn with_plain_attributes(name: &str, attributes: Attributes) -> Self {
        debug_assert!(attributes.names().all(|n| !is_derived_name(n)));

        let mut message = Self::new(name);
        message.attributes = attributes;
        message
    }

    /// Replace all attributes. Every derived field is reset first, then the
    /// reserved attributes are extracted again.
    pub fn set_attributes<I, K, V>(&mut self, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.reset();
        self.attributes.extend(attributes);
        self.extract_reserved()
    }

    /// Attach tags, replacing any present.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// User attributes, reserved `tc:` names removed.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    pub fn flow_id(&self) -> Option<&str> {
        self.flow_id.as_deref()
    }

    /// Stamp the message; the value is written with its zone.
    ///
    /// Fails, leaving the message untouched, when the instant has no exact
    /// attribute form (see [`Timestamp::with_zone`]).
    pub fn set_timestamp(&mut self, instant: DateTime<FixedOffset>) -> Result<()> {
        let timestamp = Timestamp::with_zone(instant).map_err(|source| Error::InvalidTimestamp {
            value: format_timestamp(&instant),
            source,
        })?;

        self.attributes
            .insert(TIMESTAMP_ATTRIBUTE, timestamp.to_string());
        self.timestamp = Some(timestamp);
        Ok(())
    }

    pub fn set_flow_id(&mut self, flow_id: impl Into<String>) {
        let flow_id = flow_id.into();
        self.attributes.insert(FLOW_ID_ATTRIBUTE, flow_id.clone());
        self.flow_id = Some(flow_id);
    }

    fn reset(&mut self) {
        self.attributes.clear();
        self.argument = None;
        self.tags.clear();
        self.timestamp = None;
        self.flow_id = None;
    }

    fn extract_reserved(&mut self) -> Result<()> {
        if let Some(argument) = self.attributes.remove(ARG_ATTRIBUTE) {
            self.argument = Some(argument);
        }

        if let Some(tags) = self.attributes.remove(TAGS_ATTRIBUTE) {
            self.tags = split_tags(&tags);
        }

        self.timestamp = match self.attributes.get(TIMESTAMP_ATTRIBUTE) {
            Some(value) => Some(Timestamp::parse(value).map_err(|source| {
                Error::InvalidTimestamp {
                    value: value.to_string(),
                    source,
                }
            })?),
            None => None,
        };

        self.flow_id = self.attributes.get(FLOW_ID_ATTRIBUTE).map(str::to_string);

        Ok(())
    }
}

impl fmt::Display for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serialize::to_wire(self))
    }
}

/// `tc:` followed by an identifier. Such names skip the strict attribute name
/// check so newer reserved attributes pass through untouched.
pub fn is_reserved_name(name: &str) -> bool {
    name.strip_prefix(RESERVED_ATTRIBUTE_PREFIX)
        .map_or(false, is_valid_identifier)
}

fn is_derived_name(name: &str) -> bool {
    matches!(
        name,
        ARG_ATTRIBUTE | TAGS_ATTRIBUTE | TIMESTAMP_ATTRIBUTE | FLOW_ID_ATTRIBUTE
    )
}

// Empty tokens between separators are skipped, the rest trimmed.
fn split_tags(tags: &str) -> Vec<String> {
    tags.split(TAGS_SEPARATOR)
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn reserved_extraction() {
        let msg = ServiceMessage::with_attributes(
            "testStarted",
            [
                ("name", "t1"),
                ("tc:arg", "payload"),
                ("tc:tags", "a, b ,,c"),
                ("flowId", "42"),
                ("tc:future", "kept"),
            ],
        )
        .unwrap();

        assert_eq!(msg.argument(), Some("payload"));
        assert_eq!(msg.tags(), ["a", "b", "c"]);
        assert_eq!(msg.flow_id(), Some("42"));
        assert_eq!(msg.attribute("tc:arg"), None);
        assert_eq!(msg.attribute("tc:tags"), None);
        assert_eq!(msg.attribute("flowId"), Some("42"));
        assert_eq!(msg.attribute("tc:future"), Some("kept"));
        assert_eq!(
            msg.attributes().names().collect::<Vec<_>>(),
            vec!["name", "flowId", "tc:future"]
        );
    }

    #[test]
    fn timestamp_attribute() {
        let msg =
            ServiceMessage::with_attributes("m", [("timestamp", "2024-01-02T03:04:05.006+0000")])
                .unwrap();
        assert!(msg.timestamp().unwrap().is_timezone_specified());
        assert_eq!(
            msg.attribute("timestamp"),
            Some("2024-01-02T03:04:05.006+0000")
        );

        let err = ServiceMessage::with_attributes("m", [("timestamp", "yesterday")]).unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { ref value, .. } if value == "yesterday"));
    }

    #[test]
    fn set_attributes_resets() {
        let mut msg = ServiceMessage::with_attributes(
            "m",
            [
                ("tc:arg", "x"),
                ("tc:tags", "t"),
                ("flowId", "1"),
                ("timestamp", "2024-01-02T03:04:05.006"),
            ],
        )
        .unwrap();

        msg.set_attributes([("a", "1")]).unwrap();
        assert_eq!(msg.argument(), None);
        assert!(msg.tags().is_empty());
        assert_eq!(msg.flow_id(), None);
        assert!(msg.timestamp().is_none());
        assert_eq!(msg.attributes().len(), 1);
    }

    #[test]
    fn setters() {
        let mut msg = ServiceMessage::new("m");
        let instant = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap();
        msg.set_timestamp(instant).unwrap();
        msg.set_flow_id("f1");
        msg.set_flow_id("f2");

        assert_eq!(
            msg.attribute("timestamp"),
            Some("2024-01-02T03:04:05.000+0000")
        );
        assert_eq!(msg.timestamp().unwrap().instant(), instant);
        assert_eq!(msg.flow_id(), Some("f2"));
        assert_eq!(msg.attributes().len(), 2);
    }

    #[test]
    fn unwritable_timestamp_rejected() {
        let mut msg = ServiceMessage::new("m");
        let instant = FixedOffset::east_opt(90)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap();

        let err = msg.set_timestamp(instant).unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
        assert!(msg.timestamp().is_none());
        assert!(msg.attributes().is_empty());
    }

    #[test]
    fn reserved_names() {
        assert!(is_reserved_name("tc:tags"));
        assert!(is_reserved_name("tc:anything_new"));
        assert!(!is_reserved_name("tc:"));
        assert!(!is_reserved_name("tc:1x"));
        assert!(!is_reserved_name("tags"));
    }
}
