//! Property-based tests for the escape codec and the wire round trip.

use proptest::prelude::*;
use servicemsg::{escape_str, parse_message, unescape_str, ServiceMessage, StdEscaper};

/// Strings biased towards the characters that need escaping.
fn text_strategy() -> impl Strategy<Value = String> {
    let special = prop_oneof![
        Just('|'),
        Just('\''),
        Just('['),
        Just(']'),
        Just('\n'),
        Just('\r'),
        Just('\u{85}'),
        Just('\u{2028}'),
        Just('\u{2029}'),
    ];
    let any = any::<char>();

    prop::collection::vec(prop_oneof![special, any], 0..32)
        .prop_map(|chars| chars.into_iter().collect())
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_$][a-zA-Z0-9_$]{0,10}".prop_filter("timestamp is decoded", |name| {
        name != "timestamp"
    })
}

fn tag_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.:-]{1,8}"
}

fn record_strategy() -> impl Strategy<Value = ServiceMessage> {
    (
        identifier_strategy(),
        prop::collection::vec((identifier_strategy(), text_strategy()), 0..4),
        prop::option::of(text_strategy()),
        prop::collection::vec(tag_strategy(), 0..3),
    )
        .prop_map(|(name, mut attributes, argument, tags)| {
            if let Some(argument) = argument {
                attributes.push(("tc:arg".to_string(), argument));
            }
            match ServiceMessage::with_attributes(name, attributes) {
                Ok(record) => record.with_tags(tags),
                Err(err) => panic!("no timestamp attribute is generated: {err}"),
            }
        })
}

proptest! {
    #[test]
    fn unescape_inverts_escape(s in text_strategy()) {
        let escaped = escape_str(&s, &StdEscaper);
        prop_assert_eq!(unescape_str(&escaped, &StdEscaper), s.as_str());
    }

    #[test]
    fn escaped_text_has_no_bare_delimiters(s in text_strategy()) {
        let escaped = escape_str(&s, &StdEscaper);
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            match c {
                '|' => prop_assert!(chars.next().is_some()),
                '\'' | '[' | ']' | '\n' | '\r' => {
                    prop_assert!(false, "bare {:?} in {:?}", c, escaped)
                }
                _ => {}
            }
        }
    }

    #[test]
    fn record_round_trip(record in record_strategy()) {
        let wire = record.to_string();
        let parsed = parse_message(&wire)
            .map_err(|err| TestCaseError::fail(format!("{wire}: {err}")))?
            .ok_or_else(|| TestCaseError::fail(format!("not a message: {wire}")))?;

        prop_assert_eq!(parsed.as_service_message(), &record);
    }
}
