//! Parser and writer for TeamCity service messages, the
//! `##teamcity[name attr='value']` lines build tools print to talk to a
//! build server.
//!
//! Messages may appear anywhere in ordinary output. [`parse_mixed`] (or the
//! lazy [`events`] iterator) splits such text into plain text, parsed
//! messages and spans that looked like messages but did not parse. A single
//! message is handled by [`parse_message`], and any message renders back to
//! its wire form through `Display`.
//!
//! # Example
//!
//! ```
//! use servicemsg::{events, Event, Message};
//!
//! let output = "compiling\n##teamcity[testStarted name='it|'s fine']\ndone";
//! for event in events(output) {
//!     match event {
//!         Event::Text(text) => print!("{text}"),
//!         Event::Message(Message::TestStarted(started)) => {
//!             assert_eq!(started.test_name(), Some("it's fine"));
//!         }
//!         Event::Message(other) => println!("{other}"),
//!         Event::Error { text, error } => eprintln!("{text}: {error}"),
//!     }
//! }
//! ```
//!
//! # Wire format
//!
//!  * Values are quoted with `'` and escaped with `|`: `|n`, `|r`, `|x`
//!    (U+0085), `|l` (U+2028), `|p` (U+2029), `||`, `|'`, `|[` and `|]`.
//!  * `##teamcity[name 'text']` is a message with a single unnamed argument.
//!  * Attributes starting with `tc:` are reserved: `tc:arg` holds the argument
//!    when tags are present, `tc:tags` a comma separated tag list.
//!

mod attributes;
mod error;
pub mod escape;
mod handler;
pub mod kinds;
mod message;
mod parser;
pub mod properties;
pub mod scanner;
pub mod serialize;
mod status;
mod timestamp;
mod visitor;

pub use attributes::Attributes;
pub use error::{Error, Result, TimestampError};
pub use escape::{escape_str, unescape_str, Escaper, StdEscaper};
pub use handler::{Handler, Handlers};
pub use kinds::{Message, MessageKind};
pub use message::{is_reserved_name, ServiceMessage};
pub use parser::{
    events, parse_message, parse_mixed, parse_service_message, parse_span, Event, Events,
    ParserCallback,
};
pub use scanner::{split_text, split_to_potential_messages, Segment};
pub use status::Status;
pub use timestamp::{format_timestamp, Timestamp};
pub use visitor::Visitor;

pub const SERVICE_MESSAGE_START: &str = "##teamcity[";
pub const SERVICE_MESSAGE_END: &str = "]";

pub const TAGS_SEPARATOR: &str = ",";
pub const RESERVED_ATTRIBUTE_PREFIX: &str = "tc:";
pub const ARG_ATTRIBUTE: &str = "tc:arg";
pub const TAGS_ATTRIBUTE: &str = "tc:tags";
pub const TIMESTAMP_ATTRIBUTE: &str = "timestamp";
pub const FLOW_ID_ATTRIBUTE: &str = "flowId";

/// Name of the message that switches service message processing on in a
/// build log. It has no record type of its own.
pub const ENABLE: &str = "enableServiceMessages";
/// Counterpart of [`ENABLE`].
pub const DISABLE: &str = "disableServiceMessages";
