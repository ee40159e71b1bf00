//! Known message kinds and the table that maps message names to them.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use crate::attributes::Attributes;
use crate::message::ServiceMessage;
use crate::status::Status;

/// Names of the message kinds with a dedicated record type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    ProgressMessage,
    ProgressStart,
    ProgressFinish,
    PublishArtifacts,
    TestSuiteStarted,
    TestSuiteFinished,
    TestStarted,
    TestFailed,
    TestFinished,
    TestIgnored,
    TestStdOut,
    TestStdErr,
    BuildStatus,
    BuildNumber,
    BuildStatisticValue,
    TestNavigationInfo,
    BlockOpened,
    BlockClosed,
    CompilationStarted,
    CompilationFinished,
    MessageWithStatus,
    InternalError,
}

impl MessageKind {
    /// The message name this kind is written with
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::ProgressMessage => "progressMessage",
            MessageKind::ProgressStart => "progressStart",
            MessageKind::ProgressFinish => "progressFinish",
            MessageKind::PublishArtifacts => "publishArtifacts",
            MessageKind::TestSuiteStarted => "testSuiteStarted",
            MessageKind::TestSuiteFinished => "testSuiteFinished",
            MessageKind::TestStarted => "testStarted",
            MessageKind::TestFailed => "testFailed",
            MessageKind::TestFinished => "testFinished",
            MessageKind::TestIgnored => "testIgnored",
            MessageKind::TestStdOut => "testStdOut",
            MessageKind::TestStdErr => "testStdErr",
            MessageKind::BuildStatus => "buildStatus",
            MessageKind::BuildNumber => "buildNumber",
            MessageKind::BuildStatisticValue => "buildStatisticValue",
            MessageKind::TestNavigationInfo => "testNavigationInfo",
            MessageKind::BlockOpened => "blockOpened",
            MessageKind::BlockClosed => "blockClosed",
            MessageKind::CompilationStarted => "compilationStarted",
            MessageKind::CompilationFinished => "compilationFinished",
            MessageKind::MessageWithStatus => "message",
            MessageKind::InternalError => "internalError",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        registry().get(name).map(|(kind, _)| *kind)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! message_kinds {
    ($($(#[$meta:meta])* $kind:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Debug, PartialEq, Eq)]
            pub struct $kind(ServiceMessage);

            impl $kind {
                pub const KIND: MessageKind = MessageKind::$kind;

                fn wrap(message: ServiceMessage) -> Message {
                    Message::$kind($kind(message))
                }

                pub fn into_inner(self) -> ServiceMessage {
                    self.0
                }
            }

            impl Deref for $kind {
                type Target = ServiceMessage;

                fn deref(&self) -> &ServiceMessage {
                    &self.0
                }
            }

            impl DerefMut for $kind {
                fn deref_mut(&mut self) -> &mut ServiceMessage {
                    &mut self.0
                }
            }

            impl From<$kind> for Message {
                fn from(message: $kind) -> Message {
                    Message::$kind(message)
                }
            }
        )+

        /// A parsed message, typed by its name.
        ///
        /// Names without a dedicated record end up as `Generic`.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum Message {
            $($kind($kind),)+
            Generic(ServiceMessage),
        }

        impl Message {
            /// `None` for generic messages.
            pub fn kind(&self) -> Option<MessageKind> {
                match self {
                    $(Message::$kind(_) => Some(MessageKind::$kind),)+
                    Message::Generic(_) => None,
                }
            }

            pub fn as_service_message(&self) -> &ServiceMessage {
                match self {
                    $(Message::$kind(m) => &m.0,)+
                    Message::Generic(m) => m,
                }
            }

            pub fn as_service_message_mut(&mut self) -> &mut ServiceMessage {
                match self {
                    $(Message::$kind(m) => &mut m.0,)+
                    Message::Generic(m) => m,
                }
            }

            pub fn into_service_message(self) -> ServiceMessage {
                match self {
                    $(Message::$kind(m) => m.0,)+
                    Message::Generic(m) => m,
                }
            }
        }

        const FACTORIES: &[(MessageKind, Factory)] = &[
            $((MessageKind::$kind, $kind::wrap),)+
        ];
    };
}

message_kinds! {
    /// `##teamcity[progressMessage '<text>']`
    ProgressMessage,
    /// `##teamcity[progressStart '<text>']`
    ProgressStart,
    /// `##teamcity[progressFinish '<text>']`
    ProgressFinish,
    /// `##teamcity[publishArtifacts '<path>']`
    PublishArtifacts,
    TestSuiteStarted,
    TestSuiteFinished,
    TestStarted,
    TestFailed,
    TestFinished,
    TestIgnored,
    TestStdOut,
    TestStdErr,
    BuildStatus,
    /// `##teamcity[buildNumber '<number>']`
    BuildNumber,
    BuildStatisticValue,
    TestNavigationInfo,
    BlockOpened,
    BlockClosed,
    CompilationStarted,
    CompilationFinished,
    /// `##teamcity[message text='..' status='..' errorDetails='..']`
    MessageWithStatus,
    InternalError,
}

type Factory = fn(ServiceMessage) -> Message;

static REGISTRY: OnceLock<HashMap<&'static str, (MessageKind, Factory)>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, (MessageKind, Factory)> {
    REGISTRY.get_or_init(|| {
        FACTORIES
            .iter()
            .map(|(kind, factory)| (kind.as_str(), (*kind, *factory)))
            .collect()
    })
}

impl From<ServiceMessage> for Message {
    /// Pick the record type registered for the message name. Extra
    /// attributes are kept as they are.
    fn from(message: ServiceMessage) -> Self {
        match registry().get(message.name()) {
            Some((_, factory)) => factory(message),
            None => Message::Generic(message),
        }
    }
}

impl Deref for Message {
    type Target = ServiceMessage;

    fn deref(&self) -> &ServiceMessage {
        self.as_service_message()
    }
}

impl DerefMut for Message {
    fn deref_mut(&mut self) -> &mut ServiceMessage {
        self.as_service_message_mut()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_service_message(), f)
    }
}

fn build(kind: MessageKind, attributes: Attributes) -> ServiceMessage {
    ServiceMessage::with_plain_attributes(kind.as_str(), attributes)
}

fn argument_message(kind: MessageKind, argument: &str) -> ServiceMessage {
    ServiceMessage::with_argument(kind.as_str(), argument)
}

impl ProgressMessage {
    pub fn new(text: &str) -> Self {
        Self(argument_message(Self::KIND, text))
    }

    pub fn text(&self) -> Option<&str> {
        self.argument()
    }
}

impl ProgressStart {
    pub fn new(text: &str) -> Self {
        Self(argument_message(Self::KIND, text))
    }

    pub fn text(&self) -> Option<&str> {
        self.argument()
    }
}

impl ProgressFinish {
    pub fn new(text: &str) -> Self {
        Self(argument_message(Self::KIND, text))
    }

    pub fn text(&self) -> Option<&str> {
        self.argument()
    }
}

impl PublishArtifacts {
    pub fn new(path: &str) -> Self {
        Self(argument_message(Self::KIND, path))
    }

    pub fn path(&self) -> Option<&str> {
        self.argument()
    }
}

impl BuildNumber {
    pub fn new(number: &str) -> Self {
        Self(argument_message(Self::KIND, number))
    }

    pub fn number(&self) -> Option<&str> {
        self.argument()
    }
}

impl TestSuiteStarted {
    pub fn new(suite_name: &str) -> Self {
        Self(build(Self::KIND, [("name", suite_name)].into_iter().collect()))
    }

    pub fn suite_name(&self) -> Option<&str> {
        self.attribute("name")
    }
}

impl TestSuiteFinished {
    pub fn new(suite_name: &str) -> Self {
        Self(build(Self::KIND, [("name", suite_name)].into_iter().collect()))
    }

    pub fn suite_name(&self) -> Option<&str> {
        self.attribute("name")
    }
}

fn test_attributes<'a>(name: &'a str, rest: &[(&'a str, &'a str)]) -> Attributes {
    let mut attributes = Attributes::with_capacity(rest.len() + 1);
    attributes.insert("name", name);
    attributes.extend(rest.iter().copied());
    attributes
}

impl TestStarted {
    pub fn new(name: &str, capture_standard_output: bool, location_hint: Option<&str>) -> Self {
        let mut attributes = test_attributes(name, &[]);
        if capture_standard_output {
            attributes.insert("captureStandardOutput", "true");
        }
        if let Some(hint) = location_hint {
            attributes.insert("locationHint", hint);
        }

        Self(build(Self::KIND, attributes))
    }

    pub fn test_name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn capture_standard_output(&self) -> bool {
        self.attribute("captureStandardOutput")
            .map_or(false, |v| v.eq_ignore_ascii_case("true"))
    }

    pub fn location_hint(&self) -> Option<&str> {
        self.attribute("locationHint")
    }
}

impl TestFailed {
    pub fn new(name: &str, message: Option<&str>, details: Option<&str>) -> Self {
        let mut attributes = test_attributes(name, &[]);
        if let Some(message) = message {
            attributes.insert("message", message);
        }
        if let Some(details) = details {
            attributes.insert("details", details);
        }

        Self(build(Self::KIND, attributes))
    }

    /// A failure carrying `expected` and `actual` values.
    pub fn comparison(name: &str, message: &str, expected: &str, actual: &str) -> Self {
        let attributes = test_attributes(
            name,
            &[
                ("message", message),
                ("type", "comparisonFailure"),
                ("expected", expected),
                ("actual", actual),
            ],
        );

        Self(build(Self::KIND, attributes))
    }

    pub fn test_name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn is_comparison_failure(&self) -> bool {
        self.attribute("type") == Some("comparisonFailure")
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.attribute("message")
    }

    pub fn stacktrace(&self) -> Option<&str> {
        self.attribute("details")
    }

    pub fn expected(&self) -> Option<&str> {
        self.attribute("expected")
    }

    pub fn actual(&self) -> Option<&str> {
        self.attribute("actual")
    }
}

impl TestFinished {
    pub fn new(name: &str, duration: u64) -> Self {
        let duration = duration.to_string();
        Self(build(
            Self::KIND,
            test_attributes(name, &[("duration", duration.as_str())]),
        ))
    }

    pub fn test_name(&self) -> Option<&str> {
        self.attribute("name")
    }

    /// Duration in milliseconds, `None` when missing or not a number.
    pub fn duration(&self) -> Option<u64> {
        self.attribute("duration")?.parse().ok()
    }
}

impl TestIgnored {
    pub fn new(name: &str, comment: &str) -> Self {
        Self(build(Self::KIND, test_attributes(name, &[("message", comment)])))
    }

    pub fn test_name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn ignore_comment(&self) -> Option<&str> {
        self.attribute("message")
    }
}

impl TestStdOut {
    pub fn new(name: &str, output: &str) -> Self {
        Self(build(Self::KIND, test_attributes(name, &[("out", output)])))
    }

    pub fn test_name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn output(&self) -> Option<&str> {
        self.attribute("out")
    }
}

impl TestStdErr {
    pub fn new(name: &str, output: &str) -> Self {
        Self(build(Self::KIND, test_attributes(name, &[("out", output)])))
    }

    pub fn test_name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn output(&self) -> Option<&str> {
        self.attribute("out")
    }
}

impl TestNavigationInfo {
    pub fn new(test_name: &str, location_hint: &str) -> Self {
        Self(build(
            Self::KIND,
            [("testName", test_name), ("locationHint", location_hint)]
                .into_iter()
                .collect(),
        ))
    }

    pub fn test_name(&self) -> Option<&str> {
        self.attribute("testName")
    }

    pub fn location_hint(&self) -> Option<&str> {
        self.attribute("locationHint")
    }
}

impl BuildStatus {
    /// `status` is usually `SUCCESS` or `FAILURE`; `text` may reference the
    /// previous status text as `{build.status.text}`.
    pub fn new(text: &str, status: &str) -> Self {
        Self(build(
            Self::KIND,
            [("status", status), ("text", text)].into_iter().collect(),
        ))
    }

    pub fn status(&self) -> Option<&str> {
        self.attribute("status")
    }

    pub fn text(&self) -> Option<&str> {
        self.attribute("text")
    }
}

impl BuildStatisticValue {
    pub fn new(key: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        Self(build(
            Self::KIND,
            [("key", key), ("value", value.as_str())].into_iter().collect(),
        ))
    }

    pub fn key(&self) -> Option<&str> {
        self.attribute("key")
    }

    pub fn value(&self) -> Option<&str> {
        self.attribute("value")
    }
}

impl BlockOpened {
    pub fn new(name: &str, description: Option<&str>) -> Self {
        let mut attributes = Attributes::with_capacity(2);
        attributes.insert("name", name);
        if let Some(description) = description {
            attributes.insert("description", description);
        }

        Self(build(Self::KIND, attributes))
    }

    pub fn block_name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.attribute("description")
    }
}

impl BlockClosed {
    pub fn new(name: &str) -> Self {
        Self(build(Self::KIND, [("name", name)].into_iter().collect()))
    }

    pub fn block_name(&self) -> Option<&str> {
        self.attribute("name")
    }
}

impl CompilationStarted {
    pub fn new(compiler: &str) -> Self {
        Self(build(Self::KIND, [("compiler", compiler)].into_iter().collect()))
    }

    pub fn compiler(&self) -> Option<&str> {
        self.attribute("compiler")
    }
}

impl CompilationFinished {
    pub fn new(compiler: &str) -> Self {
        Self(build(Self::KIND, [("compiler", compiler)].into_iter().collect()))
    }

    pub fn compiler(&self) -> Option<&str> {
        self.attribute("compiler")
    }
}

impl MessageWithStatus {
    pub fn new(text: &str, status: Status, error_details: Option<&str>) -> Self {
        let mut attributes = Attributes::with_capacity(3);
        attributes.insert("text", text);
        attributes.insert("status", status.as_str());
        if let Some(details) = error_details {
            attributes.insert("errorDetails", details);
        }

        Self(build(Self::KIND, attributes))
    }

    pub fn text(&self) -> Option<&str> {
        self.attribute("text")
    }

    /// The raw `status` attribute, `NORMAL` when absent.
    pub fn status(&self) -> &str {
        self.attribute("status").unwrap_or(Status::NORMAL.as_str())
    }

    /// [`MessageWithStatus::status`] as a [`Status`], `None` when unrecognized.
    pub fn status_level(&self) -> Option<Status> {
        Status::from_name(self.status())
    }

    pub fn error_details(&self) -> Option<&str> {
        self.attribute("errorDetails")
    }
}

impl InternalError {
    pub fn new(cause: &str) -> Self {
        Self(build(Self::KIND, [("cause", cause)].into_iter().collect()))
    }

    pub fn cause(&self) -> Option<&str> {
        self.attribute("cause")
    }
}
