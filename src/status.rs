use std::fmt;

/// Build and message status, ordered by priority.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
pub enum Status {
    UNKNOWN = 0,
    NORMAL = 1,
    WARNING = 2,
    FAILURE = 3,
    ERROR = 4,
}

const ALL: [Status; 5] = [
    Status::UNKNOWN,
    Status::NORMAL,
    Status::WARNING,
    Status::FAILURE,
    Status::ERROR,
];

impl Status {
    /// Any priority outside `1..=4` is `UNKNOWN`.
    pub fn from_priority(priority: i32) -> Self {
        match priority {
            1 => Status::NORMAL,
            2 => Status::WARNING,
            3 => Status::FAILURE,
            4 => Status::ERROR,
            _ => Status::UNKNOWN,
        }
    }

    /// Look a status up by its name or by its display text, so both `NORMAL`
    /// and `SUCCESS` give `NORMAL`.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL.into_iter()
            .find(|status| status.as_str() == name || status.text() == name)
    }

    pub fn priority(self) -> u8 {
        self as u8
    }

    /// Convert a status into its wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Status::UNKNOWN => "UNKNOWN",
            Status::NORMAL => "NORMAL",
            Status::WARNING => "WARNING",
            Status::FAILURE => "FAILURE",
            Status::ERROR => "ERROR",
        }
    }

    /// Like [`Status::as_str`], but `NORMAL` reads `SUCCESS`.
    pub fn text(self) -> &'static str {
        match self {
            Status::NORMAL => "SUCCESS",
            other => other.as_str(),
        }
    }

    pub fn is_successful(self) -> bool {
        self <= Status::WARNING && self != Status::UNKNOWN
    }

    pub fn is_failed(self) -> bool {
        self > Status::WARNING
    }

    pub fn is_ignored(self) -> bool {
        self == Status::UNKNOWN
    }

    pub fn above(self, other: Status) -> bool {
        self > other
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Status;

    #[test]
    fn names() {
        assert_eq!(Status::NORMAL.as_str(), "NORMAL");
        assert_eq!(Status::NORMAL.text(), "SUCCESS");
        assert_eq!(Status::FAILURE.text(), "FAILURE");
        assert_eq!(Status::from_name("SUCCESS"), Some(Status::NORMAL));
        assert_eq!(Status::from_name("NORMAL"), Some(Status::NORMAL));
        assert_eq!(Status::from_name("ERROR"), Some(Status::ERROR));
        assert_eq!(Status::from_name("error"), None);
    }

    #[test]
    fn priorities() {
        assert_eq!(Status::from_priority(3), Status::FAILURE);
        assert_eq!(Status::from_priority(42), Status::UNKNOWN);
        assert_eq!(Status::ERROR.priority(), 4);
        assert!(Status::ERROR.above(Status::FAILURE));
        assert!(!Status::NORMAL.above(Status::NORMAL));
    }

    #[test]
    fn predicates() {
        assert!(Status::NORMAL.is_successful());
        assert!(Status::WARNING.is_successful());
        assert!(!Status::UNKNOWN.is_successful());
        assert!(Status::UNKNOWN.is_ignored());
        assert!(Status::FAILURE.is_failed());
        assert!(!Status::WARNING.is_failed());
    }
}
