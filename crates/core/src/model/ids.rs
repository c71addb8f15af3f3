use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for constructing an identifier from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdError {
    kind: &'static str,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cannot be empty", self.kind)
    }
}

impl std::error::Error for IdError {}

fn validated(kind: &'static str, raw: impl Into<String>) -> Result<String, IdError> {
    let raw = raw.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError { kind });
    }
    Ok(trimmed.to_string())
}

macro_rules! string_id {
    ($name:ident, $kind:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a validated identifier (trimmed, non-empty).
            ///
            /// # Errors
            ///
            /// Returns `IdError` if the value is empty after trimming.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                Ok(Self(validated($kind, value)?))
            }

            /// Returns the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(QuestionId, "question id", "Unique identifier for a Question");
string_id!(ExamId, "exam id", "Unique identifier for a WeeklyExam");
string_id!(RecordId, "record id", "Unique identifier for an ExamRecord");
string_id!(TopicTag, "topic tag", "Knowledge-point code attached to questions (e.g. `1-1`)");

impl RecordId {
    /// Generates a ledger id from a prefix and a submission timestamp,
    /// mirroring the `rec_<millis>` / `exam_<millis>` convention of the
    /// persisted history format.
    #[must_use]
    pub fn generated(prefix: &str, at: chrono::DateTime<chrono::Utc>) -> Self {
        Self(format!("{prefix}_{}", at.timestamp_millis()))
    }
}
