//! Canonical entity identifiers
//!
//! The registry API is loose about id types: the same id may arrive as `7`
//! or as `"7"`. Every id is normalized here into a typed `i64` newtype so that
//! maps keyed by ids never miss because of a representation mismatch.
//!
//! - Deserialization accepts a JSON number or a numeric string.
//! - Serialization always emits a JSON number.
//! - The string form only appears in URLs and display labels.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Entity kinds known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A student
    Student,
    /// A study group
    Group,
    /// A subject
    Subject,
    /// A mark (grade)
    Mark,
}

impl EntityKind {
    /// Localized display label for the kind
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Студент",
            Self::Group => "Группа",
            Self::Subject => "Предмет",
            Self::Mark => "Оценка",
        }
    }

    /// Fallback label used when an entity cannot be resolved
    #[must_use]
    pub fn placeholder(self, id: impl fmt::Display) -> String {
        format!("{} #{}", self.label(), id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Student => "student",
            Self::Group => "group",
            Self::Subject => "subject",
            Self::Mark => "mark",
        };
        f.write_str(name)
    }
}

/// Error parsing an id from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: '{input}'")]
pub struct IdParseError {
    /// Kind of id being parsed
    pub kind: EntityKind,
    /// Offending input
    pub input: String,
}

/// Behaviour shared by all typed ids
///
/// Lets the cross-reference caches stay generic over the entity they index.
pub trait EntityId:
    Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Kind of entity this id refers to
    const KIND: EntityKind;

    /// Raw numeric value
    fn raw(self) -> i64;

    /// Placeholder label for an unresolved reference
    fn placeholder(self) -> String {
        Self::KIND.placeholder(self.raw())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw numeric id
            #[inline]
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw numeric value
            #[inline]
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl EntityId for $name {
            const KIND: EntityKind = $kind;

            #[inline]
            fn raw(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self).map_err(|_| IdParseError {
                    kind: $kind,
                    input: s.to_string(),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(n) => Ok(Self(n)),
                    RawId::Text(s) => s.parse().map_err(de::Error::custom),
                }
            }
        }
    };
}

define_id!(
    /// Server-assigned student id
    StudentId => EntityKind::Student
);
define_id!(
    /// Server-assigned group id
    GroupId => EntityKind::Group
);
define_id!(
    /// Server-assigned subject id
    SubjectId => EntityKind::Subject
);
define_id!(
    /// Server-assigned mark id
    MarkId => EntityKind::Mark
);
