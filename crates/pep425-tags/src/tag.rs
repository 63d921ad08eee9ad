use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use arcstr::ArcStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{MalformedTagStringError, TagSetError};

/// The platform tag of pure, platform-independent distributions.
pub const ANY_PLATFORM: &str = "any";

/// The ABI tag of distributions that don't depend on any ABI.
pub const NO_ABI: &str = "none";

/// The ABI tag of CPython's stable ABI.
///
/// See: <https://peps.python.org/pep-0384/>
pub const STABLE_ABI: &str = "abi3";

/// The position of a component within a tag triple.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TagField {
    /// Ex) `cp39`, `py3`
    Interpreter,
    /// Ex) `cp39`, `abi3`, `none`
    Abi,
    /// Ex) `manylinux_2_17_x86_64`, `any`
    Platform,
}

impl Display for TagField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interpreter => write!(f, "interpreter"),
            Self::Abi => write!(f, "ABI"),
            Self::Platform => write!(f, "platform"),
        }
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("Invalid {field} tag `{value}`: tags must be non-empty after normalization")]
pub struct InvalidTagError {
    field: TagField,
    value: String,
}

impl InvalidTagError {
    /// The field that failed to normalize.
    pub fn field(&self) -> TagField {
        self.field
    }

    /// The raw value as given by the caller.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A single normalized component of a tag triple.
///
/// Components are lowercase, with `.` and `-` replaced by `_`, and never empty. Normalizing an
/// already-normalized component returns it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagComponent(ArcStr);

impl TagComponent {
    /// Normalize and validate a component for the given field.
    pub fn new(field: TagField, value: &str) -> Result<Self, InvalidTagError> {
        let normalized = normalize(value);
        if normalized.is_empty() {
            return Err(InvalidTagError {
                field,
                value: value.to_string(),
            });
        }
        Ok(Self(ArcStr::from(normalized.as_ref())))
    }

    /// Append a suffix to the component, e.g., `cp` and `39` to form `cp39`.
    ///
    /// The result is normalized; it can't be empty since the component itself never is.
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let joined = format!("{}{suffix}", self.0);
        Self(ArcStr::from(normalize(&joined).as_ref()))
    }

    /// A component from a literal that is already normalized, such as `cp`.
    pub fn from_static(value: &'static str) -> Self {
        debug_assert!(
            !value.is_empty() && normalize(value) == value,
            "`{value}` is not a normalized tag component"
        );
        Self(ArcStr::from(value))
    }

    /// The `py` interpreter family of generic Python tags.
    pub fn generic_interpreter() -> Self {
        Self(arcstr::literal!("py"))
    }

    /// The `any` platform.
    pub fn any() -> Self {
        Self(arcstr::literal!("any"))
    }

    /// The `none` ABI.
    pub fn none() -> Self {
        Self(arcstr::literal!("none"))
    }

    /// The `abi3` stable ABI.
    pub fn abi3() -> Self {
        Self(arcstr::literal!("abi3"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the `any` platform.
    pub fn is_any(&self) -> bool {
        self.as_str() == ANY_PLATFORM
    }

    /// Returns `true` if this is the `none` ABI.
    pub fn is_none(&self) -> bool {
        self.as_str() == NO_ABI
    }
}

impl Display for TagComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TagComponent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lowercase the value and replace `.` and `-` with `_`.
fn normalize(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .all(|c| c != '.' && c != '-' && (c.is_lowercase() || !c.is_alphabetic()))
    {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.to_lowercase().replace(['.', '-'], "_"))
}

/// An interpreter, ABI and platform triple, as defined by PEP 425.
///
/// For example, `cp39-cp39-manylinux_2_17_x86_64` or `py3-none-any`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    interpreter: TagComponent,
    abi: TagComponent,
    platform: TagComponent,
}

impl Tag {
    /// Create a tag from raw strings, normalizing each component.
    pub fn new(interpreter: &str, abi: &str, platform: &str) -> Result<Self, InvalidTagError> {
        Ok(Self {
            interpreter: TagComponent::new(TagField::Interpreter, interpreter)?,
            abi: TagComponent::new(TagField::Abi, abi)?,
            platform: TagComponent::new(TagField::Platform, platform)?,
        })
    }

    /// Create a tag from already-normalized components.
    pub fn from_components(
        interpreter: TagComponent,
        abi: TagComponent,
        platform: TagComponent,
    ) -> Self {
        Self {
            interpreter,
            abi,
            platform,
        }
    }

    pub fn interpreter(&self) -> &TagComponent {
        &self.interpreter
    }

    pub fn abi(&self) -> &TagComponent {
        &self.abi
    }

    pub fn platform(&self) -> &TagComponent {
        &self.platform
    }

    /// Returns `true` if the tag doesn't depend on the platform (i.e., the platform is `any`).
    pub fn is_platform_independent(&self) -> bool {
        self.platform.is_any()
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.interpreter, self.abi, self.platform)
    }
}

impl FromStr for Tag {
    type Err = TagSetError;

    /// Parse a single, uncompressed tag triple.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('-').collect();
        let [interpreter, abi, platform] = fields.as_slice() else {
            return Err(MalformedTagStringError::new(s, fields.len()).into());
        };
        if fields.iter().any(|field| field.contains('.')) {
            return Err(MalformedTagStringError::compressed(s).into());
        }
        Ok(Self::new(interpreter, abi, platform)?)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = Tag;

            fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
                f.write_str("a tag triple such as `py3-none-any`")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Tag::from_str(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
