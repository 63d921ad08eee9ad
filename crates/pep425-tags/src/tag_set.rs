use std::fmt::{Display, Formatter};
use std::str::FromStr;

use indexmap::IndexSet;
use itertools::{Itertools, iproduct};
use thiserror::Error;

use crate::{InvalidTagError, Tag, TagComponent, TagField};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Malformation {
    FieldCount(usize),
    Compressed,
}

impl Display for Malformation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount(count) => {
                write!(f, "expected three dash-separated fields, found {count}")
            }
            Self::Compressed => write!(f, "expected a single tag, found a compressed tag set"),
        }
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("Malformed tag string `{raw}`: {malformation}")]
pub struct MalformedTagStringError {
    raw: String,
    malformation: Malformation,
}

impl MalformedTagStringError {
    pub(crate) fn new(raw: &str, fields: usize) -> Self {
        Self {
            raw: raw.to_string(),
            malformation: Malformation::FieldCount(fields),
        }
    }

    pub(crate) fn compressed(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            malformation: Malformation::Compressed,
        }
    }

    /// The raw tag string that failed to parse.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The number of dash-separated fields found, if that's why parsing failed.
    pub fn fields(&self) -> Option<usize> {
        match self.malformation {
            Malformation::FieldCount(count) => Some(count),
            Malformation::Compressed => None,
        }
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TagSetError {
    #[error(transparent)]
    Malformed(#[from] MalformedTagStringError),
    #[error(transparent)]
    InvalidTag(#[from] InvalidTagError),
}

/// The set of tags declared by a built distribution.
///
/// A compressed tag string like `cp36.cp37-abi3-manylinux1_x86_64.manylinux2010_x86_64` holds
/// dot-separated alternatives in each of its three fields; the set is the cross-product of those
/// alternatives. The alternatives are kept deduplicated in the order they were first seen, so that
/// rendering reproduces the parsed string, while equality ignores that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    interpreters: IndexSet<TagComponent>,
    abis: IndexSet<TagComponent>,
    platforms: IndexSet<TagComponent>,
}

impl TagSet {
    /// Parse a (possibly compressed) tag string, e.g., `py2.py3-none-any`.
    pub fn parse(raw: &str) -> Result<Self, TagSetError> {
        let fields: Vec<&str> = raw.split('-').collect();
        let [interpreters, abis, platforms] = fields.as_slice() else {
            return Err(MalformedTagStringError::new(raw, fields.len()).into());
        };
        Ok(Self {
            interpreters: parse_alternatives(TagField::Interpreter, interpreters)?,
            abis: parse_alternatives(TagField::Abi, abis)?,
            platforms: parse_alternatives(TagField::Platform, platforms)?,
        })
    }

    /// Render the set back to its compressed string form.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Iterate over every tag in the set.
    ///
    /// Tags are yielded in cross-product order: interpreters, then ABIs, then platforms, each in
    /// the order they were first declared.
    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        iproduct!(&self.interpreters, &self.abis, &self.platforms).map(
            |(interpreter, abi, platform)| {
                Tag::from_components(interpreter.clone(), abi.clone(), platform.clone())
            },
        )
    }

    /// Returns `true` if the given tag is a member of the set.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.interpreters.contains(tag.interpreter())
            && self.abis.contains(tag.abi())
            && self.platforms.contains(tag.platform())
    }

    /// The number of distinct tags in the set.
    pub fn len(&self) -> usize {
        self.interpreters.len() * self.abis.len() * self.platforms.len()
    }

    /// Always `false`: a parsed tag set holds at least one tag.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if every tag in the set is platform-independent.
    pub fn is_pure(&self) -> bool {
        self.platforms.iter().all(TagComponent::is_any)
    }

    pub fn interpreters(&self) -> impl Iterator<Item = &TagComponent> {
        self.interpreters.iter()
    }

    pub fn abis(&self) -> impl Iterator<Item = &TagComponent> {
        self.abis.iter()
    }

    pub fn platforms(&self) -> impl Iterator<Item = &TagComponent> {
        self.platforms.iter()
    }
}

fn parse_alternatives(
    field: TagField,
    value: &str,
) -> Result<IndexSet<TagComponent>, InvalidTagError> {
    value
        .split('.')
        .map(|alternative| TagComponent::new(field, alternative))
        .collect()
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        Self {
            interpreters: IndexSet::from([tag.interpreter().clone()]),
            abis: IndexSet::from([tag.abi().clone()]),
            platforms: IndexSet::from([tag.platform().clone()]),
        }
    }
}

impl FromStr for TagSet {
    type Err = TagSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for TagSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.interpreters.iter().join("."),
            self.abis.iter().join("."),
            self.platforms.iter().join(".")
        )
    }
}
