use std::fmt::{Display, Formatter};

use rustc_hash::FxHashMap;

use pep425_tags::{Tag, TagComponent};

/// The priority groups of a [`RankedTagList`], from most to least preferred.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PriorityGroup {
    /// Built for the exact interpreter version and ABI, e.g., `cp39-cp39-linux_x86_64`.
    ExactAbi,
    /// Built against a stable ABI, e.g., `cp36-abi3-linux_x86_64`.
    StableAbi,
    /// No ABI, but specific to the platform, e.g., `py3-none-linux_x86_64`.
    NoAbi,
    /// Pure and platform-independent, e.g., `py3-none-any`.
    Universal,
}

impl Display for PriorityGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactAbi => write!(f, "exact ABI"),
            Self::StableAbi => write!(f, "stable ABI"),
            Self::NoAbi => write!(f, "no ABI"),
            Self::Universal => write!(f, "universal"),
        }
    }
}

/// `interpreter` |--> `abi` |--> `platform` |--> rank
pub(crate) type TagIndex =
    FxHashMap<TagComponent, FxHashMap<TagComponent, FxHashMap<TagComponent, usize>>>;

/// The tags supported by an environment, ordered from most to least preferred.
///
/// The rank of a tag is its zero-based position in the list; lower is better. Every tag appears
/// at most once.
#[derive(Debug, Clone, Default)]
pub struct RankedTagList {
    tags: Vec<Tag>,
    groups: Vec<PriorityGroup>,
    map: TagIndex,
}

impl RankedTagList {
    /// Append a tag with the lowest priority so far, unless the list already contains it.
    ///
    /// Returns `true` if the tag was added.
    pub(crate) fn push(&mut self, tag: Tag, group: PriorityGroup) -> bool {
        let rank = self.tags.len();
        let platforms = self
            .map
            .entry(tag.interpreter().clone())
            .or_default()
            .entry(tag.abi().clone())
            .or_default();
        if platforms.contains_key(tag.platform()) {
            return false;
        }
        platforms.insert(tag.platform().clone(), rank);
        self.tags.push(tag);
        self.groups.push(group);
        true
    }

    pub(crate) fn index(&self) -> &TagIndex {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over the tags, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.tags
    }

    /// The tag at the given rank.
    pub fn get(&self, rank: usize) -> Option<&Tag> {
        self.tags.get(rank)
    }

    /// The most preferred tag.
    pub fn best(&self) -> Option<&Tag> {
        self.tags.first()
    }

    /// The rank of the given tag, if the environment supports it.
    pub fn rank_of(&self, tag: &Tag) -> Option<usize> {
        self.map
            .get(tag.interpreter())?
            .get(tag.abi())?
            .get(tag.platform())
            .copied()
    }

    /// The priority group of the tag at the given rank.
    pub fn group_of(&self, rank: usize) -> Option<PriorityGroup> {
        self.groups.get(rank).copied()
    }

    /// Iterate over the tags with their priority groups, best first.
    pub fn iter_groups(&self) -> impl Iterator<Item = (&Tag, PriorityGroup)> {
        self.tags.iter().zip(self.groups.iter().copied())
    }
}

impl<'a> IntoIterator for &'a RankedTagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for RankedTagList {
    /// Display tags from high to low priority
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for tag in &self.tags {
            writeln!(f, "{tag}")?;
        }
        Ok(())
    }
}
