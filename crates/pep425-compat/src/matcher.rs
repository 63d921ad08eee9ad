use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rayon::prelude::*;
use tracing::trace;

use pep425_tags::{Tag, TagSet};

use crate::RankedTagList;

/// The reason a candidate's tags are not supported by an environment.
///
/// The variants are ordered by how close the candidate came to matching: a candidate whose
/// interpreter and ABI match but whose platform doesn't is closer than one with an unknown
/// interpreter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum IncompatibleTag {
    /// The tag set contains no tags.
    Invalid,
    /// None of the interpreter tags are supported.
    Python,
    /// The interpreter is supported, but none of the ABI tags are.
    Abi,
    /// The interpreter and ABI are supported, but none of the platform tags are.
    Platform,
}

impl Display for IncompatibleTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid => write!(f, "no tags"),
            Self::Python => write!(f, "unsupported Python interpreter"),
            Self::Abi => write!(f, "unsupported ABI"),
            Self::Platform => write!(f, "unsupported platform"),
        }
    }
}

/// The outcome of matching a candidate's [`TagSet`] against a [`RankedTagList`].
///
/// Ordered by preference: any compatible result is greater than any incompatible one, and among
/// compatible results a lower rank is greater.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MatchResult {
    Incompatible(IncompatibleTag),
    Compatible {
        /// The best rank of any tag in the set.
        rank: usize,
        /// The tag in the set at that rank.
        tag: Tag,
    },
}

impl MatchResult {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Self::Compatible { .. })
    }

    /// The rank of the best matching tag, if any.
    pub fn rank(&self) -> Option<usize> {
        match self {
            Self::Compatible { rank, .. } => Some(*rank),
            Self::Incompatible(_) => None,
        }
    }

    /// The best matching tag, if any.
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Self::Compatible { tag, .. } => Some(tag),
            Self::Incompatible(_) => None,
        }
    }
}

impl Ord for MatchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Compatible { rank: a, .. }, Self::Compatible { rank: b, .. }) => b.cmp(a),
            (Self::Compatible { .. }, Self::Incompatible(_)) => Ordering::Greater,
            (Self::Incompatible(_), Self::Compatible { .. }) => Ordering::Less,
            (Self::Incompatible(a), Self::Incompatible(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for MatchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for MatchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compatible { rank, tag } => write!(f, "compatible as `{tag}` (rank {rank})"),
            Self::Incompatible(reason) => write!(f, "incompatible: {reason}"),
        }
    }
}

/// The candidate selected by [`CompatibilityMatcher::select_best`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BestCandidate<I> {
    /// The identity the caller passed in with the candidate's tag set.
    pub identity: I,
    pub rank: usize,
    pub tag: Tag,
}

/// Ranks candidates' tag sets against the tags an environment supports.
#[derive(Debug, Copy, Clone)]
pub struct CompatibilityMatcher<'a> {
    ranked: &'a RankedTagList,
}

impl<'a> CompatibilityMatcher<'a> {
    pub fn new(ranked: &'a RankedTagList) -> Self {
        Self { ranked }
    }

    pub fn ranked(&self) -> &'a RankedTagList {
        self.ranked
    }

    /// Returns the best rank of any tag in the set, or the closest reason the set is
    /// incompatible.
    pub fn matches(&self, tags: &TagSet) -> MatchResult {
        let mut best = MatchResult::Incompatible(IncompatibleTag::Invalid);
        for interpreter in tags.interpreters() {
            let Some(abis) = self.ranked.index().get(interpreter) else {
                best = best.max(MatchResult::Incompatible(IncompatibleTag::Python));
                continue;
            };
            for abi in tags.abis() {
                let Some(platforms) = abis.get(abi) else {
                    best = best.max(MatchResult::Incompatible(IncompatibleTag::Abi));
                    continue;
                };
                for platform in tags.platforms() {
                    let Some(&rank) = platforms.get(platform) else {
                        best = best.max(MatchResult::Incompatible(IncompatibleTag::Platform));
                        continue;
                    };
                    if best.rank().is_none_or(|best| rank < best) {
                        best = MatchResult::Compatible {
                            rank,
                            tag: Tag::from_components(
                                interpreter.clone(),
                                abi.clone(),
                                platform.clone(),
                            ),
                        };
                    }
                }
            }
        }
        best
    }

    /// Returns `true` if any tag in the set is supported.
    pub fn is_compatible(&self, tags: &TagSet) -> bool {
        let index = self.ranked.index();
        tags.interpreters().any(|interpreter| {
            index.get(interpreter).is_some_and(|abis| {
                tags.abis().any(|abi| {
                    abis.get(abi).is_some_and(|platforms| {
                        tags.platforms()
                            .any(|platform| platforms.contains_key(platform))
                    })
                })
            })
        })
    }

    /// Returns the candidate with the best rank.
    ///
    /// Candidates with the same rank keep their input order: the first one wins. Returns `None`
    /// if no candidate is compatible.
    pub fn select_best<I, T>(
        &self,
        candidates: impl IntoIterator<Item = (I, T)>,
    ) -> Option<BestCandidate<I>>
    where
        T: Borrow<TagSet>,
    {
        let mut best: Option<BestCandidate<I>> = None;
        for (identity, tags) in candidates {
            let tags: &TagSet = tags.borrow();
            let MatchResult::Compatible { rank, tag } = self.matches(tags) else {
                trace!("Skipping incompatible candidate `{tags}`");
                continue;
            };
            if best.as_ref().is_none_or(|best| rank < best.rank) {
                trace!("Best candidate so far matches `{tag}` at rank {rank}");
                best = Some(BestCandidate {
                    identity,
                    rank,
                    tag,
                });
            }
        }
        best
    }

    /// Match many tag sets in parallel, returning the results in input order.
    pub fn match_all(&self, candidates: &[TagSet]) -> Vec<MatchResult> {
        candidates
            .par_iter()
            .map(|tags| self.matches(tags))
            .collect()
    }
}

impl RankedTagList {
    /// Returns a [`CompatibilityMatcher`] for this list.
    pub fn matcher(&self) -> CompatibilityMatcher<'_> {
        CompatibilityMatcher::new(self)
    }
}
