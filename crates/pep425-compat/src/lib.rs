//! Compatibility resolution between an execution environment and built distributions.
//!
//! A [`SupportedTagGenerator`] expands a [`pep425_platform::PlatformProfile`] into a
//! [`RankedTagList`]: every tag the environment can load, best first. A
//! [`CompatibilityMatcher`] then ranks each candidate's [`pep425_tags::TagSet`] against that list
//! and picks the best candidate.

pub use generator::SupportedTagGenerator;
pub use matcher::{BestCandidate, CompatibilityMatcher, IncompatibleTag, MatchResult};
pub use ranked::{PriorityGroup, RankedTagList};
pub use registry::{RulesRegistry, UnsupportedInterpreterError};
pub use rules::{CPythonRules, GenericRules, InterpreterRules};

mod generator;
mod matcher;
mod ranked;
mod registry;
mod rules;
