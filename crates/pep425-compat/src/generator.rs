use tracing::debug;

use pep425_platform::PlatformProfile;
use pep425_tags::{Tag, TagComponent};

use crate::rules::generic_interpreter_tags;
use crate::{PriorityGroup, RankedTagList, RulesRegistry, UnsupportedInterpreterError};

/// Expands a [`PlatformProfile`] into the ranked list of tags the environment supports.
#[derive(Debug, Clone, Default)]
pub struct SupportedTagGenerator {
    registry: RulesRegistry,
}

impl SupportedTagGenerator {
    pub fn new(registry: RulesRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RulesRegistry {
        &self.registry
    }

    /// Returns every tag the environment described by the profile can load, best first.
    ///
    /// Tags are grouped by [`PriorityGroup`]: the exact ABI, the stable ABI, no ABI but specific
    /// to the platform, and finally the platform-independent `any` tags. Within a group, newer
    /// interpreter versions come first, and each interpreter version walks the platform chain
    /// from most to least specific. A tag produced twice keeps its first (best) rank.
    pub fn generate(
        &self,
        profile: &PlatformProfile,
    ) -> Result<RankedTagList, UnsupportedInterpreterError> {
        let rules = self.registry.get(profile.interpreter())?;

        let mut ranked = RankedTagList::default();
        let groups = [
            (PriorityGroup::ExactAbi, rules.exact_abi_tags(profile)),
            (PriorityGroup::StableAbi, rules.stable_abi_tags(profile)),
            (PriorityGroup::NoAbi, rules.no_abi_tags(profile)),
        ];
        for (group, tags) in groups {
            for tag in tags {
                ranked.push(tag, group);
            }
        }

        // The universal tags are supported everywhere and always rank last, ending with the
        // major-only generic tag (e.g., `py3-none-any`).
        for interpreter in std::iter::once(rules.interpreter_tag(profile, profile.minor()))
            .chain(generic_interpreter_tags(profile))
        {
            ranked.push(
                Tag::from_components(interpreter, TagComponent::none(), TagComponent::any()),
                PriorityGroup::Universal,
            );
        }

        debug!("Generated {} compatible tags for {profile}", ranked.len());
        Ok(ranked)
    }
}
