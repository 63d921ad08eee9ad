use std::fmt::Debug;

use pep425_platform::{InterpreterFamily, PlatformProfile};
use pep425_tags::{Tag, TagComponent};

/// The compatibility rules of one interpreter family.
///
/// Each family contributes its own exact-ABI, stable-ABI and no-ABI tags. The
/// [`crate::SupportedTagGenerator`] concatenates them in that order, appends the universal
/// `any` tags, and removes duplicates.
pub trait InterpreterRules: Debug + Send + Sync {
    /// The interpreter tag for the given minor version of the profile's major version, e.g.,
    /// `cp38` for a CPython 3.x profile.
    fn interpreter_tag(&self, profile: &PlatformProfile, minor: u8) -> TagComponent {
        profile.interpreter().tag(profile.major(), Some(minor))
    }

    /// The concrete ABI of the interpreter, if it has one.
    fn abi_tag(&self, profile: &PlatformProfile) -> Option<TagComponent> {
        profile.abi().filter(|abi| !abi.is_none()).cloned()
    }

    /// Tags built for this exact interpreter version and ABI.
    fn exact_abi_tags(&self, profile: &PlatformProfile) -> Vec<Tag> {
        let Some(abi) = self.abi_tag(profile) else {
            return Vec::new();
        };
        let interpreter = self.interpreter_tag(profile, profile.minor());
        platform_product(&interpreter, &abi, profile)
    }

    /// Tags built against a stable ABI that this interpreter still loads.
    fn stable_abi_tags(&self, _profile: &PlatformProfile) -> Vec<Tag> {
        Vec::new()
    }

    /// Tags that don't use any ABI but are still specific to the platform: the current
    /// interpreter version, then the generic versions (e.g., `py39` down to `py30`, then `py3`).
    fn no_abi_tags(&self, profile: &PlatformProfile) -> Vec<Tag> {
        let none = TagComponent::none();
        std::iter::once(self.interpreter_tag(profile, profile.minor()))
            .chain(generic_interpreter_tags(profile))
            .flat_map(|interpreter| platform_product(&interpreter, &none, profile))
            .collect()
    }
}

/// The generic Python tags compatible with the profile, best first: every minor version from the
/// current one down to 0 (e.g., `py39` to `py30`), then the major version alone (`py3`).
pub(crate) fn generic_interpreter_tags(profile: &PlatformProfile) -> Vec<TagComponent> {
    let generic = InterpreterFamily::generic();
    (0..=profile.minor())
        .rev()
        .map(|minor| generic.tag(profile.major(), Some(minor)))
        .chain(std::iter::once(generic.tag(profile.major(), None)))
        .collect()
}

/// One tag per platform in the profile's chain, in chain order.
fn platform_product(
    interpreter: &TagComponent,
    abi: &TagComponent,
    profile: &PlatformProfile,
) -> Vec<Tag> {
    profile
        .platforms()
        .iter()
        .map(|platform| Tag::from_components(interpreter.clone(), abi.clone(), platform.clone()))
        .collect()
}

/// Rules for CPython (`cp`).
#[derive(Debug, Default, Copy, Clone)]
pub struct CPythonRules;

impl CPythonRules {
    /// The first minor version of Python 3 with a stable ABI.
    ///
    /// See: <https://peps.python.org/pep-0384/>
    const STABLE_ABI_MINIMUM_MINOR: u8 = 2;
}

impl InterpreterRules for CPythonRules {
    /// Defaults to `cp<major><minor>`, with the `m` (pymalloc) flag up to Python 3.7. An explicit
    /// `none` means the interpreter has no concrete ABI.
    fn abi_tag(&self, profile: &PlatformProfile) -> Option<TagComponent> {
        if let Some(abi) = profile.abi() {
            return Some(abi).filter(|abi| !abi.is_none()).cloned();
        }
        let abi = self.interpreter_tag(profile, profile.minor());
        // Sufficiently correct assumption, pre-3.8 Pythons were generally built with pymalloc.
        // https://docs.python.org/dev/whatsnew/3.8.html#build-and-c-api-changes
        if profile.version() <= (3, 7) {
            Some(abi.with_suffix("m"))
        } else {
            Some(abi)
        }
    }

    fn stable_abi_tags(&self, profile: &PlatformProfile) -> Vec<Tag> {
        if profile.major() != 3 {
            return Vec::new();
        }
        // No abi3 for free-threading Python.
        if self
            .abi_tag(profile)
            .is_some_and(|abi| abi.as_str().ends_with('t'))
        {
            return Vec::new();
        }
        let abi3 = TagComponent::abi3();
        (Self::STABLE_ABI_MINIMUM_MINOR..=profile.minor())
            .rev()
            .flat_map(|minor| platform_product(&self.interpreter_tag(profile, minor), &abi3, profile))
            .collect()
    }

    /// Every older minor version of the interpreter, then the generic versions.
    fn no_abi_tags(&self, profile: &PlatformProfile) -> Vec<Tag> {
        let none = TagComponent::none();
        (0..=profile.minor())
            .rev()
            .map(|minor| self.interpreter_tag(profile, minor))
            .chain(generic_interpreter_tags(profile))
            .flat_map(|interpreter| platform_product(&interpreter, &none, profile))
            .collect()
    }
}

/// Rules for interpreters without a stable ABI, such as PyPy (`pp`), or for the generic Python
/// family (`py`).
///
/// Only an explicit ABI produces exact-ABI tags, since these interpreters don't encode their ABI
/// in a form that can be derived from the Python version.
#[derive(Debug, Default, Copy, Clone)]
pub struct GenericRules;

impl InterpreterRules for GenericRules {}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tags: &[Tag]) -> Vec<String> {
        tags.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn cpython_default_abi() {
        let profile = PlatformProfile::new("cp", (3, 7), None, ["win_amd64"]).unwrap();
        assert_eq!(CPythonRules.abi_tag(&profile).unwrap().as_str(), "cp37m");

        let profile = PlatformProfile::new("cp", (3, 12), None, ["win_amd64"]).unwrap();
        assert_eq!(CPythonRules.abi_tag(&profile).unwrap().as_str(), "cp312");
    }

    #[test]
    fn cpython_stable_abi() {
        let profile = PlatformProfile::new("cp", (3, 4), None, ["win32"]).unwrap();
        assert_eq!(
            strings(&CPythonRules.stable_abi_tags(&profile)),
            ["cp34-abi3-win32", "cp33-abi3-win32", "cp32-abi3-win32"]
        );
    }

    #[test]
    fn cpython_stable_abi_before_3_2() {
        let profile = PlatformProfile::new("cp", (3, 1), None, ["win32"]).unwrap();
        assert!(CPythonRules.stable_abi_tags(&profile).is_empty());

        let profile = PlatformProfile::new("cp", (2, 7), None, ["win32"]).unwrap();
        assert!(CPythonRules.stable_abi_tags(&profile).is_empty());
    }

    #[test]
    fn cpython_free_threaded() {
        let profile = PlatformProfile::new("cp", (3, 13), Some("cp313t"), ["win_amd64"]).unwrap();
        assert!(CPythonRules.stable_abi_tags(&profile).is_empty());
        assert_eq!(
            strings(&CPythonRules.exact_abi_tags(&profile)),
            ["cp313-cp313t-win_amd64"]
        );
    }

    #[test]
    fn cpython_no_abi() {
        let profile = PlatformProfile::new("cp", (3, 1), None, ["win32"]).unwrap();
        assert_eq!(
            strings(&CPythonRules.no_abi_tags(&profile)),
            [
                "cp31-none-win32",
                "cp30-none-win32",
                "py31-none-win32",
                "py30-none-win32",
                "py3-none-win32"
            ]
        );
    }

    #[test]
    fn cpython_explicit_none() {
        let profile = PlatformProfile::new("cp", (3, 9), Some("none"), ["linux_x86_64"]).unwrap();
        assert_eq!(CPythonRules.abi_tag(&profile), None);
        assert!(CPythonRules.exact_abi_tags(&profile).is_empty());
        assert_eq!(
            strings(&CPythonRules.stable_abi_tags(&profile))[0],
            "cp39-abi3-linux_x86_64"
        );
    }

    #[test]
    fn generic_interpreters() {
        let profile = PlatformProfile::new("cp", (3, 2), None, ["win32"]).unwrap();
        let tags: Vec<String> = generic_interpreter_tags(&profile)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(tags, ["py32", "py31", "py30", "py3"]);
    }

    #[test]
    fn generic_without_abi() {
        let profile = PlatformProfile::new("pypy", (3, 10), None, ["linux_x86_64"]).unwrap();
        assert!(GenericRules.exact_abi_tags(&profile).is_empty());
        assert!(GenericRules.stable_abi_tags(&profile).is_empty());
        assert_eq!(
            strings(&GenericRules.no_abi_tags(&profile)),
            [
                "pp310-none-linux_x86_64",
                "py310-none-linux_x86_64",
                "py39-none-linux_x86_64",
                "py38-none-linux_x86_64",
                "py37-none-linux_x86_64",
                "py36-none-linux_x86_64",
                "py35-none-linux_x86_64",
                "py34-none-linux_x86_64",
                "py33-none-linux_x86_64",
                "py32-none-linux_x86_64",
                "py31-none-linux_x86_64",
                "py30-none-linux_x86_64",
                "py3-none-linux_x86_64"
            ]
        );
    }

    #[test]
    fn generic_with_abi() {
        let profile = PlatformProfile::new(
            "pp",
            (3, 10),
            Some("pypy310_pp73"),
            ["manylinux_2_17_x86_64", "linux_x86_64"],
        )
        .unwrap();
        assert_eq!(
            strings(&GenericRules.exact_abi_tags(&profile)),
            [
                "pp310-pypy310_pp73-manylinux_2_17_x86_64",
                "pp310-pypy310_pp73-linux_x86_64"
            ]
        );
    }

    #[test]
    fn generic_explicit_none() {
        let profile = PlatformProfile::new("jython", (2, 1), Some("none"), ["java"]).unwrap();
        assert!(GenericRules.exact_abi_tags(&profile).is_empty());
        assert_eq!(
            strings(&GenericRules.no_abi_tags(&profile)),
            [
                "jy21-none-java",
                "py21-none-java",
                "py20-none-java",
                "py2-none-java"
            ]
        );
    }
}
