use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use pep425_tags::{InvalidTagError, TagComponent, TagField};

use crate::{Arch, Os, PlatformError, platform_tags};

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ProfileError {
    #[error("The interpreter family must not be empty")]
    EmptyInterpreter,
    #[error("Invalid Python version `{0}`: expected `<major>.<minor>`")]
    InvalidVersion(String),
    #[error("Invalid Python version `{major}.{minor}`: the major version must be at least 1")]
    UnsupportedMajorVersion { major: u8, minor: u8 },
    #[error("The platform chain must contain at least one platform tag other than `any`")]
    EmptyPlatforms,
    #[error("The platform tag `{0}` appears more than once in the platform chain")]
    DuplicatePlatform(String),
    #[error("Provide either `platforms` or `os` and `arch`, not both")]
    ConflictingPlatforms,
    #[error("Both `os` and `arch` are required to derive the platform chain")]
    IncompletePlatform,
    #[error(transparent)]
    InvalidTag(#[from] InvalidTagError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// The short code of an interpreter family, as used in interpreter tags (e.g., `cp` for CPython).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterpreterFamily(TagComponent);

impl InterpreterFamily {
    /// Parse an interpreter family from its short code (e.g., `cp`) or from the implementation
    /// name (e.g., `cpython`).
    pub fn new(name: &str) -> Result<Self, ProfileError> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(ProfileError::EmptyInterpreter);
        }
        let family = match name.as_str() {
            "python" => Self::generic(),
            "cpython" => Self::cpython(),
            "pypy" => Self::pypy(),
            "ironpython" => Self::ironpython(),
            "jython" => Self::jython(),
            _ => return Ok(Self(TagComponent::new(TagField::Interpreter, &name)?)),
        };
        debug!("Using interpreter family `{family}` for implementation `{name}`");
        Ok(family)
    }

    /// CPython (`cp`).
    pub fn cpython() -> Self {
        Self(TagComponent::from_static("cp"))
    }

    /// PyPy (`pp`).
    pub fn pypy() -> Self {
        Self(TagComponent::from_static("pp"))
    }

    /// IronPython (`ip`).
    pub fn ironpython() -> Self {
        Self(TagComponent::from_static("ip"))
    }

    /// Jython (`jy`).
    pub fn jython() -> Self {
        Self(TagComponent::from_static("jy"))
    }

    /// The family of generic, implementation-independent Python tags (`py`).
    pub fn generic() -> Self {
        Self(TagComponent::generic_interpreter())
    }

    /// The interpreter tag for the given Python version, e.g., `cp39`, or `py3` without a minor
    /// version.
    pub fn tag(&self, major: u8, minor: Option<u8>) -> TagComponent {
        match minor {
            Some(minor) => self.0.with_suffix(&format!("{major}{minor}")),
            None => self.0.with_suffix(&major.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for InterpreterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for InterpreterFamily {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A validated description of one execution environment.
///
/// The platform chain is ordered from most to least specific and never contains `any`; that
/// platform is implied for every environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileWire", into = "ProfileWire")]
pub struct PlatformProfile {
    interpreter: InterpreterFamily,
    version: (u8, u8),
    abi: Option<TagComponent>,
    platforms: Vec<TagComponent>,
}

impl PlatformProfile {
    /// Create a profile for the given interpreter family, Python version, optional ABI and
    /// platform chain.
    pub fn new<I, S>(
        interpreter: &str,
        version: (u8, u8),
        abi: Option<&str>,
        platforms: I,
    ) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let interpreter = InterpreterFamily::new(interpreter)?;

        let (major, minor) = version;
        if major == 0 {
            return Err(ProfileError::UnsupportedMajorVersion { major, minor });
        }

        let abi = abi
            .map(|abi| TagComponent::new(TagField::Abi, abi))
            .transpose()?;

        let mut chain: Vec<TagComponent> = Vec::new();
        for platform in platforms {
            let platform = TagComponent::new(TagField::Platform, platform.as_ref())?;
            if platform.is_any() {
                debug!("Ignoring `any` in the platform chain; it is always supported");
                continue;
            }
            if chain.contains(&platform) {
                return Err(ProfileError::DuplicatePlatform(platform.to_string()));
            }
            chain.push(platform);
        }
        if chain.is_empty() {
            return Err(ProfileError::EmptyPlatforms);
        }

        Ok(Self {
            interpreter,
            version,
            abi,
            platforms: chain,
        })
    }

    /// Create a profile whose platform chain is derived from an operating system and
    /// architecture.
    pub fn for_platform(
        interpreter: &str,
        version: (u8, u8),
        abi: Option<&str>,
        os: &Os,
        arch: Arch,
    ) -> Result<Self, ProfileError> {
        Self::new(interpreter, version, abi, platform_tags(os, arch)?)
    }

    /// Parse a profile from its TOML representation.
    ///
    /// ```toml
    /// interpreter = "cpython"
    /// version = "3.9"
    /// platforms = ["manylinux_2_17_x86_64", "linux_x86_64"]
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn interpreter(&self) -> &InterpreterFamily {
        &self.interpreter
    }

    /// The Python language version, as `(major, minor)`.
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    pub fn major(&self) -> u8 {
        self.version.0
    }

    pub fn minor(&self) -> u8 {
        self.version.1
    }

    /// The explicit ABI tag, if the caller provided one.
    pub fn abi(&self) -> Option<&TagComponent> {
        self.abi.as_ref()
    }

    /// The platform chain, most specific first.
    pub fn platforms(&self) -> &[TagComponent] {
        &self.platforms
    }
}

impl fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}", self.interpreter, self.version.0, self.version.1)?;
        if let Some(abi) = &self.abi {
            write!(f, " ({abi})")?;
        }
        write!(f, " on {}", self.platforms[0])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum VersionWire {
    Parts(u8, u8),
    String(String),
}

impl VersionWire {
    /// Parse the version as `(major, minor)`, accepting either `[3, 9]` or `"3.9"`.
    fn into_parts(self) -> Result<(u8, u8), ProfileError> {
        match self {
            Self::Parts(major, minor) => Ok((major, minor)),
            Self::String(version) => {
                let invalid = || ProfileError::InvalidVersion(version.clone());
                let (major, minor) = version.trim().split_once('.').ok_or_else(invalid)?;
                Ok((
                    major.parse().map_err(|_| invalid())?,
                    minor.parse().map_err(|_| invalid())?,
                ))
            }
        }
    }
}

/// The serialized form of a [`PlatformProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ProfileWire {
    interpreter: String,
    version: VersionWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    platforms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    os: Option<Os>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arch: Option<Arch>,
}

impl TryFrom<ProfileWire> for PlatformProfile {
    type Error = ProfileError;

    fn try_from(wire: ProfileWire) -> Result<Self, Self::Error> {
        let version = wire.version.into_parts()?;
        let abi = wire.abi.as_deref();
        match (wire.platforms, wire.os, wire.arch) {
            (Some(platforms), None, None) => {
                Self::new(&wire.interpreter, version, abi, platforms)
            }
            (None, Some(os), Some(arch)) => {
                Self::for_platform(&wire.interpreter, version, abi, &os, arch)
            }
            (Some(_), _, _) => Err(ProfileError::ConflictingPlatforms),
            (None, None, None) => Err(ProfileError::EmptyPlatforms),
            (None, _, _) => Err(ProfileError::IncompletePlatform),
        }
    }
}

impl From<PlatformProfile> for ProfileWire {
    fn from(profile: PlatformProfile) -> Self {
        Self {
            interpreter: profile.interpreter.to_string(),
            version: VersionWire::Parts(profile.version.0, profile.version.1),
            abi: profile.abi.map(|abi| abi.to_string()),
            platforms: Some(
                profile
                    .platforms
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            ),
            os: None,
            arch: None,
        }
    }
}
