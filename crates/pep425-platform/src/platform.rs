//! Operating systems and architectures, as far as platform tags are concerned.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum PlatformError {
    #[error("Unknown architecture: `{0}`")]
    UnknownArch(String),
    #[error("Unsupported operating system and architecture combination: {0} {1}")]
    UnsupportedPlatform(Os, Arch),
    #[error("Unsupported macOS version: {0}")]
    UnsupportedMacosVersion(u16),
}

/// The operating systems for which a platform tag chain can be derived.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Os {
    /// Linux with the given glibc version.
    Manylinux { major: u16, minor: u16 },
    /// Linux with the given musl version.
    Musllinux { major: u16, minor: u16 },
    /// Linux without a known libc policy.
    Linux,
    Macos { major: u16, minor: u16 },
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Manylinux { .. } => write!(f, "manylinux"),
            Self::Musllinux { .. } => write!(f, "musllinux"),
            Self::Linux => write!(f, "linux"),
            Self::Macos { .. } => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// All supported CPU architectures.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    #[serde(alias = "arm64")]
    Aarch64,
    #[serde(alias = "armv8l")]
    Armv7L,
    #[serde(alias = "ppc64le")]
    Powerpc64Le,
    #[serde(alias = "ppc64")]
    Powerpc64,
    #[serde(alias = "ppc")]
    Powerpc,
    #[serde(alias = "i386", alias = "i686")]
    X86,
    #[serde(alias = "amd64")]
    X86_64,
    S390X,
    LoongArch64,
    Riscv64,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Arch {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aarch64" | "arm64" => Ok(Self::Aarch64),
            // armv8l is 32-bit ARM running on ARMv8 hardware, compatible with armv7l
            "armv7l" | "armv8l" => Ok(Self::Armv7L),
            "ppc64le" => Ok(Self::Powerpc64Le),
            "ppc64" => Ok(Self::Powerpc64),
            "ppc" => Ok(Self::Powerpc),
            "i386" | "i686" => Ok(Self::X86),
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "s390x" => Ok(Self::S390X),
            "loongarch64" => Ok(Self::LoongArch64),
            "riscv64" => Ok(Self::Riscv64),
            _ => Err(PlatformError::UnknownArch(s.to_string())),
        }
    }
}

impl Arch {
    /// Returns the oldest possible `manylinux` tag for this architecture, if it supports
    /// `manylinux`.
    pub fn minimum_manylinux_minor(self) -> Option<u16> {
        match self {
            // manylinux 2014
            Self::Aarch64 | Self::Armv7L | Self::Powerpc64 | Self::Powerpc64Le | Self::S390X => {
                Some(17)
            }
            // manylinux 1
            Self::X86 | Self::X86_64 => Some(5),
            // manylinux_2_31
            Self::Riscv64 => Some(31),
            // manylinux_2_36
            Self::LoongArch64 => Some(36),
            Self::Powerpc => None,
        }
    }

    /// Returns the standard name of the architecture, as used in Linux platform tags.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aarch64 => "aarch64",
            Self::Armv7L => "armv7l",
            Self::Powerpc64Le => "ppc64le",
            Self::Powerpc64 => "ppc64",
            Self::Powerpc => "ppc",
            Self::X86 => "i686",
            Self::X86_64 => "x86_64",
            Self::S390X => "s390x",
            Self::LoongArch64 => "loongarch64",
            Self::Riscv64 => "riscv64",
        }
    }

    /// Returns the name of the architecture as used in macOS platform tags, if macOS ever ran on
    /// it.
    pub(crate) fn macos_name(self) -> Option<&'static str> {
        match self {
            Self::Aarch64 => Some("arm64"),
            Self::X86_64 => Some("x86_64"),
            Self::X86 => Some("i386"),
            Self::Powerpc64 => Some("ppc64"),
            Self::Powerpc => Some("ppc"),
            _ => None,
        }
    }
}
