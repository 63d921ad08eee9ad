//! Platform tag fallback chains, ordered from most to least specific.

use crate::{Arch, Os, PlatformError};

/// Returns the platform tags for the given [`Os`] and [`Arch`], most specific first
/// (e.g., `manylinux_2_17_x86_64`, `macosx_11_0_arm64`, or `win_amd64`).
///
/// The `any` platform is never included.
pub fn platform_tags(os: &Os, arch: Arch) -> Result<Vec<String>, PlatformError> {
    let platform_tags = match os {
        Os::Manylinux { major, minor } => {
            let mut platform_tags = Vec::new();
            if let Some(min_minor) = arch.minimum_manylinux_minor() {
                for minor in (min_minor..=*minor).rev() {
                    platform_tags.push(format!("manylinux_{major}_{minor}_{arch}"));
                    // Support legacy manylinux tags with lower priority
                    // <https://peps.python.org/pep-0600/#legacy-manylinux-tags>
                    if *major == 2 {
                        match minor {
                            17 => platform_tags.push(format!("manylinux2014_{arch}")),
                            12 => platform_tags.push(format!("manylinux2010_{arch}")),
                            5 => platform_tags.push(format!("manylinux1_{arch}")),
                            _ => {}
                        }
                    }
                }
            }
            // Non-manylinux is given lowest priority.
            platform_tags.push(format!("linux_{arch}"));
            platform_tags
        }
        Os::Musllinux { major, minor } => {
            let mut platform_tags: Vec<String> = (0..=*minor)
                .rev()
                .map(|minor| format!("musllinux_{major}_{minor}_{arch}"))
                .collect();
            platform_tags.push(format!("linux_{arch}"));
            platform_tags
        }
        Os::Linux => vec![format!("linux_{arch}")],
        Os::Macos { major, minor } => macos_platform_tags(os, (*major, *minor), arch)?,
        Os::Windows => match arch {
            Arch::X86 => vec!["win32".to_string()],
            Arch::X86_64 => vec!["win_amd64".to_string()],
            Arch::Aarch64 => vec!["win_arm64".to_string()],
            _ => return Err(PlatformError::UnsupportedPlatform(os.clone(), arch)),
        },
    };
    Ok(platform_tags)
}

fn macos_platform_tags(
    os: &Os,
    (major, minor): (u16, u16),
    arch: Arch,
) -> Result<Vec<String>, PlatformError> {
    let Some(cpu_arch) = arch.macos_name() else {
        return Err(PlatformError::UnsupportedPlatform(os.clone(), arch));
    };

    let mut platform_tags = vec![];
    match major {
        10 => {
            // Prior to macOS 11, each yearly release bumped the "minor" version number. The major
            // version was always 10.
            for minor in (0..=minor).rev() {
                for binary_format in mac_binary_formats((10, minor), cpu_arch) {
                    platform_tags.push(format!("macosx_10_{minor}_{binary_format}"));
                }
            }
        }
        major if major >= 11 => {
            // Starting with macOS 11, each yearly release bumps the major version number. The
            // minor versions are now the midyear updates.
            let binary_formats: &[&str] = match arch {
                Arch::Aarch64 => &["arm64", "universal2"],
                Arch::X86_64 => &["x86_64", "intel", "fat64", "fat32", "universal2", "universal"],
                _ => return Err(PlatformError::UnsupportedPlatform(os.clone(), arch)),
            };
            for major in (11..=major).rev() {
                for binary_format in binary_formats {
                    platform_tags.push(format!("macosx_{major}_0_{binary_format}"));
                }
            }
            // The "universal2" binary format can have a macOS version earlier than 11.0 when the
            // x86_64 part of the binary supports that version of macOS.
            for minor in (4..=16).rev() {
                if arch == Arch::X86_64 {
                    for binary_format in mac_binary_formats((10, minor), cpu_arch) {
                        if *binary_format == "universal" {
                            platform_tags.push(format!("macosx_10_{minor}_universal2"));
                        }
                        platform_tags.push(format!("macosx_10_{minor}_{binary_format}"));
                    }
                } else {
                    platform_tags.push(format!("macosx_10_{minor}_universal2"));
                }
            }
        }
        _ => return Err(PlatformError::UnsupportedMacosVersion(major)),
    }
    Ok(platform_tags)
}

/// Returns the binary formats a macOS version supports for the given CPU architecture, most
/// specific first. An empty slice means the combination never existed.
pub fn mac_binary_formats(version: (u16, u16), cpu_arch: &str) -> &'static [&'static str] {
    match cpu_arch {
        "x86_64" if version >= (10, 4) => &["x86_64", "intel", "fat64", "fat32", "universal"],
        "i386" if version >= (10, 4) => &["i386", "intel", "fat32", "fat", "universal"],
        // TODO(pep425): 32-bit PPC binaries also ran on ppc64 through 10.2.
        "ppc64" if (10, 4) <= version && version <= (10, 5) => &["ppc64", "fat64", "universal"],
        "ppc" if version <= (10, 6) => &["ppc", "fat32", "fat", "universal"],
        _ => &[],
    }
}

/// Returns the CPU architecture a macOS interpreter runs as: 32-bit interpreters run as `ppc`
/// or `i386` regardless of the hardware.
pub fn mac_architecture(arch: &str, is_32bit: bool) -> &str {
    if !is_32bit {
        arch
    } else if arch.starts_with("ppc") {
        "ppc"
    } else {
        "i386"
    }
}
