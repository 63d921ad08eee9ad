//! Descriptions of execution environments: the interpreter, its ABI, and the ordered chain of
//! platform tags the host can load.
//!
//! Nothing in this crate inspects the running process or operating system. Callers supply the
//! detected values, optionally using [`platform_tags`] to expand an operating system and
//! architecture into the platform fallback chain.

pub use chain::{mac_architecture, mac_binary_formats, platform_tags};
pub use platform::{Arch, Os, PlatformError};
pub use profile::{InterpreterFamily, PlatformProfile, ProfileError};

mod chain;
mod platform;
mod profile;
