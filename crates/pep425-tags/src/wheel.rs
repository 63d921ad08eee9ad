use thiserror::Error;

use crate::{TagSet, TagSetError};

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum WheelTagError {
    #[error("The wheel filename `{0}` is invalid: Must end with `.whl`")]
    MissingExtension(String),
    #[error(
        "The wheel filename `{0}` is invalid: Must have a name, version, Python tag, ABI tag, and platform tag"
    )]
    MissingComponents(String),
    #[error("The wheel filename `{0}` has an invalid tag")]
    InvalidTag(String, #[source] TagSetError),
}

/// Extract the tag set from a wheel filename, e.g., `numpy-1.26.0-cp39-cp39-win_amd64.whl`.
///
/// Any leading directory is ignored. The tag set is always the last three dash-separated
/// components, so an optional build tag is skipped.
///
/// See: <https://packaging.python.org/en/latest/specifications/binary-distribution-format/#file-name-convention>
pub fn wheel_tag(filename: &str) -> Result<TagSet, WheelTagError> {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = basename
        .strip_suffix(".whl")
        .ok_or_else(|| WheelTagError::MissingExtension(filename.to_string()))?;

    // The remainder holds at least the distribution name and version.
    let mut parts = stem.rsplitn(4, '-');
    let (Some(_), Some(_), Some(_), Some(rest)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(WheelTagError::MissingComponents(filename.to_string()));
    };
    if !rest.contains('-') {
        return Err(WheelTagError::MissingComponents(filename.to_string()));
    }

    TagSet::parse(&stem[rest.len() + 1..])
        .map_err(|err| WheelTagError::InvalidTag(filename.to_string(), err))
}
