pub use tag::{ANY_PLATFORM, InvalidTagError, NO_ABI, STABLE_ABI, Tag, TagComponent, TagField};
pub use tag_set::{MalformedTagStringError, TagSet, TagSetError};
pub use wheel::{WheelTagError, wheel_tag};

mod tag;
mod tag_set;
mod wheel;
