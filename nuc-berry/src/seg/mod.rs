//! 环形分段数据结构: [`Segment`], [`SegmentedProfile`] 与它们的编辑操作.

mod error;
mod profile;
mod segment;

pub use error::{SegError, SegResult};
pub use profile::SegmentedProfile;
pub use segment::{SegId, Segment};
