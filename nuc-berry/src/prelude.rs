//! 🫐欢迎光临🫐
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{SegError, SegId, SegResult, Segment, SegmentedProfile};

pub use crate::consts::{
    DEFAULT_BIN_INCREMENT, DEFAULT_DELTA_THRESHOLD, MIN_PROFILABLE_LENGTH, MIN_SEGMENT_LENGTH,
};

pub use crate::fitter::fit;
pub use crate::median::{representative, ProfileAggregate};
pub use crate::population::{CancelToken, Member, Population};
pub use crate::ring;
pub use crate::segmenter::{segment, BlockInfo, SegmenterOptions};
