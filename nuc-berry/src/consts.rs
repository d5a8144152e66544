//! 库级通用常量.

/// 单个 segment 允许的最小索引长度.
///
/// 任何会产生更短 segment 的编辑操作都会被拒绝.
pub const MIN_SEGMENT_LENGTH: usize = 3;

/// 可执行分段的测量序列最小采样点数.
pub const MIN_PROFILABLE_LENGTH: usize = 10;

/// 分段时判定 block 归属的默认 delta 阈值.
pub const DEFAULT_DELTA_THRESHOLD: f64 = 1.0;

/// 分段时候选边界之间的默认最小间隔.
pub const DEFAULT_BOUNDARY_SPACING: usize = 10;

/// 群体聚合所用归一化位置轴的总跨度.
pub const NORMALISED_SPAN: f64 = 100.0;

/// 群体聚合中值曲线的默认 bucket 步长 (归一化坐标).
pub const DEFAULT_BIN_INCREMENT: f64 = 0.5;
