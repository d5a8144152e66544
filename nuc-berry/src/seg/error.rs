//! 分段引擎的运行时错误.

use super::segment::SegId;
use std::error::Error;
use std::fmt;

/// 统一的运行时错误.
///
/// 所有编辑操作都是事务性的: 返回任一错误时, 被操作的 profile
/// 保持原状.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegError {
    /// 边界索引超出 `[0, ring_len]`.
    InvalidBoundary {
        /// 违规的索引.
        index: usize,
        /// 环总长.
        ring_len: usize,
    },
    /// 操作会产生低于最小长度限制的 segment.
    TooShort {
        /// 操作后的长度.
        len: usize,
        /// 允许的最小长度.
        min: usize,
    },
    /// 环拓扑被破坏: 相邻关系反转, 区间重叠或链接输入不构成环.
    Topology(&'static str),
    /// merge 的两个 segment 在环上不相邻.
    NonAdjacentSegments,
    /// unmerge 的 segment 没有记录 merge 来源.
    NoMergeSources,
    /// 原始测量序列太短, 无法分段或承载分段模式.
    InsufficientProfileLength {
        /// 序列实际长度.
        len: usize,
        /// 要求的最小长度.
        min: usize,
    },
    /// 按 id 查询的 segment 不存在.
    UnknownSegment {
        /// 查询所用的 id.
        id: SegId,
    },
    /// 群体为空, 无法聚合.
    InsufficientPopulation,
    /// 聚合 bucket 缺失且无法以环邻居填补.
    UnrepairableAggregate,
}

impl fmt::Display for SegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBoundary { index, ring_len } => {
                write!(f, "边界索引 {index} 超出环域 [0, {ring_len}]")
            }
            Self::TooShort { len, min } => {
                write!(f, "segment 长度 {len} 低于最小长度 {min}")
            }
            Self::Topology(reason) => write!(f, "环拓扑被破坏: {reason}"),
            Self::NonAdjacentSegments => write!(f, "两个 segment 在环上不相邻"),
            Self::NoMergeSources => write!(f, "segment 没有记录 merge 来源"),
            Self::InsufficientProfileLength { len, min } => {
                write!(f, "测量序列长度 {len} 低于可分段下限 {min}")
            }
            Self::UnknownSegment { id } => write!(f, "segment {id:?} 不存在"),
            Self::InsufficientPopulation => write!(f, "群体为空, 无法聚合"),
            Self::UnrepairableAggregate => {
                write!(f, "聚合 bucket 缺失且无法以环邻居填补")
            }
        }
    }
}

impl Error for SegError {}

/// 本 crate 通用的 `Result` 别名.
pub type SegResult<T> = Result<T, SegError>;
