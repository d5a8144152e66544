//! 单个环形 segment 及其 merge 来源 (provenance) 记录.

use super::error::{SegError, SegResult};
use crate::consts::MIN_SEGMENT_LENGTH;
use crate::ring;
use either::Either;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// segment 的进程内唯一标识.
///
/// 通过 [`SegId::fresh`] 分配, 单调递增, 跨 profile 不重复.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegId(u64);

static NEXT_SEG_ID: AtomicU64 = AtomicU64::new(1);

impl SegId {
    /// 分配一个新的进程内唯一 id.
    pub fn fresh() -> Self {
        Self(NEXT_SEG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// 环形轮廓上的一个半开区间 `[start, end)`, 带名称与 merge 来源.
///
/// 边界始终存储在 `[0, ring_len)` 内; `start == end` 表示覆盖整个环的
/// 单一 segment. `merge_sources` 记录 merge 操作的精确输入, 使 unmerge
/// 可以无损还原. segment 是纯值类型, clone 得到完全独立的副本.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    id: SegId,
    name: String,
    start: usize,
    end: usize,
    ring_len: usize,
    merge_sources: Vec<Segment>,
}

impl Segment {
    /// 新建 segment 并分配新 id. 边界允许取 `[0, ring_len]`,
    /// 存储前按环长归一.
    ///
    /// # Errors
    ///
    /// 边界越界时返回 [`SegError::InvalidBoundary`]; 区间长度低于
    /// [`MIN_SEGMENT_LENGTH`] 时返回 [`SegError::TooShort`].
    pub fn new(
        start: usize,
        end: usize,
        ring_len: usize,
        name: impl Into<String>,
    ) -> SegResult<Self> {
        Self::with_id(start, end, ring_len, SegId::fresh(), name)
    }

    /// 同 [`Segment::new`], 但沿用给定的 id (用于 pattern 迁移等
    /// 需要保持身份的场合).
    pub fn with_id(
        start: usize,
        end: usize,
        ring_len: usize,
        id: SegId,
        name: impl Into<String>,
    ) -> SegResult<Self> {
        if ring_len < MIN_SEGMENT_LENGTH {
            return Err(SegError::TooShort {
                len: ring_len,
                min: MIN_SEGMENT_LENGTH,
            });
        }
        for index in [start, end] {
            if index > ring_len {
                return Err(SegError::InvalidBoundary { index, ring_len });
            }
        }
        let start = start % ring_len;
        let end = end % ring_len;
        let len = if start == end {
            ring_len
        } else {
            ring::interval_length(start, end, ring_len)
        };
        if len < MIN_SEGMENT_LENGTH {
            return Err(SegError::TooShort {
                len,
                min: MIN_SEGMENT_LENGTH,
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            start,
            end,
            ring_len,
            merge_sources: Vec::new(),
        })
    }

    /// segment 的唯一标识.
    #[inline]
    pub fn id(&self) -> SegId {
        self.id
    }

    /// segment 的名称.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 起始边界 (含入).
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// 终止边界 (排除).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// 所在环的总长.
    #[inline]
    pub fn ring_len(&self) -> usize {
        self.ring_len
    }

    /// segment 覆盖的索引个数. `start == end` 时覆盖整个环.
    #[inline]
    pub fn len(&self) -> usize {
        if self.start == self.end {
            self.ring_len
        } else {
            ring::interval_length(self.start, self.end, self.ring_len)
        }
    }

    /// segment 是否跨越环原点?
    #[inline]
    pub fn wraps(&self) -> bool {
        ring::wraps(self.start, self.end)
    }

    /// `index` 是否属于本 segment?
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        debug_assert!(index < self.ring_len);
        self.start == self.end || ring::contains(self.start, self.end, index, self.ring_len)
    }

    /// 以环序迭代 segment 覆盖的全部索引, 从 `start` 开始.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        let (start, end, ring_len) = (self.start, self.end, self.ring_len);
        if end <= start {
            Either::Left((start..ring_len).chain(0..end))
        } else {
            Either::Right(start..end)
        }
    }

    /// segment 的中点索引 (环序第 `len / 2` 个覆盖索引).
    pub fn midpoint(&self) -> usize {
        let mid = self.len() / 2;
        if self.end <= self.start {
            if self.start + mid < self.ring_len {
                self.start + mid
            } else {
                self.end - mid
            }
        } else {
            self.start + mid
        }
    }

    /// `index` 在 segment 内的归一化位置 (`start` 处为 0.0).
    /// 不属于本 segment 时返回 `None`.
    pub fn index_proportion(&self, index: usize) -> Option<f64> {
        if index >= self.ring_len || !self.contains(index) {
            return None;
        }
        let offset = ring::interval_length(self.start, index, self.ring_len);
        Some(offset as f64 / self.len() as f64)
    }

    /// 归一化位置 `proportion` (属于 `[0, 1]`) 对应的覆盖索引.
    /// 位置越界时返回 `None`.
    pub fn proportional_index(&self, proportion: f64) -> Option<usize> {
        if !(0.0..=1.0).contains(&proportion) {
            return None;
        }
        let target = (self.len() as f64 * proportion) as usize;
        self.indices().nth(target.min(self.len() - 1))
    }

    /// 是否记录了 merge 来源?
    #[inline]
    pub fn has_merge_sources(&self) -> bool {
        !self.merge_sources.is_empty()
    }

    /// merge 来源的深拷贝, 按环序排列.
    pub fn merge_sources(&self) -> Vec<Segment> {
        self.merge_sources.clone()
    }

    /// 追加一个 merge 来源.
    pub fn add_merge_source(&mut self, source: Segment) {
        self.merge_sources.push(source);
    }

    pub(super) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// 直接改写两个边界. 边界改动使既有 merge 来源失效, 一并清除.
    pub(super) fn set_boundaries(&mut self, start: usize, end: usize) {
        debug_assert!(start < self.ring_len && end < self.ring_len);
        self.start = start;
        self.end = end;
        self.merge_sources.clear();
    }

    pub(super) fn set_start(&mut self, start: usize) {
        let end = self.end;
        self.set_boundaries(start, end);
    }

    pub(super) fn set_end(&mut self, end: usize) {
        let start = self.start;
        self.set_boundaries(start, end);
    }

    /// 将两个边界沿环统一平移 `offset`, merge 来源逐层同步平移.
    ///
    /// 以显式工作栈遍历 provenance 树, 不使用递归.
    pub(super) fn shift(&mut self, offset: i64) {
        let mut stack: Vec<&mut Segment> = vec![self];
        while let Some(seg) = stack.pop() {
            let Segment {
                start,
                end,
                ring_len,
                merge_sources,
                ..
            } = seg;
            *start = ring::wrap(*start as i64 + offset, *ring_len);
            *end = ring::wrap(*end as i64 + offset, *ring_len);
            stack.extend(merge_sources.iter_mut());
        }
    }
}
