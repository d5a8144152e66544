//! 环形 profile 的分段划分与编辑操作.

use super::error::{SegError, SegResult};
use super::segment::{SegId, Segment};
use crate::consts::MIN_SEGMENT_LENGTH;
use crate::ring;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 一条封闭轮廓 profile 的完整分段划分.
///
/// 持有一组按环序排列的 [`Segment`], 任何时刻都满足划分不变量:
/// 每个 segment 的 `end` 等于下一个的 `start`, 全体 segment 无缝,
/// 无重叠地覆盖整个环, 且各自不短于
/// [`MIN_SEGMENT_LENGTH`]. 相邻关系由
/// 向量中的位置决定, 不存储引用.
///
/// 所有编辑操作都是事务性的: 校验全部通过后才发生任何修改,
/// 失败时 profile 保持原状.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentedProfile {
    ring_len: usize,
    segments: Vec<Segment>,
}

impl SegmentedProfile {
    /// 将一组 segment 链接成闭合的划分.
    ///
    /// 输入必须按环序排列且内部相邻边界一致; 首尾接缝不一致时,
    /// 将首个 segment 的起点修正到末个 segment 的终点. 修正后起点
    /// 落在 `ring_len - 1` 时归正到 0 (首个 segment 的起点作为
    /// 全局参考点, 应尽可能落在原点上). 未命名的 segment 按位置
    /// 获得 `Seg_i` 形式的名称.
    ///
    /// # Errors
    ///
    /// 输入为空, 环长不一致, 内部边界不连续或总覆盖与环长不符时
    /// 返回 [`SegError::Topology`]; 修正会使任一 segment 低于最小
    /// 长度时返回 [`SegError::TooShort`].
    pub fn link(mut segments: Vec<Segment>) -> SegResult<Self> {
        if segments.is_empty() {
            return Err(SegError::Topology("segment 列表为空"));
        }
        let ring_len = segments[0].ring_len();
        if segments.iter().any(|s| s.ring_len() != ring_len) {
            return Err(SegError::Topology("segment 来自不同总长的环"));
        }
        for (i, seg) in segments.iter_mut().enumerate() {
            if seg.name().is_empty() {
                seg.set_name(format!("Seg_{i}"));
            }
        }
        if segments.len() == 1 {
            if segments[0].start() != segments[0].end() {
                return Err(SegError::Topology("唯一 segment 未覆盖整个环"));
            }
            return Ok(Self { ring_len, segments });
        }
        for i in 1..segments.len() {
            if segments[i].start() != segments[i - 1].end() {
                return Err(SegError::Topology("相邻 segment 边界不连续"));
            }
        }
        let last = segments.len() - 1;
        let seam = segments[last].end();
        if segments[0].start() != seam {
            if seam == segments[0].end() {
                return Err(SegError::Topology("接缝修正使 segment 退化"));
            }
            let new_len = ring::interval_length(seam, segments[0].end(), ring_len);
            if new_len < MIN_SEGMENT_LENGTH {
                return Err(SegError::TooShort {
                    len: new_len,
                    min: MIN_SEGMENT_LENGTH,
                });
            }
            segments[0].set_start(seam);
            if seam == ring_len - 1 {
                // 归正参考点: 起点 ring_len - 1 等价于 0
                if segments[0].end() == 0 {
                    return Err(SegError::Topology("接缝修正使 segment 退化"));
                }
                let first_len = segments[0].end();
                let last_len = ring::interval_length(segments[last].start(), 0, ring_len);
                if first_len < MIN_SEGMENT_LENGTH || last_len < MIN_SEGMENT_LENGTH {
                    return Err(SegError::TooShort {
                        len: first_len.min(last_len),
                        min: MIN_SEGMENT_LENGTH,
                    });
                }
                segments[0].set_start(0);
                segments[last].set_end(0);
            }
        }
        let total: usize = segments.iter().map(Segment::len).sum();
        if total != ring_len {
            return Err(SegError::Topology("segment 总覆盖与环长不符"));
        }
        Ok(Self { ring_len, segments })
    }

    /// 环总长.
    #[inline]
    pub fn ring_len(&self) -> usize {
        self.ring_len
    }

    /// segment 个数.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// 按环序排列的全部 segment.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// 按环序排列的全部 segment id.
    pub fn segment_ids(&self) -> Vec<SegId> {
        self.segments.iter().map(Segment::id).collect()
    }

    /// 按 id 查找 segment.
    pub fn segment(&self, id: SegId) -> SegResult<&Segment> {
        let pos = self.position(id)?;
        Ok(&self.segments[pos])
    }

    /// 按名称查找 segment.
    pub fn segment_by_name(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name() == name)
    }

    /// 覆盖 `index` 的那个 segment. 划分不变量保证恰有一个.
    pub fn segment_containing(&self, index: usize) -> SegResult<&Segment> {
        if index >= self.ring_len {
            return Err(SegError::InvalidBoundary {
                index,
                ring_len: self.ring_len,
            });
        }
        match self.segments.iter().find(|s| s.contains(index)) {
            Some(seg) => Ok(seg),
            None => unreachable!("划分不变量被破坏: 索引 {index} 无所属 segment"),
        }
    }

    /// 将某个 segment 的边界移动到 `(new_start, new_end)`, 变动的
    /// 边界同步传播到环上的前驱与后继.
    ///
    /// 校验全部通过后才落盘: (i) 边界属于 `[0, ring_len]`;
    /// (ii) 本 segment 不低于最小长度; (iii) 前驱与后继不低于最小
    /// 长度; (iv) 边界沿环方向保持单调, 不与邻居发生反转. 任何
    /// 边界变动都会清除受影响 segment 的 merge 来源.
    pub fn update(&mut self, id: SegId, new_start: usize, new_end: usize) -> SegResult<()> {
        let pos = self.position(id)?;
        for index in [new_start, new_end] {
            if index > self.ring_len {
                return Err(SegError::InvalidBoundary {
                    index,
                    ring_len: self.ring_len,
                });
            }
        }
        let new_start = new_start % self.ring_len;
        let new_end = new_end % self.ring_len;

        let n = self.segments.len();
        let (old_start, old_end) = (self.segments[pos].start(), self.segments[pos].end());
        if old_start == new_start && old_end == new_end {
            return Ok(());
        }
        if n == 1 {
            return Err(SegError::Topology("唯一 segment 的边界不可移动"));
        }
        if new_start == new_end {
            return Err(SegError::Topology("更新会使 segment 吞并整个环"));
        }
        let own_len = ring::interval_length(new_start, new_end, self.ring_len);
        if own_len < MIN_SEGMENT_LENGTH {
            return Err(SegError::TooShort {
                len: own_len,
                min: MIN_SEGMENT_LENGTH,
            });
        }
        if n == 2 {
            let other_len = self.ring_len - own_len;
            if other_len < MIN_SEGMENT_LENGTH {
                return Err(SegError::TooShort {
                    len: other_len,
                    min: MIN_SEGMENT_LENGTH,
                });
            }
        } else {
            let prev = &self.segments[(pos + n - 1) % n];
            let next = &self.segments[(pos + 1) % n];
            let prev_len = ring::interval_length(prev.start(), new_start, self.ring_len);
            let next_len = ring::interval_length(new_end, next.end(), self.ring_len);
            for len in [prev_len, next_len] {
                if len < MIN_SEGMENT_LENGTH {
                    return Err(SegError::TooShort {
                        len,
                        min: MIN_SEGMENT_LENGTH,
                    });
                }
            }
            // prev.start 沿环经过本 segment 到 next.end 的弧长;
            // n == 3 时两点重合, 弧即整个环
            let arc = if prev.start() == next.end() {
                self.ring_len
            } else {
                ring::interval_length(prev.start(), next.end(), self.ring_len)
            };
            if prev_len + own_len + next_len != arc {
                return Err(SegError::Topology("更新使边界与邻居发生反转"));
            }
        }

        let prev_pos = (pos + n - 1) % n;
        let next_pos = (pos + 1) % n;
        if old_start != new_start {
            self.segments[prev_pos].set_end(new_start);
        }
        if old_end != new_end {
            self.segments[next_pos].set_start(new_end);
        }
        self.segments[pos].set_boundaries(new_start, new_end);
        Ok(())
    }

    /// 将起点沿环前移 `delta`, 使 segment 从起点侧缩短.
    pub fn shorten_start(&mut self, id: SegId, delta: usize) -> SegResult<()> {
        let seg = self.segment(id)?;
        let new_start = ring::wrap(seg.start() as i64 + delta as i64, self.ring_len);
        let end = seg.end();
        self.update(id, new_start, end)
    }

    /// 将起点沿环后移 `delta`, 使 segment 从起点侧伸长.
    pub fn lengthen_start(&mut self, id: SegId, delta: usize) -> SegResult<()> {
        let seg = self.segment(id)?;
        let new_start = ring::wrap(seg.start() as i64 - delta as i64, self.ring_len);
        let end = seg.end();
        self.update(id, new_start, end)
    }

    /// 将终点沿环后移 `delta`, 使 segment 从终点侧缩短.
    pub fn shorten_end(&mut self, id: SegId, delta: usize) -> SegResult<()> {
        let seg = self.segment(id)?;
        let new_end = ring::wrap(seg.end() as i64 - delta as i64, self.ring_len);
        let start = seg.start();
        self.update(id, start, new_end)
    }

    /// 将终点沿环前移 `delta`, 使 segment 从终点侧伸长.
    pub fn lengthen_end(&mut self, id: SegId, delta: usize) -> SegResult<()> {
        let seg = self.segment(id)?;
        let new_end = ring::wrap(seg.end() as i64 + delta as i64, self.ring_len);
        let start = seg.start();
        self.update(id, start, new_end)
    }

    /// 所有边界沿环统一平移 `offset` 后的新 profile, merge 来源
    /// 逐层同步平移. `offset` 为 0 时结果与原 profile 相同.
    pub fn nudge(&self, offset: i64) -> SegResult<Self> {
        let mut segments = self.segments.clone();
        for seg in &mut segments {
            seg.shift(offset);
        }
        Self::link(segments)
    }

    /// 以 `reference` 处的地标为新原点重排 profile
    /// (等价于 `nudge(-reference)`).
    pub fn rooted_at(&self, reference: usize) -> SegResult<Self> {
        if reference >= self.ring_len {
            return Err(SegError::InvalidBoundary {
                index: reference,
                ring_len: self.ring_len,
            });
        }
        self.nudge(-(reference as i64))
    }

    /// 将环上相邻的两个 segment 合并为一个新 segment.
    ///
    /// 合并后的 segment 使用 `new_id`, 沿用环序在前者的名称, 并把
    /// 两个输入的精确副本记入 merge 来源, 供 [`Self::unmerge`] 无损
    /// 还原. 两个 id 互为前驱后继时 (两 segment 的环), 以 `a` 为前.
    pub fn merge(&mut self, a: SegId, b: SegId, new_id: SegId) -> SegResult<()> {
        let pa = self.position(a)?;
        let pb = self.position(b)?;
        let n = self.segments.len();
        if pa == pb || n < 2 {
            return Err(SegError::NonAdjacentSegments);
        }
        let (first_pos, second_pos) = if (pa + 1) % n == pb {
            (pa, pb)
        } else if (pb + 1) % n == pa {
            (pb, pa)
        } else {
            return Err(SegError::NonAdjacentSegments);
        };
        let first = self.segments[first_pos].clone();
        let second = self.segments[second_pos].clone();
        let mut merged = Segment::with_id(
            first.start(),
            second.end(),
            self.ring_len,
            new_id,
            first.name().to_owned(),
        )?;
        merged.add_merge_source(first);
        merged.add_merge_source(second);
        self.segments[first_pos] = merged;
        self.segments.remove(second_pos);
        Ok(())
    }

    /// 将一个 merge 产物还原为它的来源 segment.
    ///
    /// 来源携带原始的 id, 名称与边界, 还原是精确的.
    pub fn unmerge(&mut self, id: SegId) -> SegResult<()> {
        let pos = self.position(id)?;
        let seg = &self.segments[pos];
        if !seg.has_merge_sources() {
            return Err(SegError::NoMergeSources);
        }
        let sources = seg.merge_sources();
        // 来源边界必须仍与当前边界吻合
        let seam_ok = sources[0].start() == seg.start()
            && sources[sources.len() - 1].end() == seg.end()
            && sources.windows(2).all(|w| w[0].end() == w[1].start());
        if !seam_ok {
            return Err(SegError::Topology("merge 来源与当前边界不符"));
        }
        self.segments.splice(pos..=pos, sources);
        Ok(())
    }

    /// 在覆盖索引 `at` 处将一个 segment 一分为二.
    ///
    /// 前半沿用原名称加 `_a` 后缀并使用 `left_id`, 后半加 `_b` 后缀
    /// 并使用 `right_id`. 两半都必须不低于最小长度.
    pub fn split(&mut self, id: SegId, at: usize, left_id: SegId, right_id: SegId) -> SegResult<()> {
        let pos = self.position(id)?;
        if at >= self.ring_len {
            return Err(SegError::InvalidBoundary {
                index: at,
                ring_len: self.ring_len,
            });
        }
        let seg = &self.segments[pos];
        if !seg.contains(at) {
            return Err(SegError::Topology("分割点不在 segment 内"));
        }
        if at == seg.start() {
            return Err(SegError::Topology("分割点与起点重合"));
        }
        let left = Segment::with_id(
            seg.start(),
            at,
            self.ring_len,
            left_id,
            format!("{}_a", seg.name()),
        )?;
        let right = Segment::with_id(
            at,
            seg.end(),
            self.ring_len,
            right_id,
            format!("{}_b", seg.name()),
        )?;
        self.segments.splice(pos..=pos, [left, right]);
        Ok(())
    }

    /// 某个 segment 两端测量值之差的绝对值.
    ///
    /// # Panics
    ///
    /// `values` 的长度与环长不一致时 panic.
    pub fn displacement(&self, values: &[f64], id: SegId) -> SegResult<f64> {
        assert_eq!(values.len(), self.ring_len, "测量序列长度必须等于环长");
        let seg = self.segment(id)?;
        Ok((values[seg.start()] - values[seg.end()]).abs())
    }

    fn position(&self, id: SegId) -> SegResult<usize> {
        self.segments
            .iter()
            .position(|s| s.id() == id)
            .ok_or(SegError::UnknownSegment { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 环长 100 的四等分 profile: `[0,25) [25,50) [50,75) [75,0)`.
    fn quads() -> SegmentedProfile {
        let segments = vec![
            Segment::new(0, 25, 100, "Seg_0").unwrap(),
            Segment::new(25, 50, 100, "Seg_1").unwrap(),
            Segment::new(50, 75, 100, "Seg_2").unwrap(),
            Segment::new(75, 100, 100, "Seg_3").unwrap(),
        ];
        SegmentedProfile::link(segments).unwrap()
    }

    /// 每个索引恰好属于一个 segment.
    fn assert_partition(p: &SegmentedProfile) {
        for i in 0..p.ring_len() {
            let owners = p.segments().iter().filter(|s| s.contains(i)).count();
            assert_eq!(owners, 1, "索引 {i} 的所属 segment 个数为 {owners}");
        }
        let total: usize = p.segments().iter().map(Segment::len).sum();
        assert_eq!(total, p.ring_len());
    }

    #[test]
    fn link_validates_topology() {
        assert_partition(&quads());

        assert_eq!(
            SegmentedProfile::link(vec![]),
            Err(SegError::Topology("segment 列表为空"))
        );

        // 内部边界断裂
        let broken = vec![
            Segment::new(0, 25, 100, "a").unwrap(),
            Segment::new(30, 50, 100, "b").unwrap(),
            Segment::new(50, 100, 100, "c").unwrap(),
        ];
        assert!(matches!(
            SegmentedProfile::link(broken),
            Err(SegError::Topology(_))
        ));

        // 唯一 segment 必须覆盖整个环
        let partial = vec![Segment::new(0, 50, 100, "a").unwrap()];
        assert!(matches!(
            SegmentedProfile::link(partial),
            Err(SegError::Topology(_))
        ));
        let full = vec![Segment::new(0, 0, 100, "a").unwrap()];
        assert_eq!(SegmentedProfile::link(full).unwrap().segment_count(), 1);
    }

    #[test]
    fn link_repairs_seam_and_canonicalises() {
        // 接缝不一致: 末个终点 99, 首个起点 98 -> 首个起点修正为 99,
        // 再归正到 0, 末个终点随之归正
        let segments = vec![
            Segment::new(98, 30, 100, "a").unwrap(),
            Segment::new(30, 99, 100, "b").unwrap(),
        ];
        let p = SegmentedProfile::link(segments).unwrap();
        assert_eq!((p.segments()[0].start(), p.segments()[0].end()), (0, 30));
        assert_eq!((p.segments()[1].start(), p.segments()[1].end()), (30, 0));
        assert_partition(&p);
    }

    #[test]
    fn link_names_unnamed_segments() {
        let segments = vec![
            Segment::new(0, 50, 100, "").unwrap(),
            Segment::new(50, 100, 100, "").unwrap(),
        ];
        let p = SegmentedProfile::link(segments).unwrap();
        assert_eq!(p.segments()[0].name(), "Seg_0");
        assert_eq!(p.segments()[1].name(), "Seg_1");
    }

    #[test]
    fn update_propagates_to_neighbours() {
        let mut p = quads();
        let ids = p.segment_ids();
        p.update(ids[1], 30, 55).unwrap();
        assert_eq!(p.segments()[0].end(), 30);
        assert_eq!(p.segments()[1].start(), 30);
        assert_eq!(p.segments()[1].end(), 55);
        assert_eq!(p.segments()[2].start(), 55);
        assert_partition(&p);
    }

    #[test]
    fn update_across_origin() {
        let mut p = quads();
        let ids = p.segment_ids();
        // [75,0) -> [75,5): 后继 [0,25) 收缩为 [5,25)
        p.update(ids[3], 75, 5).unwrap();
        assert_eq!(p.segments()[3].end(), 5);
        assert_eq!(p.segments()[0].start(), 5);
        assert_partition(&p);
    }

    #[test]
    fn failed_update_leaves_profile_untouched() {
        let mut p = quads();
        let before = p.clone();
        let ids = p.segment_ids();

        // 本 segment 过短
        assert_eq!(
            p.update(ids[1], 25, 27),
            Err(SegError::TooShort { len: 2, min: 3 })
        );
        // 前驱被压缩至过短
        assert_eq!(
            p.update(ids[1], 1, 50),
            Err(SegError::TooShort { len: 1, min: 3 })
        );
        // 边界越界
        assert_eq!(
            p.update(ids[1], 25, 101),
            Err(SegError::InvalidBoundary {
                index: 101,
                ring_len: 100
            })
        );
        // 边界反转: 起点被拖入后继的弧内
        assert!(matches!(
            p.update(ids[1], 80, 50),
            Err(SegError::Topology(_))
        ));
        assert_eq!(p, before);
    }

    #[test]
    fn single_segment_rejects_boundary_moves() {
        let mut p =
            SegmentedProfile::link(vec![Segment::new(0, 0, 60, "full").unwrap()]).unwrap();
        let id = p.segment_ids()[0];
        assert!(matches!(p.update(id, 5, 30), Err(SegError::Topology(_))));
    }

    #[test]
    fn shorten_and_lengthen_wrappers() {
        let mut p = quads();
        let ids = p.segment_ids();

        p.shorten_start(ids[1], 5).unwrap();
        assert_eq!(p.segments()[1].start(), 30);
        p.lengthen_start(ids[1], 5).unwrap();
        assert_eq!(p.segments()[1].start(), 25);
        p.shorten_end(ids[1], 5).unwrap();
        assert_eq!(p.segments()[1].end(), 45);
        p.lengthen_end(ids[1], 5).unwrap();
        assert_eq!(p.segments()[1].end(), 50);
        assert_eq!(p, quads_with_ids(&p));
        assert_partition(&p);
    }

    /// 与 `quads()` 同布局但沿用 `p` 的 id, 用于边界往返比较.
    fn quads_with_ids(p: &SegmentedProfile) -> SegmentedProfile {
        let bounds = [(0, 25), (25, 50), (50, 75), (75, 100)];
        let segments = p
            .segments()
            .iter()
            .zip(bounds)
            .map(|(s, (a, b))| {
                Segment::with_id(a, b, 100, s.id(), s.name().to_owned()).unwrap()
            })
            .collect();
        SegmentedProfile::link(segments).unwrap()
    }

    #[test]
    fn merge_then_unmerge_round_trips() {
        let mut p = quads();
        let before = p.clone();
        let ids = p.segment_ids();

        let merged_id = SegId::fresh();
        p.merge(ids[0], ids[1], merged_id).unwrap();
        assert_eq!(p.segment_count(), 3);
        let merged = p.segment(merged_id).unwrap();
        assert_eq!((merged.start(), merged.end()), (0, 50));
        assert_eq!(merged.name(), "Seg_0");
        assert!(merged.has_merge_sources());
        assert_partition(&p);

        p.unmerge(merged_id).unwrap();
        assert_eq!(p, before);
    }

    #[test]
    fn merge_across_origin_pair() {
        let mut p = quads();
        let ids = p.segment_ids();
        let merged_id = SegId::fresh();
        // 末个 + 首个: 合并后跨越原点
        p.merge(ids[3], ids[0], merged_id).unwrap();
        let merged = p.segment(merged_id).unwrap();
        assert_eq!((merged.start(), merged.end()), (75, 25));
        assert!(merged.wraps());
        assert_partition(&p);
    }

    #[test]
    fn merge_rejects_non_adjacent() {
        let mut p = quads();
        let ids = p.segment_ids();
        assert_eq!(
            p.merge(ids[0], ids[2], SegId::fresh()),
            Err(SegError::NonAdjacentSegments)
        );
        assert_eq!(
            p.merge(ids[0], ids[0], SegId::fresh()),
            Err(SegError::NonAdjacentSegments)
        );
    }

    #[test]
    fn unmerge_requires_sources() {
        let mut p = quads();
        let ids = p.segment_ids();
        assert_eq!(p.unmerge(ids[0]), Err(SegError::NoMergeSources));
    }

    #[test]
    fn boundary_update_clears_provenance() {
        let mut p = quads();
        let ids = p.segment_ids();
        let merged_id = SegId::fresh();
        p.merge(ids[0], ids[1], merged_id).unwrap();
        p.update(merged_id, 5, 50).unwrap();
        assert!(!p.segment(merged_id).unwrap().has_merge_sources());
        assert_eq!(p.unmerge(merged_id), Err(SegError::NoMergeSources));
    }

    #[test]
    fn nudge_identity_and_closure() {
        let p = quads();
        assert_eq!(p.nudge(0).unwrap(), p);
        for k in [1_i64, 25, 60, 99] {
            let shifted = p.nudge(k).unwrap();
            assert_partition(&shifted);
            assert_eq!(shifted.nudge(100 - k).unwrap(), p);
        }
    }

    #[test]
    fn nudge_shifts_provenance() {
        let mut p = quads();
        let ids = p.segment_ids();
        let merged_id = SegId::fresh();
        p.merge(ids[0], ids[1], merged_id).unwrap();

        let mut shifted = p.nudge(5).unwrap();
        let merged = shifted.segment(merged_id).unwrap();
        assert_eq!((merged.start(), merged.end()), (5, 55));
        assert_eq!(merged.merge_sources()[0].start(), 5);
        assert_eq!(merged.merge_sources()[1].end(), 55);

        // 平移后的 unmerge 还原平移后的来源
        shifted.unmerge(merged_id).unwrap();
        assert_eq!(shifted.segments()[0].start(), 5);
        assert_eq!(shifted.segments()[0].end(), 30);
        assert_partition(&shifted);
    }

    #[test]
    fn rooted_at_moves_reference_to_origin() {
        let p = quads();
        let rooted = p.rooted_at(25).unwrap();
        assert_eq!(rooted.segment_containing(0).unwrap().start(), 0);
        assert_eq!(rooted.segment_containing(0).unwrap().id(), p.segment_ids()[1]);
        assert_partition(&rooted);

        assert!(matches!(
            p.rooted_at(100),
            Err(SegError::InvalidBoundary { .. })
        ));
    }

    #[test]
    fn split_divides_a_segment() {
        let mut p = quads();
        let ids = p.segment_ids();
        let (left_id, right_id) = (SegId::fresh(), SegId::fresh());
        p.split(ids[0], 10, left_id, right_id).unwrap();
        assert_eq!(p.segment_count(), 5);
        let left = p.segment(left_id).unwrap();
        let right = p.segment(right_id).unwrap();
        assert_eq!((left.start(), left.end()), (0, 10));
        assert_eq!((right.start(), right.end()), (10, 25));
        assert_eq!(left.name(), "Seg_0_a");
        assert_eq!(right.name(), "Seg_0_b");
        assert_partition(&p);

        // 过短的一半被拒绝
        let before = p.clone();
        assert!(matches!(
            p.split(right_id, 11, SegId::fresh(), SegId::fresh()),
            Err(SegError::TooShort { .. })
        ));
        assert_eq!(p, before);
    }

    #[test]
    fn lookup_and_displacement() {
        let p = quads();
        let ids = p.segment_ids();
        assert_eq!(p.segment_containing(74).unwrap().id(), ids[2]);
        assert_eq!(p.segment_containing(75).unwrap().id(), ids[3]);
        assert!(p.segment_by_name("Seg_2").is_some());
        assert!(p.segment_by_name("nope").is_none());

        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        // [25,50): |25 - 50| = 25
        assert_eq!(p.displacement(&values, ids[1]).unwrap(), 25.0);

        assert!(matches!(
            p.segment(SegId::fresh()),
            Err(SegError::UnknownSegment { .. })
        ));
    }
}
