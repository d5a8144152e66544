//! 将既有分段模式按比例迁移到不同长度的目标环上.

use crate::consts::{MIN_PROFILABLE_LENGTH, MIN_SEGMENT_LENGTH};
use crate::ring;
use crate::seg::{SegError, SegId, SegResult, Segment, SegmentedProfile};
use log::debug;
use num::ToPrimitive;

/// 候选边界: 目标环上的索引加上继承的来源身份.
struct Mapped {
    bound: usize,
    id: SegId,
    name: String,
}

/// 把 `source` 的分段模式迁移到长度为 `target_len` 的目标环上.
///
/// 每个来源边界按分数位置 `start / source_len` 映射到目标环
/// (四舍六入五成双), 产出的 segment 沿用来源的 id 与名称.
/// 映射后短于最小长度的 segment 被并入它较短的那个邻居, 其身份
/// 随之消失. 来源与目标等长时布局逐点保持.
///
/// # Errors
///
/// `target_len` 低于 [`MIN_PROFILABLE_LENGTH`] 时返回
/// [`SegError::InsufficientProfileLength`].
pub fn fit(source: &SegmentedProfile, target_len: usize) -> SegResult<SegmentedProfile> {
    if target_len < MIN_PROFILABLE_LENGTH {
        return Err(SegError::InsufficientProfileLength {
            len: target_len,
            min: MIN_PROFILABLE_LENGTH,
        });
    }
    let source_len = source.ring_len() as f64;
    let mut mapped: Vec<Mapped> = source
        .segments()
        .iter()
        .map(|s| {
            let fraction = s.start() as f64 / source_len;
            Mapped {
                bound: round_half_even(fraction * target_len as f64) % target_len,
                id: s.id(),
                name: s.name().to_owned(),
            }
        })
        .collect();

    // 吸收过短的 segment, 直到全部不低于最小长度
    loop {
        let k = mapped.len();
        if k == 1 {
            break;
        }
        let lens: Vec<usize> = (0..k)
            .map(|j| ring::interval_length(mapped[j].bound, mapped[(j + 1) % k].bound, target_len))
            .collect();
        let Some(short) = lens.iter().position(|&l| l < MIN_SEGMENT_LENGTH) else {
            break;
        };
        let prev = (short + k - 1) % k;
        let next = (short + 1) % k;
        if lens[prev] <= lens[next] {
            // 并入前驱: 前驱的弧自然延伸到本 segment 的终点
            mapped.remove(short);
        } else {
            // 并入后继: 后继的弧提前到本 segment 的起点
            mapped[next].bound = mapped[short].bound;
            mapped.remove(short);
        }
    }

    let k = mapped.len();
    debug!(
        "pattern 迁移 {} -> {target_len}: segment {} -> {k} 个",
        source.ring_len(),
        source.segment_count()
    );
    let mut segments = Vec::with_capacity(k);
    if k == 1 {
        let m = &mapped[0];
        segments.push(Segment::with_id(
            m.bound,
            m.bound,
            target_len,
            m.id,
            m.name.clone(),
        )?);
    } else {
        for j in 0..k {
            let end = mapped[(j + 1) % k].bound;
            let m = &mapped[j];
            segments.push(Segment::with_id(m.bound, end, target_len, m.id, m.name.clone())?);
        }
    }
    SegmentedProfile::link(segments)
}

/// 四舍六入五成双 (banker's rounding) 后转为索引.
fn round_half_even(x: f64) -> usize {
    debug_assert!(x >= 0.0);
    let floor = x.floor();
    let fraction = x - floor;
    let rounded = if fraction > 0.5 {
        floor + 1.0
    } else if fraction < 0.5 {
        floor
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    };
    match rounded.to_usize() {
        Some(v) => v,
        None => unreachable!("边界比例映射必为非负有限值"),
    }
}
