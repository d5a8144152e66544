//! 从原始测量序列探测形态特征并生成初始分段.
//!
//! 流程: 环形滑动平均平滑 -> 邻点 delta -> delta 再平滑 ->
//! block 归属与局部极值 -> 候选边界 -> 间隔修剪 -> 链接成
//! [`SegmentedProfile`].

use crate::consts::{
    DEFAULT_BOUNDARY_SPACING, DEFAULT_DELTA_THRESHOLD, MIN_PROFILABLE_LENGTH, MIN_SEGMENT_LENGTH,
};
use crate::ring;
use crate::seg::{SegError, SegResult, Segment, SegmentedProfile};
use log::debug;
use ndarray::{Array1, ArrayView1};

/// 分段参数.
#[derive(Clone, Debug)]
pub struct SegmenterOptions {
    /// 平滑窗口宽度 (取为奇数). `None` 时使用与序列长度成正比的
    /// 默认值.
    pub smooth_window: Option<usize>,
    /// block 判定的 delta 阈值.
    pub delta_threshold: f64,
    /// 候选边界之间允许的最小间隔, 不低于
    /// [`MIN_SEGMENT_LENGTH`] 生效.
    pub min_boundary_spacing: usize,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            smooth_window: None,
            delta_threshold: DEFAULT_DELTA_THRESHOLD,
            min_boundary_spacing: DEFAULT_BOUNDARY_SPACING,
        }
    }
}

/// 单个采样点的 block 归属.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockInfo {
    /// 所在 block 的编号, 从 1 起; 0 表示不属于任何 block.
    pub number: usize,
    /// 在 block 内的位置, 从 0 起.
    pub position: usize,
    /// block 覆盖的采样点数.
    pub size: usize,
    /// 是否为 block 的中点 (位置 `size / 2`; 位置 0 永不是中点).
    pub is_midpoint: bool,
}

/// 对原始测量序列做形态分段.
///
/// 平坦或无特征的序列退化为覆盖整个环的单一 segment. 产出的
/// profile 总是满足划分不变量, 且每个 segment 不短于生效的
/// 最小边界间隔.
///
/// # Errors
///
/// 序列短于 [`MIN_PROFILABLE_LENGTH`] 时返回
/// [`SegError::InsufficientProfileLength`].
pub fn segment(values: &[f64], opts: &SegmenterOptions) -> SegResult<SegmentedProfile> {
    let n = values.len();
    if n < MIN_PROFILABLE_LENGTH {
        return Err(SegError::InsufficientProfileLength {
            len: n,
            min: MIN_PROFILABLE_LENGTH,
        });
    }
    let window = opts.smooth_window.unwrap_or_else(|| default_window(n)) | 1;
    let smoothed = smooth(ArrayView1::from(values), window);
    let deltas = neighbour_deltas(smoothed.view());
    let sm_delta = smooth(deltas.view(), window);

    let mut bounds: Vec<usize> = vec![0];
    let blocks = detect_blocks(sm_delta.view(), opts.delta_threshold);
    for (i, info) in blocks.iter().enumerate() {
        if info.number != 0 && info.position == 0 {
            bounds.push(i);
            bounds.push(ring::wrap((i + info.size) as i64, n));
        }
    }
    for i in 0..n {
        if is_local_extremum(sm_delta.view(), i) {
            bounds.push(i);
        }
    }
    bounds.sort_unstable();
    bounds.dedup();

    let spacing = opts.min_boundary_spacing.max(MIN_SEGMENT_LENGTH);
    enforce_spacing(&mut bounds, n, spacing);
    debug!("profile 长度 {n}: 保留候选边界 {} 个", bounds.len());

    let k = bounds.len();
    let mut segments = Vec::with_capacity(k);
    if k == 1 {
        segments.push(Segment::new(bounds[0], bounds[0], n, "Seg_0")?);
    } else {
        for j in 0..k {
            segments.push(Segment::new(
                bounds[j],
                bounds[(j + 1) % k],
                n,
                format!("Seg_{j}"),
            )?);
        }
    }
    SegmentedProfile::link(segments)
}

/// 为每个采样点计算 block 归属.
///
/// block 是 `|delta| > threshold` 的连续游程 (不跨越原点拼接),
/// 编号从 1 起按出现顺序分配.
pub fn detect_blocks(deltas: ArrayView1<f64>, threshold: f64) -> Vec<BlockInfo> {
    let n = deltas.len();
    let mut info = vec![BlockInfo::default(); n];
    let mut number = 0;
    let mut i = 0;
    while i < n {
        if deltas[i].abs() > threshold {
            let mut j = i;
            while j < n && deltas[j].abs() > threshold {
                j += 1;
            }
            number += 1;
            let size = j - i;
            let mid = size / 2;
            for (position, slot) in info[i..j].iter_mut().enumerate() {
                *slot = BlockInfo {
                    number,
                    position,
                    size,
                    is_midpoint: position == mid && position != 0,
                };
            }
            i = j;
        } else {
            i += 1;
        }
    }
    info
}

/// 环形居中滑动平均. `window` 必须为奇数.
fn smooth(values: ArrayView1<f64>, window: usize) -> Array1<f64> {
    debug_assert!(window % 2 == 1);
    let n = values.len();
    let half = (window / 2) as i64;
    Array1::from_shape_fn(n, |i| {
        let mut acc = 0.0;
        for k in -half..=half {
            acc += values[ring::wrap(i as i64 + k, n)];
        }
        acc / window as f64
    })
}

/// 每个点取环上前后邻点之差 `v[i+1] - v[i-1]`.
fn neighbour_deltas(values: ArrayView1<f64>) -> Array1<f64> {
    let n = values.len();
    Array1::from_shape_fn(n, |i| {
        values[ring::wrap(i as i64 + 1, n)] - values[ring::wrap(i as i64 - 1, n)]
    })
}

/// 点 `i` 是否为序列的严格局部极值 (相对环上前后邻点)?
fn is_local_extremum(values: ArrayView1<f64>, i: usize) -> bool {
    let n = values.len();
    let prev = values[ring::wrap(i as i64 - 1, n)];
    let next = values[ring::wrap(i as i64 + 1, n)];
    let v = values[i];
    (v < prev && v < next) || (v > prev && v > next)
}

/// 反复合并联合长度最小的相邻候选区间, 直到所有区间不短于
/// `spacing`. 索引 0 处的参考点边界永不移除.
fn enforce_spacing(bounds: &mut Vec<usize>, ring_len: usize, spacing: usize) {
    loop {
        let k = bounds.len();
        if k <= 1 {
            return;
        }
        let lens: Vec<usize> = (0..k)
            .map(|i| ring::interval_length(bounds[i], bounds[(i + 1) % k], ring_len))
            .collect();
        if lens.iter().all(|&l| l >= spacing) {
            return;
        }
        let mut best: Option<(usize, usize)> = None;
        for i in 0..k {
            let boundary = (i + 1) % k;
            if boundary == 0 {
                continue;
            }
            let joint = lens[i] + lens[(i + 1) % k];
            if best.map_or(true, |(_, l)| joint < l) {
                best = Some((boundary, joint));
            }
        }
        match best {
            Some((boundary, _)) => {
                bounds.remove(boundary);
            }
            None => return,
        }
    }
}

fn default_window(n: usize) -> usize {
    (n / 20).max(3) | 1
}
