//! 群体聚合中值曲线与代表性成员选取.
//!
//! 成员的测量序列长度各异, 先归一化到 `[0, 100)` 的位置轴上聚合,
//! 再在各 bucket 内取中值, 得到与具体长度无关的中值曲线.

use crate::consts::NORMALISED_SPAN;
use crate::seg::{SegError, SegResult};
use itertools::izip;
use log::debug;
use ordered_float::OrderedFloat;

/// 归一化位置轴上的测量值聚合器.
#[derive(Clone, Debug)]
pub struct ProfileAggregate {
    increment: f64,
    bins: Vec<Vec<f64>>,
}

impl ProfileAggregate {
    /// 以给定的 bucket 步长 (归一化坐标) 初始化.
    ///
    /// # Panics
    ///
    /// 步长不在 `(0, 100]` 内时 panic.
    pub fn new(increment: f64) -> Self {
        assert!(
            increment > 0.0 && increment <= NORMALISED_SPAN,
            "bucket 步长必须落在 (0, 100] 内"
        );
        let nbins = (NORMALISED_SPAN / increment).ceil() as usize;
        Self {
            increment,
            bins: vec![Vec::new(); nbins],
        }
    }

    /// bucket 个数.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// 各 bucket 的起始位置 (归一化坐标).
    pub fn positions(&self) -> Vec<f64> {
        (0..self.bins.len())
            .map(|i| i as f64 * self.increment)
            .collect()
    }

    /// 加入一个成员的测量序列, 逐点按归一化位置落入对应 bucket.
    pub fn add(&mut self, values: &[f64]) {
        let len = values.len() as f64;
        for (i, &v) in values.iter().enumerate() {
            let pos = i as f64 / len * NORMALISED_SPAN;
            let bin = ((pos / self.increment) as usize).min(self.bins.len() - 1);
            self.bins[bin].push(v);
        }
    }

    /// 计算每个 bucket 的中值, 得到聚合中值曲线.
    ///
    /// 空 bucket 以环上后继 (其次前驱) 的中值填补.
    ///
    /// # Errors
    ///
    /// 某个空 bucket 的两个环邻居也为空时返回
    /// [`SegError::UnrepairableAggregate`].
    pub fn median_curve(&self) -> SegResult<Vec<f64>> {
        let n = self.bins.len();
        let mut medians: Vec<f64> = self.bins.iter().map(|b| median_of(b)).collect();
        for i in 0..n {
            if medians[i].is_nan() {
                let next = medians[(i + 1) % n];
                let prev = medians[(i + n - 1) % n];
                medians[i] = if !next.is_nan() {
                    next
                } else if !prev.is_nan() {
                    prev
                } else {
                    return Err(SegError::UnrepairableAggregate);
                };
            }
        }
        Ok(medians)
    }
}

/// 在归一化位置 `pos` (属于 `[0, 100)`) 处对成员曲线做环形线性插值.
pub fn interpolate_at(values: &[f64], pos: f64) -> f64 {
    let len = values.len();
    let x = pos / NORMALISED_SPAN * len as f64;
    let i0 = (x.floor() as usize) % len;
    let i1 = (i0 + 1) % len;
    let t = x - x.floor();
    values[i0] * (1.0 - t) + values[i1] * t
}

/// 选出与聚合中值曲线差异最小的真实成员的下标.
///
/// 差异取各 bucket 位置上 |成员插值 - 中值| 之和. 并列时返回最先
/// 遇到的成员; 没有严格更优者时维持首个成员这一缺省候选.
///
/// # Errors
///
/// `curves` 为空时返回 [`SegError::InsufficientPopulation`];
/// 中值曲线无法修补时返回 [`SegError::UnrepairableAggregate`].
pub fn representative(curves: &[&[f64]], increment: f64) -> SegResult<usize> {
    if curves.is_empty() {
        return Err(SegError::InsufficientPopulation);
    }
    let mut aggregate = ProfileAggregate::new(increment);
    for curve in curves {
        aggregate.add(curve);
    }
    let median = aggregate.median_curve()?;
    let positions = aggregate.positions();

    let best = curves
        .iter()
        .enumerate()
        .min_by_key(|(_, curve)| {
            let score: f64 = izip!(&positions, &median)
                .map(|(&pos, &m)| (interpolate_at(curve, pos) - m).abs())
                .sum();
            OrderedFloat(score)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    debug!("代表性成员: 下标 {best} (共 {} 个)", curves.len());
    Ok(best)
}

fn median_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid].0
    } else {
        (sorted[mid - 1].0 + sorted[mid].0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_BIN_INCREMENT;

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median_of(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median_of(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        assert!(median_of(&[]).is_nan());
    }

    #[test]
    fn interpolation_is_circular() {
        let values = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(interpolate_at(&values, 0.0), 0.0);
        assert_eq!(interpolate_at(&values, 25.0), 10.0);
        // 末点与首点之间: 75 -> 30, 87.5 -> (30 + 0) / 2
        assert_eq!(interpolate_at(&values, 87.5), 15.0);
    }

    /// 成员短于 bucket 个数时, 空 bucket 由环邻居填补.
    #[test]
    fn sparse_bins_are_repaired() {
        let mut aggregate = ProfileAggregate::new(DEFAULT_BIN_INCREMENT);
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        aggregate.add(&values);
        let curve = aggregate.median_curve().unwrap();
        assert_eq!(curve.len(), 200);
        assert!(curve.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn empty_aggregate_is_unrepairable() {
        let aggregate = ProfileAggregate::new(DEFAULT_BIN_INCREMENT);
        assert_eq!(
            aggregate.median_curve(),
            Err(SegError::UnrepairableAggregate)
        );
    }

    /// 与聚合中值逐点一致的成员一定被选中.
    #[test]
    fn exact_median_member_is_selected() {
        let low = vec![0.0; 200];
        let mid = vec![5.0; 200];
        let high = vec![10.0; 200];
        let curves: Vec<&[f64]> = vec![&low, &high, &mid];
        assert_eq!(representative(&curves, DEFAULT_BIN_INCREMENT).unwrap(), 2);
    }

    /// 并列时选最先遇到的成员.
    #[test]
    fn ties_prefer_the_first_member() {
        let a = vec![1.0; 120];
        let b = vec![1.0; 120];
        let curves: Vec<&[f64]> = vec![&a, &b];
        assert_eq!(representative(&curves, DEFAULT_BIN_INCREMENT).unwrap(), 0);
    }

    #[test]
    fn empty_population_is_rejected() {
        assert_eq!(
            representative(&[], DEFAULT_BIN_INCREMENT),
            Err(SegError::InsufficientPopulation)
        );
    }
}
