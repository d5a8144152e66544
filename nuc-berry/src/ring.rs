//! 环形 (ring) 索引空间的基础运算.
//!
//! 封闭轮廓上的所有索引都以环总长为模解释, 区间一律取半开形式
//! `[start, end)`. 本模块是全库区间长度与归属判断的唯一事实来源.

use either::Either;

/// 将任意整数偏移 `i` 规范化到 `[0, length)` 内. 对负数同样有效.
///
/// # Panics
///
/// 当 `length == 0` 时 panic.
#[inline]
pub fn wrap(i: i64, length: usize) -> usize {
    assert!(length >= 1, "环长必须为正");
    i.rem_euclid(length as i64) as usize
}

/// 计算环上半开区间 `[start, end)` 的长度.
///
/// 当 `end >= start` 时为 `end - start`; 当 `end < start` (跨越原点) 时为
/// `end + (length - start)`. 注意 `start == end` 返回 0; 全环段的长度
/// 语义由 [`Segment`](crate::Segment) 自身处理.
#[inline]
pub fn interval_length(start: usize, end: usize, length: usize) -> usize {
    debug_assert!(start < length && end < length);
    if end >= start {
        end - start
    } else {
        end + (length - start)
    }
}

/// 区间 `[start, end)` 是否跨越环原点 (即 `end < start`)?
#[inline]
pub fn wraps(start: usize, end: usize) -> bool {
    end < start
}

/// 判断 `index` 是否落在环上半开区间 `[start, end)` 内.
///
/// `start == end` 视为空区间. 跨越原点时按两段并集判断, 起点含入,
/// 终点排除, 保证相邻区间互不重叠.
#[inline]
pub fn contains(start: usize, end: usize, index: usize, length: usize) -> bool {
    debug_assert!(start < length && end < length && index < length);
    if wraps(start, end) {
        index >= start || index < end
    } else {
        index >= start && index < end
    }
}

/// 以环序迭代半开区间 `[start, end)` 内的所有索引.
///
/// `start == end` 产生空迭代.
#[inline]
pub fn indices(start: usize, end: usize, length: usize) -> impl Iterator<Item = usize> {
    if wraps(start, end) {
        Either::Left((start..length).chain(0..end))
    } else {
        Either::Right(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 负偏移与超界偏移的规范化.
    #[test]
    fn wrap_normalises_offsets() {
        assert_eq!(wrap(0, 10), 0);
        assert_eq!(wrap(13, 10), 3);
        assert_eq!(wrap(-1, 10), 9);
        assert_eq!(wrap(-25, 10), 5);
    }

    /// 普通区间与跨原点区间的长度.
    #[test]
    fn interval_length_wrapping() {
        assert_eq!(interval_length(2, 5, 10), 3);
        assert_eq!(interval_length(5, 2, 10), 7);
        assert_eq!(interval_length(0, 9, 10), 9);
        assert_eq!(interval_length(4, 4, 10), 0);
    }

    /// 归属判断: 起点含入, 终点排除.
    #[test]
    fn contains_half_open() {
        assert!(contains(2, 5, 2, 10));
        assert!(contains(2, 5, 4, 10));
        assert!(!contains(2, 5, 5, 10));
        assert!(!contains(2, 5, 9, 10));

        assert!(contains(8, 2, 8, 10));
        assert!(contains(8, 2, 0, 10));
        assert!(contains(8, 2, 1, 10));
        assert!(!contains(8, 2, 2, 10));
        assert!(!contains(8, 2, 7, 10));
    }

    /// 环序迭代既覆盖普通区间也覆盖跨原点区间.
    #[test]
    fn indices_follow_ring_order() {
        let plain: Vec<usize> = indices(2, 5, 10).collect();
        assert_eq!(plain, vec![2, 3, 4]);

        let wrapped: Vec<usize> = indices(8, 2, 10).collect();
        assert_eq!(wrapped, vec![8, 9, 0, 1]);

        assert_eq!(indices(4, 4, 10).count(), 0);
    }
}
