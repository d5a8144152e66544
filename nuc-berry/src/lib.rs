#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 提供生物对象 (细胞核等) 封闭轮廓 profile 的环形分段,
//! 分段编辑与分段模式迁移 (pattern transfer) 能力.
//!
//! 轮廓被抽象成长度为 `ring_len` 的环形索引空间, 每个索引携带一个
//! 测量值 (角度, 直径等). 分段 (segment) 是环上的半开区间
//! `[start, end)`, 一组分段无缝无重叠地覆盖整个环. 所有编辑操作
//! 都维护这一划分不变量.
//!
//! # 注意
//!
//! 1. 编辑操作是事务性的: 校验失败时返回错误, profile 保持原状,
//!   不存在部分修改.
//! 2. 在非期望情况下, 程序会直接 panic, 而不会导致内存错误.
//!   As what Rust promises.
//!
//! # 开发计划
//!
//! ### 环形索引运算 ✅
//!
//! 归一化, 区间长度, 归属判断与环序迭代.
//!
//! 实现位于 `nuc-berry/src/ring.rs`.
//!
//! ### segment 与 profile 数据结构 ✅
//!
//! segment 按向量位置决定相邻关系, 不存储引用; merge 来源
//! (provenance) 随 segment 值语义深拷贝.
//!
//! 实现位于 `nuc-berry/src/seg`.
//!
//! ### 边界编辑: update / shorten / lengthen / nudge / split ✅
//!
//! 变动的边界同步传播到前驱后继; nudge 整体平移并逐层平移
//! merge 来源.
//!
//! ### merge 与精确 unmerge ✅
//!
//! merge 记录输入的精确副本, unmerge 无损还原 id, 名称与边界.
//!
//! ### 形态分段 (segmenter) ✅
//!
//! 环形滑动平均 -> 邻点 delta -> block 探测与局部极值 ->
//! 候选边界间隔修剪.
//!
//! 实现位于 `nuc-berry/src/segmenter.rs`.
//!
//! ### 分段模式迁移 (fitter) ✅
//!
//! 边界按分数位置映射 (四舍六入五成双), 过短的 segment 并入较短
//! 的邻居.
//!
//! 实现位于 `nuc-berry/src/fitter.rs`.
//!
//! ### 群体聚合与代表性成员 ✅
//!
//! 归一化 bucket 聚合中值曲线, 空 bucket 以环邻居填补;
//! 代表性成员取与中值曲线绝对差之和最小者.
//!
//! 实现位于 `nuc-berry/src/median.rs`.
//!
//! ### 群体批量操作与协作式取消 ✅
//!
//! 批量分段 / 批量迁移, 取消后保留部分进度; `rayon` feature
//! 提供并行版本.
//!
//! 实现位于 `nuc-berry/src/population.rs`.
//!
//! ### 完善代码文档 ✅
//!
//! 给每个 public API 提供文档, 并视情况给 private API 提供文档.

pub mod ring;

/// 环形分段数据结构与编辑操作.
mod seg;

pub use seg::{SegError, SegId, SegResult, Segment, SegmentedProfile};

pub mod consts;

pub mod fitter;
pub mod median;
pub mod population;
pub mod segmenter;

pub mod prelude;
