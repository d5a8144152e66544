//! 群体 (population) 级批量操作: 重新分段, 分段模式迁移与
//! 代表性成员选取, 附带协作式取消.

use crate::median;
use crate::seg::{SegResult, SegmentedProfile};
use crate::segmenter::{self, SegmenterOptions};
use crate::{fitter, ring};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
        use std::sync::atomic::AtomicUsize;
    }
}

/// 协作式取消信号. clone 后可跨线程共享同一信号.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// 新建一个未触发的取消信号.
    pub fn new() -> Self {
        Self::default()
    }

    /// 发出取消请求.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// 是否已请求取消?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// 群体成员: 一条封闭轮廓的测量序列与 (可选的) 分段结果.
#[derive(Clone, Debug)]
pub struct Member {
    values: Vec<f64>,
    profile: Option<SegmentedProfile>,
}

impl Member {
    /// 以原始测量序列新建成员, 尚无分段结果.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            profile: None,
        }
    }

    /// 原始测量序列.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 当前的分段结果.
    #[inline]
    pub fn profile(&self) -> Option<&SegmentedProfile> {
        self.profile.as_ref()
    }

    /// 覆盖分段结果.
    pub fn set_profile(&mut self, profile: SegmentedProfile) {
        self.profile = Some(profile);
    }

    /// 以成员自身 `reference` 处的地标重排分段结果.
    /// 尚无分段结果时不做任何事.
    pub fn root_at(&mut self, reference: usize) -> SegResult<()> {
        if let Some(profile) = &self.profile {
            self.profile = Some(profile.rooted_at(ring::wrap(
                reference as i64,
                self.values.len(),
            ))?);
        }
        Ok(())
    }
}

/// 共享同一参考点约定的成员集合.
#[derive(Clone, Debug, Default)]
pub struct Population {
    members: Vec<Member>,
}

impl Population {
    /// 由既有成员构建群体.
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    /// 追加一个成员.
    pub fn push(&mut self, member: Member) {
        self.members.push(member);
    }

    /// 成员个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// 群体是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 全部成员.
    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// 按下标取成员.
    pub fn member(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    /// 逐个成员重新分段, 返回完成的成员个数.
    ///
    /// 每处理一个成员前检查一次取消信号; 取消后已完成的成员保留
    /// 新结果, 其余维持原状. 任一成员失败时提前返回错误, 此前
    /// 完成的成员同样保留新结果.
    pub fn segment_all(
        &mut self,
        opts: &SegmenterOptions,
        cancel: &CancelToken,
    ) -> SegResult<usize> {
        let mut done = 0;
        for member in &mut self.members {
            if cancel.is_cancelled() {
                break;
            }
            member.profile = Some(segmenter::segment(&member.values, opts)?);
            done += 1;
        }
        debug!("群体重新分段: 完成 {done}/{} 个成员", self.members.len());
        Ok(done)
    }

    /// 把模板的分段模式迁移到每个成员上, 返回完成的成员个数.
    /// 取消与错误语义同 [`Self::segment_all`].
    pub fn fit_all(
        &mut self,
        template: &SegmentedProfile,
        cancel: &CancelToken,
    ) -> SegResult<usize> {
        let mut done = 0;
        for member in &mut self.members {
            if cancel.is_cancelled() {
                break;
            }
            member.profile = Some(fitter::fit(template, member.values.len())?);
            done += 1;
        }
        debug!("模式迁移: 完成 {done}/{} 个成员", self.members.len());
        Ok(done)
    }

    /// 选出测量序列与群体聚合中值曲线最接近的成员下标.
    pub fn representative_index(&self, increment: f64) -> SegResult<usize> {
        let curves: Vec<&[f64]> = self.members.iter().map(|m| m.values.as_slice()).collect();
        median::representative(&curves, increment)
    }
}

#[cfg(feature = "rayon")]
impl Population {
    /// [`Self::segment_all`] 的并行版本.
    ///
    /// 各成员独立处理, 处理前检查取消信号; 已在执行中的成员不会
    /// 被打断, 完成个数是准确的.
    pub fn par_segment_all(
        &mut self,
        opts: &SegmenterOptions,
        cancel: &CancelToken,
    ) -> SegResult<usize> {
        let done = AtomicUsize::new(0);
        self.members
            .par_iter_mut()
            .try_for_each(|member| -> SegResult<()> {
                if cancel.is_cancelled() {
                    return Ok(());
                }
                member.profile = Some(segmenter::segment(&member.values, opts)?);
                done.fetch_add(1, Ordering::Release);
                Ok(())
            })?;
        Ok(done.load(Ordering::Acquire))
    }

    /// [`Self::fit_all`] 的并行版本, 语义同 [`Self::par_segment_all`].
    pub fn par_fit_all(
        &mut self,
        template: &SegmentedProfile,
        cancel: &CancelToken,
    ) -> SegResult<usize> {
        let done = AtomicUsize::new(0);
        self.members
            .par_iter_mut()
            .try_for_each(|member| -> SegResult<()> {
                if cancel.is_cancelled() {
                    return Ok(());
                }
                member.profile = Some(fitter::fit(template, member.values.len())?);
                done.fetch_add(1, Ordering::Release);
                Ok(())
            })?;
        Ok(done.load(Ordering::Acquire))
    }
}
