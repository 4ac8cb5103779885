//! 自动同步防抖
//!
//! 静默窗口内的连续变更合并成一次推送。时钟通过 trait 注入，
//! 测试里可以用假时钟拨快时间

use std::time::{Duration, Instant};

/// 单调时钟
pub trait Clock {
    fn now(&self) -> Instant;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 可取消的延迟任务句柄
///
/// schedule 把截止时间推到 now + window：窗口内的新变更
/// 隐式取消旧任务并重新计时
#[derive(Debug)]
pub struct Debouncer<C: Clock> {
    clock: C,
    window: Duration,
    deadline: Option<Instant>,
}

impl<C: Clock> Debouncer<C> {
    pub fn new(clock: C, window: Duration) -> Self {
        Self {
            clock,
            window,
            deadline: None,
        }
    }

    /// 登记一次变更：重置静默窗口
    pub fn schedule(&mut self) {
        self.deadline = Some(self.clock.now() + self.window);
    }

    /// 取消挂起的任务（显式同步已经把事干了）
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// 截止时间到了就消费掉任务并返回 true
    pub fn fire_if_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// 不等窗口，立刻消费挂起的任务（进程收尾时用）
    pub fn fire_now(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
