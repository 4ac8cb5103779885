//! 同步状态指示
//!
//! 面向展示层的四态指示：idle / syncing / success / error。
//! 终态保留一小段时间后自动回到 idle

use std::time::{Duration, Instant};

use super::debounce::Clock;

/// 同步状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Syncing,
    Success,
    Error,
}

impl SyncStatus {
    /// 终态会自动消退，syncing 不会
    pub fn is_terminal(self) -> bool {
        matches!(self, SyncStatus::Success | SyncStatus::Error)
    }
}

/// 状态格子
///
/// set 记下状态和时间；current 读取时对过期的终态做消退
#[derive(Debug)]
pub struct StatusCell<C: Clock> {
    clock: C,
    hold: Duration,
    status: SyncStatus,
    message: String,
    set_at: Option<Instant>,
}

impl<C: Clock> StatusCell<C> {
    pub fn new(clock: C, hold: Duration) -> Self {
        Self {
            clock,
            hold,
            status: SyncStatus::Idle,
            message: String::new(),
            set_at: None,
        }
    }

    pub fn set(&mut self, status: SyncStatus, message: impl Into<String>) {
        self.status = status;
        self.message = message.into();
        self.set_at = Some(self.clock.now());
    }

    /// 当前状态（过期终态读出来就是 idle）
    pub fn current(&self) -> SyncStatus {
        if self.expired() {
            SyncStatus::Idle
        } else {
            self.status
        }
    }

    /// 当前提示文案，idle 时没有
    pub fn message(&self) -> Option<&str> {
        if self.expired() || self.message.is_empty() {
            None
        } else {
            Some(&self.message)
        }
    }

    fn expired(&self) -> bool {
        match self.set_at {
            Some(at) => self.status.is_terminal() && self.clock.now() >= at + self.hold,
            None => true,
        }
    }
}
