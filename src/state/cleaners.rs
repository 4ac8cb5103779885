//! 值日生状态机
//!
//! 从名单里随机抽两个人，用有限历史降低连续重复的概率

use std::collections::{HashSet, VecDeque};

use rand::Rng;

use super::{now_timestamp, CleanersSnapshot, StateError};

/// 历史记录上限，超出后最旧的一条先被淘汰
pub const MAX_HISTORY: usize = 10;

/// 值日生状态机
///
/// 不变式：激活时 `current` 的两个名字都取自最近一次 pick 的名单，
/// 且来自不同的行（同名不同人时按行区分）。
/// 没有显式的停用操作：保持激活直到下一次 pick 覆盖。
#[derive(Debug, Clone, Default)]
pub struct PairPicker {
    names: Vec<String>,
    current: Option<[String; 2]>,
    history: VecDeque<[String; 2]>,
}

impl PairPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 携带已有历史（从 store 恢复时用）
    pub fn with_history(history: VecDeque<[String; 2]>) -> Self {
        let mut picker = Self::default();
        picker.history = history;
        picker.trim_history();
        picker
    }

    /// 从名单里抽一对值日生
    ///
    /// 均匀随机选两个不同的行。近期当过值日生的名字只是软排除：
    /// 不在历史里的候选不足两个时，退回到全名单随机
    pub fn pick<R: Rng>(
        &mut self,
        names: Vec<String>,
        rng: &mut R,
    ) -> Result<&[String; 2], StateError> {
        if names.len() < 2 {
            return Err(StateError::NotEnoughNames { got: names.len() });
        }

        let recent: HashSet<&str> = self
            .history
            .iter()
            .flat_map(|pair| pair.iter().map(String::as_str))
            .collect();

        let fresh: Vec<usize> = (0..names.len())
            .filter(|&i| !recent.contains(names[i].as_str()))
            .collect();

        let pool: Vec<usize> = if fresh.len() >= 2 {
            fresh
        } else {
            (0..names.len()).collect()
        };

        let first = pool[rng.gen_range(0..pool.len())];
        let second = loop {
            let candidate = pool[rng.gen_range(0..pool.len())];
            if candidate != first {
                break candidate;
            }
        };

        let pair = [names[first].clone(), names[second].clone()];
        self.history.push_back(pair.clone());
        self.trim_history();

        self.names = names;
        Ok(self.current.insert(pair))
    }

    /// 清掉当前的一对（名单编辑触发隐式复位时用），历史保留
    pub fn deactivate(&mut self) {
        self.current = None;
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn current_pair(&self) -> Option<&[String; 2]> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &VecDeque<[String; 2]> {
        &self.history
    }

    fn trim_history(&mut self) {
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }

    /// 导出带时间戳的快照（历史不随快照同步，单独存本地）
    pub fn to_snapshot(&self) -> CleanersSnapshot {
        CleanersSnapshot {
            names: self.names.clone(),
            current_cleaners: self
                .current
                .as_ref()
                .map(|pair| pair.to_vec())
                .unwrap_or_default(),
            is_active: self.is_active(),
            timestamp: now_timestamp(),
        }
    }

    /// 从快照恢复，历史另行注入
    ///
    /// 快照里不足两个名字时按未激活恢复
    pub fn from_snapshot(snap: CleanersSnapshot, history: VecDeque<[String; 2]>) -> Self {
        let current = if snap.is_active && snap.current_cleaners.len() >= 2 {
            Some([
                snap.current_cleaners[0].clone(),
                snap.current_cleaners[1].clone(),
            ])
        } else {
            None
        };

        let mut picker = Self {
            names: snap.names,
            current,
            history,
        };
        picker.trim_history();
        picker
    }
}
