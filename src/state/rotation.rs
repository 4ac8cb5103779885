//! 排队领队状态机
//!
//! 有序名单 + 当前下标 + 激活标志。顺序严格按解析顺序，没有随机性

use super::{now_timestamp, LineLeaderSnapshot, StateError};

/// 一次 advance 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// 轮到下一个人（携带新下标）
    Moved(usize),
    /// 最后一个人也轮完了，回到未激活状态
    CycleComplete,
}

/// 排队领队状态机
///
/// 不变式：`current_index` 为 Some 时必有 `current_index < names.len()`；
/// 激活状态等价于 `current_index.is_some()`。
/// 轮完一整圈后回到未激活，但名单保留，供下一轮 start 复用。
#[derive(Debug, Clone, Default)]
pub struct Rotation {
    names: Vec<String>,
    current_index: Option<usize>,
}

impl Rotation {
    /// 用一份名单开启新的一轮，从第一个人开始
    pub fn start(names: Vec<String>) -> Result<Self, StateError> {
        if names.is_empty() {
            return Err(StateError::NoValidNames);
        }
        Ok(Self {
            names,
            current_index: Some(0),
        })
    }

    /// 手动跳到指定的人
    ///
    /// 下标之前的人视为已轮过（这只是展示口径，状态机只记录下标）
    pub fn select(&mut self, index: usize) -> Result<(), StateError> {
        if self.current_index.is_none() {
            return Err(StateError::NotActive);
        }
        if index >= self.names.len() {
            return Err(StateError::IndexOutOfRange {
                index,
                len: self.names.len(),
            });
        }
        self.current_index = Some(index);
        Ok(())
    }

    /// 轮到下一个人
    ///
    /// 在最后一个人处 advance 是终止复位而不是回绕：
    /// 状态回到未激活，下一次 start 重新从 0 开始
    pub fn advance(&mut self) -> Result<Advance, StateError> {
        let index = self.current_index.ok_or(StateError::NotActive)?;

        if index + 1 >= self.names.len() {
            self.current_index = None;
            return Ok(Advance::CycleComplete);
        }

        self.current_index = Some(index + 1);
        Ok(Advance::Moved(index + 1))
    }

    pub fn is_active(&self) -> bool {
        self.current_index.is_some()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// 当前领队的名字（未激活时为 None）
    pub fn current_name(&self) -> Option<&str> {
        self.current_index.map(|i| self.names[i].as_str())
    }

    /// 该下标是否已经轮过（展示用）
    pub fn is_processed(&self, index: usize) -> bool {
        match self.current_index {
            Some(current) => index < current,
            None => false,
        }
    }

    /// 导出带时间戳的快照
    pub fn to_snapshot(&self) -> LineLeaderSnapshot {
        LineLeaderSnapshot {
            names: self.names.clone(),
            current_index: self.current_index.unwrap_or(0),
            is_active: self.is_active(),
            timestamp: now_timestamp(),
        }
    }

    /// 从快照恢复
    ///
    /// 快照可能来自别的设备或旧版本：isActive 但下标越界、名单为空时
    /// 一律按未激活恢复，名单照常保留
    pub fn from_snapshot(snap: LineLeaderSnapshot) -> Self {
        let active = snap.is_active
            && !snap.names.is_empty()
            && snap.current_index < snap.names.len();

        Self {
            current_index: if active { Some(snap.current_index) } else { None },
            names: snap.names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[test]
    fn test_start_at_first_person() {
        let rotation = Rotation::start(roster()).unwrap();
        assert!(rotation.is_active());
        assert_eq!(rotation.current_index(), Some(0));
        assert_eq!(rotation.current_name(), Some("A"));
    }

    #[test]
    fn test_start_empty_is_error() {
        assert!(matches!(
            Rotation::start(vec![]),
            Err(StateError::NoValidNames)
        ));
    }

    #[test]
    fn test_full_cycle() {
        // start → 0, advance → 1, advance → 2, advance → 复位
        let mut rotation = Rotation::start(roster()).unwrap();
        assert_eq!(rotation.advance().unwrap(), Advance::Moved(1));
        assert_eq!(rotation.advance().unwrap(), Advance::Moved(2));
        assert_eq!(rotation.advance().unwrap(), Advance::CycleComplete);
        assert!(!rotation.is_active());

        // 名单保留，可以直接开新一轮
        let next = Rotation::start(rotation.names().to_vec()).unwrap();
        assert_eq!(next.current_index(), Some(0));
    }

    #[test]
    fn test_cycle_terminates_for_any_length() {
        // len-1 次 advance 后必然到达最后一个人，再一次必然复位
        for len in 1..=20 {
            let names: Vec<String> = (0..len).map(|i| format!("N{}", i)).collect();
            let mut rotation = Rotation::start(names).unwrap();

            for _ in 0..len - 1 {
                assert!(matches!(rotation.advance().unwrap(), Advance::Moved(_)));
            }
            assert_eq!(rotation.advance().unwrap(), Advance::CycleComplete);
        }
    }

    #[test]
    fn test_single_name_cycle() {
        let mut rotation = Rotation::start(vec!["Solo".to_string()]).unwrap();
        assert_eq!(rotation.advance().unwrap(), Advance::CycleComplete);
        assert!(!rotation.is_active());
    }

    #[test]
    fn test_select() {
        let mut rotation = Rotation::start(roster()).unwrap();
        rotation.select(2).unwrap();
        assert_eq!(rotation.current_name(), Some("C"));

        // 下标之前的人视为已轮过
        assert!(rotation.is_processed(0));
        assert!(rotation.is_processed(1));
        assert!(!rotation.is_processed(2));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut rotation = Rotation::start(roster()).unwrap();
        assert_eq!(
            rotation.select(3),
            Err(StateError::IndexOutOfRange { index: 3, len: 3 })
        );
        // 状态不变
        assert_eq!(rotation.current_index(), Some(0));
    }

    #[test]
    fn test_advance_inactive_is_error() {
        let mut rotation = Rotation::default();
        assert_eq!(rotation.advance(), Err(StateError::NotActive));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut rotation = Rotation::start(roster()).unwrap();
        rotation.advance().unwrap();

        let snap = rotation.to_snapshot();
        assert_eq!(snap.current_index, 1);
        assert!(snap.is_active);
        assert!(!snap.timestamp.is_empty());

        let restored = Rotation::from_snapshot(snap);
        assert_eq!(restored.current_index(), Some(1));
        assert_eq!(restored.names(), rotation.names());
    }

    #[test]
    fn test_from_snapshot_rejects_bad_index() {
        // 越界下标按未激活恢复，名单保留
        let snap = LineLeaderSnapshot {
            names: vec!["A".to_string()],
            current_index: 5,
            is_active: true,
            timestamp: String::new(),
        };
        let restored = Rotation::from_snapshot(snap);
        assert!(!restored.is_active());
        assert_eq!(restored.names().to_vec(), vec!["A".to_string()]);
    }
}
