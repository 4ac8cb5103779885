//! 名单文件监听模块
//!
//! watch 模式下监听数据目录里名单原文的外部编辑（编辑器、同步盘），
//! 相当于把"输入框变更"事件接进控制器

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::store::keys;

// ═══════════════════════════════════════════════════════════════════
// 文件变更事件
// ═══════════════════════════════════════════════════════════════════

/// 变更涉及哪个工具的名单
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChangeKind {
    /// 随机点名的名单
    NamePicker,
    /// 排队领队的名单
    LineLeader,
    /// 值日生的名单
    Cleaners,
    /// 其他文件（快照、日志等，不用反馈给控制器）
    Other,
}

/// 名单文件变更事件
#[derive(Debug, Clone)]
pub struct RosterChange {
    /// 变更的文件路径
    pub path: PathBuf,
    /// 涉及的名单
    pub kind: RosterChangeKind,
}

impl RosterChange {
    /// 从路径推断变更类型
    pub fn from_path(path: PathBuf) -> Self {
        let kind = Self::classify_path(&path);
        Self { path, kind }
    }

    /// 按文件名分类
    fn classify_path(path: &Path) -> RosterChangeKind {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        match file_name {
            keys::SAVED_NAMES => RosterChangeKind::NamePicker,
            keys::SAVED_LINE_LEADER_NAMES => RosterChangeKind::LineLeader,
            keys::SAVED_CLEANERS_NAMES => RosterChangeKind::Cleaners,
            _ => RosterChangeKind::Other,
        }
    }

    /// 是否是需要反馈给控制器的名单编辑
    pub fn is_roster_edit(&self) -> bool {
        !matches!(self.kind, RosterChangeKind::Other)
    }
}

// ═══════════════════════════════════════════════════════════════════
// RosterWatcher
// ═══════════════════════════════════════════════════════════════════

/// 名单文件监听器
///
/// 使用 notify 监听数据目录，
/// 通过 debounce 避免编辑器连环写入产生的大量事件
pub struct RosterWatcher {
    store_dir: PathBuf,
    /// debouncer (持有 watcher)
    _debouncer: Debouncer<RecommendedWatcher>,
    /// 事件接收端
    rx: Receiver<Result<Vec<DebouncedEvent>, notify::Error>>,
}

impl RosterWatcher {
    /// 创建新的监听器
    ///
    /// # Arguments
    /// * `store_dir` - 数据目录（.classroom）
    /// * `debounce_ms` - 防抖延迟（毫秒）
    pub fn new(store_dir: PathBuf, debounce_ms: u64) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let mut debouncer = new_debouncer(Duration::from_millis(debounce_ms), tx)?;

        debouncer
            .watcher()
            .watch(&store_dir, RecursiveMode::Recursive)?;

        Ok(Self {
            store_dir,
            _debouncer: debouncer,
            rx,
        })
    }

    /// 创建默认配置的监听器 (500ms debounce)
    pub fn with_defaults(store_dir: PathBuf) -> Result<Self> {
        Self::new(store_dir, 500)
    }

    /// 尝试获取变更事件（非阻塞）
    ///
    /// 返回自上次调用以来的所有变更事件
    pub fn poll_changes(&self) -> Vec<RosterChange> {
        let mut changes = Vec::new();

        // 非阻塞接收所有待处理事件
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        if self.should_ignore(&event.path) {
                            continue;
                        }
                        changes.push(RosterChange::from_path(event.path));
                    }
                }
                Err(e) => {
                    eprintln!("Roster watcher error: {:?}", e);
                }
            }
        }

        // 去重（同一文件可能有多个事件）
        changes.dedup_by(|a, b| a.path == b.path);
        changes
    }

    /// 判断是否应该忽略该路径
    fn should_ignore(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        // 自己追加的日志不算编辑
        if path_str.ends_with("activity.log") {
            return true;
        }

        // 编辑器临时文件
        if path_str.ends_with(".swp") || path_str.ends_with(".tmp") || path_str.ends_with("~") {
            return true;
        }

        false
    }

    /// 被监听的数据目录
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }
}
