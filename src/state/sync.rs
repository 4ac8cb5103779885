//! 状态同步逻辑
//!
//! 快照先落本地 store，再尽力推送远端镜像；启动时远端优先恢复

use std::collections::VecDeque;

use crate::mirror::{push_with_fallback, RemoteMirror, SyncOutcome};
use crate::store::{keys, LocalStore};

use super::{CleanersSnapshot, LineLeaderSnapshot, PairPicker, Rotation};

// ═══════════════════════════════════════════════════════════════════
// 推送
// ═══════════════════════════════════════════════════════════════════

/// 推送排队领队快照
///
/// 变更发生时先取快照再发送：发送的永远是变更完成那一刻的状态
pub fn sync_line_leader(
    store: &LocalStore,
    mirror: Option<&dyn RemoteMirror>,
    rotation: &Rotation,
) -> SyncOutcome {
    let snapshot = rotation.to_snapshot();
    let outcome = push_snapshot(store, mirror, keys::LINE_LEADER_STATE, &snapshot);
    log_outcome(store, "line leader", &outcome);
    outcome
}

/// 推送值日生快照
///
/// 历史不进快照，单独落本地（跨进程保留重复规避的记忆）
pub fn sync_cleaners(
    store: &LocalStore,
    mirror: Option<&dyn RemoteMirror>,
    picker: &PairPicker,
) -> SyncOutcome {
    if let Ok(history_json) = serde_json::to_string(picker.history()) {
        // 历史写不进去不影响同步结果
        let _ = store.put(keys::CLEANERS_HISTORY, &history_json);
    }

    let snapshot = picker.to_snapshot();
    let outcome = push_snapshot(store, mirror, keys::CLEANERS_STATE, &snapshot);
    log_outcome(store, "cleaners", &outcome);
    outcome
}

fn push_snapshot<T: serde::Serialize>(
    store: &LocalStore,
    mirror: Option<&dyn RemoteMirror>,
    key: &str,
    snapshot: &T,
) -> SyncOutcome {
    let json = match serde_json::to_string(snapshot) {
        Ok(json) => json,
        Err(e) => return SyncOutcome::Error(format!("serialize {}: {}", key, e)),
    };
    push_with_fallback(store, mirror, key, &json)
}

fn log_outcome(store: &LocalStore, what: &str, outcome: &SyncOutcome) {
    let line = match outcome {
        SyncOutcome::Synced => format!("SYNC: {} state pushed to mirror", what),
        SyncOutcome::OfflineSavedLocally => format!("SYNC: {} state saved locally (offline)", what),
        SyncOutcome::Error(e) => format!("SYNC: {} state save failed: {}", what, e),
    };
    let _ = store.log_event(&line);
}

// ═══════════════════════════════════════════════════════════════════
// 恢复
// ═══════════════════════════════════════════════════════════════════

/// 恢复排队领队状态：远端优先，远端拉不到或解析不了再看本地
pub fn load_line_leader(store: &LocalStore, mirror: Option<&dyn RemoteMirror>) -> Option<Rotation> {
    let snapshot: LineLeaderSnapshot = load_snapshot(store, mirror, keys::LINE_LEADER_STATE)?;
    Some(Rotation::from_snapshot(snapshot))
}

/// 恢复值日生状态（历史总是从本地取）
pub fn load_cleaners(store: &LocalStore, mirror: Option<&dyn RemoteMirror>) -> Option<PairPicker> {
    let history = load_history(store);
    let snapshot: CleanersSnapshot = load_snapshot(store, mirror, keys::CLEANERS_STATE)?;
    Some(PairPicker::from_snapshot(snapshot, history))
}

/// 读取本地保存的值日生历史
pub fn load_history(store: &LocalStore) -> VecDeque<[String; 2]> {
    store
        .get(keys::CLEANERS_HISTORY)
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn load_snapshot<T: for<'de> serde::Deserialize<'de>>(
    store: &LocalStore,
    mirror: Option<&dyn RemoteMirror>,
    key: &str,
) -> Option<T> {
    // 远端内容损坏时还要再试本地，所以不能直接用合并后的 pull 结果
    if let Some(m) = mirror {
        if let Ok(Some(json)) = m.pull(key) {
            if let Ok(snapshot) = serde_json::from_str(&json) {
                return Some(snapshot);
            }
        }
    }

    let json = store.get(key)?;
    serde_json::from_str(&json).ok()
}
