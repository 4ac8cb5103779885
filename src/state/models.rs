//! 状态数据模型
//!
//! 定义 LineLeaderSnapshot, CleanersSnapshot 等快照结构和状态错误类型

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 状态操作错误
///
/// 所有变体都是校验类错误：状态保持不变，由调用方向用户提示
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("no valid names")]
    NoValidNames,

    #[error("need at least two names, got {got}")]
    NotEnoughNames { got: usize },

    #[error("index {index} out of range (list has {len} names)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("not active")]
    NotActive,
}

/// 排队领队快照 - 对应 store 中的 lineLeaderState
///
/// 字段名与同步镜像的 JSON 形状保持一致（camelCase + ISO-8601 时间戳）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LineLeaderSnapshot {
    #[serde(default)]
    pub names: Vec<String>,

    #[serde(default)]
    pub current_index: usize,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub timestamp: String,
}

/// 值日生快照 - 对应 store 中的 cleanersState
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CleanersSnapshot {
    #[serde(default)]
    pub names: Vec<String>,

    #[serde(default)]
    pub current_cleaners: Vec<String>,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub timestamp: String,
}

/// 当前时间的 ISO-8601 字符串（快照时间戳统一用这个）
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
