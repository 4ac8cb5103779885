//! 配置模块
//!
//! .classroom/config.json：远端镜像设置和行为开关，所有字段都有默认值

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::LocalStore;
use crate::utils::{read_json_or_default, write_json};

fn default_debounce_ms() -> u64 {
    2000
}

fn default_status_hold_ms() -> u64 {
    3000
}

/// 远端镜像配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RemoteConfig {
    /// 共享目录充当远端（如网络盘挂载点）
    #[serde(rename_all = "camelCase")]
    Dir { path: PathBuf },

    /// HTTP 服务充当远端
    #[serde(rename_all = "camelCase")]
    Http {
        base_url: String,

        #[serde(default)]
        token: Option<String>,
    },
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// 未配置远端时，同步降级为仅本地保存
    #[serde(default)]
    pub remote: Option<RemoteConfig>,

    /// 自动同步的静默窗口（毫秒）
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// 终态同步状态的保留时长（毫秒），过后回到 idle
    #[serde(default = "default_status_hold_ms")]
    pub status_hold_ms: u64,

    /// 值日生名单被编辑时是否隐式清掉当前的一对
    #[serde(default)]
    pub reset_cleaners_on_edit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: None,
            debounce_ms: default_debounce_ms(),
            status_hold_ms: default_status_hold_ms(),
            reset_cleaners_on_edit: false,
        }
    }
}

impl AppConfig {
    /// 从存储目录加载配置，缺失或损坏时用默认值
    pub fn load(store: &LocalStore) -> Self {
        read_json_or_default(&store.config_path())
    }

    /// 保存配置
    pub fn save(&self, store: &LocalStore) -> Result<()> {
        write_json(&store.config_path(), self)
    }
}
