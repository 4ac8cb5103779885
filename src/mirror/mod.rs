//! 同步镜像模块
//!
//! 快照的远端镜像抽象：push 尽力而为，任何失败都降级为仅本地保存，
//! 绝不向调用方抛错；pull 远端优先，失败回落本地

pub mod dir_mirror;
pub mod http_mirror;

use crate::config::RemoteConfig;
use crate::store::LocalStore;

pub use dir_mirror::DirMirror;
pub use http_mirror::HttpMirror;

use anyhow::Result;

/// 远端镜像
///
/// 实现方只负责一次读/写尝试；重试、排队都不在契约内。
/// 失败语义由 push_with_fallback / pull_with_fallback 统一处理
pub trait RemoteMirror {
    /// 把一个键的快照写到远端
    fn push(&self, key: &str, value: &str) -> Result<()>;

    /// 从远端读一个键的快照，不存在时返回 None
    fn pull(&self, key: &str) -> Result<Option<String>>;

    /// 展示用描述（doctor / status）
    fn describe(&self) -> String;
}

/// 一次 push 的终态
///
/// 永远是个值，不是错误：同步失败对用户只是一个状态提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 远端和本地都写成功
    Synced,
    /// 远端没写成（或根本没配置远端），本地已保存
    OfflineSavedLocally,
    /// 连本地都没写成
    Error(String),
}

impl SyncOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, SyncOutcome::Error(_))
    }
}

/// 根据配置构造镜像实例
pub fn mirror_from_config(remote: Option<&RemoteConfig>) -> Option<Box<dyn RemoteMirror>> {
    match remote {
        Some(RemoteConfig::Dir { path }) => Some(Box::new(DirMirror::new(path.clone()))),
        Some(RemoteConfig::Http { base_url, token }) => {
            Some(Box::new(HttpMirror::new(base_url.clone(), token.clone())))
        }
        None => None,
    }
}

/// 推送快照：先试远端，随后总是写本地备份
///
/// 远端成功 + 本地成功 → Synced；
/// 远端失败或未配置 + 本地成功 → OfflineSavedLocally；
/// 本地失败 → Error
pub fn push_with_fallback(
    store: &LocalStore,
    mirror: Option<&dyn RemoteMirror>,
    key: &str,
    value: &str,
) -> SyncOutcome {
    let remote_ok = match mirror {
        Some(m) => m.push(key, value).is_ok(),
        None => false,
    };

    // 本地备份无论远端成败都要写
    if let Err(e) = store.put(key, value) {
        return SyncOutcome::Error(e.to_string());
    }

    if remote_ok {
        SyncOutcome::Synced
    } else {
        SyncOutcome::OfflineSavedLocally
    }
}

/// 拉取快照：远端优先，失败或缺失时回落本地，两边都没有则 None
pub fn pull_with_fallback(
    store: &LocalStore,
    mirror: Option<&dyn RemoteMirror>,
    key: &str,
) -> Option<String> {
    if let Some(m) = mirror {
        if let Ok(Some(value)) = m.pull(key) {
            return Some(value);
        }
    }
    store.get(key)
}
