//! 本地持久化模块
//!
//! 以 .classroom 目录为根的键值存储：每个键一个文件，覆盖写、
//! 同进程读写一致。名单原文和状态快照都存在这里

use anyhow::{anyhow, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::utils::{append_file, dir_exists, try_read_file, write_file};

/// 数据目录名
pub const STORE_DIR: &str = ".classroom";

/// 存储键
///
/// 名单原文三个键、快照两个键与同步镜像共用；
/// cleanersHistory 只存本地，不参与同步
pub mod keys {
    pub const SAVED_NAMES: &str = "savedNames";
    pub const SAVED_LINE_LEADER_NAMES: &str = "savedLineLeaderNames";
    pub const SAVED_CLEANERS_NAMES: &str = "savedCleanersNames";
    pub const LINE_LEADER_STATE: &str = "lineLeaderState";
    pub const CLEANERS_STATE: &str = "cleanersState";
    pub const CLEANERS_HISTORY: &str = "cleanersHistory";
}

/// 本地键值存储
///
/// put 幂等覆盖；get 返回最后写入的值或 None。
/// 单键粒度，没有事务
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// 数据目录路径
    pub fn classroom_dir(workspace_root: &Path) -> PathBuf {
        workspace_root.join(STORE_DIR)
    }

    /// 打开已初始化的存储
    pub fn open(workspace_root: &Path) -> Result<Self> {
        let root = Self::classroom_dir(workspace_root);
        if !dir_exists(&root) {
            return Err(anyhow!(
                "No {} directory found at {} (run `classroom-tools init`)",
                STORE_DIR,
                root.display()
            ));
        }
        Ok(Self { root })
    }

    /// 初始化存储目录
    pub fn init(workspace_root: &Path, force: bool) -> Result<Self> {
        let root = Self::classroom_dir(workspace_root);
        if root.exists() && !force {
            return Err(anyhow!(
                "{} already exists at {} (use --force to re-init)",
                STORE_DIR,
                root.display()
            ));
        }

        crate::utils::create_dir_all(&root.join("store"))?;
        Ok(Self { root })
    }

    /// 写入键值（覆盖）
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        write_file(&self.key_path(key), value)
    }

    /// 读取键值，不存在或读取失败时返回 None
    pub fn get(&self, key: &str) -> Option<String> {
        try_read_file(&self.key_path(key))
    }

    /// 删除键（不存在时也算成功）
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| anyhow!("Failed to remove key {}: {}", key, e))?;
        }
        Ok(())
    }

    /// 记录一条活动日志
    pub fn log_event(&self, message: &str) -> Result<()> {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let entry = format!("[{}] {}\n", timestamp, message);
        append_file(&self.root.join("activity.log"), &entry)
    }

    /// 数据目录（.classroom）
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 配置文件路径
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join("store").join(key)
    }
}
