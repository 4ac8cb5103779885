//! 目录镜像
//!
//! 用一个共享目录（网络盘、同步盘）充当远端：每个键一个文件

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use super::RemoteMirror;

/// 目录形式的远端镜像
#[derive(Debug, Clone)]
pub struct DirMirror {
    dir: PathBuf,
}

impl DirMirror {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl RemoteMirror for DirMirror {
    fn push(&self, key: &str, value: &str) -> Result<()> {
        // 目录不存在视为远端不可达，不在这里创建：
        // 挂载点掉了时静默建本地目录会把数据写丢
        if !self.dir.is_dir() {
            return Err(anyhow!(
                "mirror directory not available: {}",
                self.dir.display()
            ));
        }
        std::fs::write(self.dir.join(key), value)
            .map_err(|e| anyhow!("mirror write failed for {}: {}", key, e))
    }

    fn pull(&self, key: &str) -> Result<Option<String>> {
        let path = self.dir.join(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| anyhow!("mirror read failed for {}: {}", key, e))
    }

    fn describe(&self) -> String {
        format!("dir mirror at {}", self.dir.display())
    }
}
