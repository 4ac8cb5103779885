//! JSON 工具

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::utils::write_file;

/// 读取 JSON 文件
pub fn read_json<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

/// 写入 JSON 文件（格式化）
pub fn write_json<T>(path: &Path, data: &T) -> Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;

    write_file(path, &json).with_context(|| format!("Failed to write JSON file: {}", path.display()))
}

/// 读取 JSON 文件，失败时返回默认值
pub fn read_json_or_default<T>(path: &Path) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    read_json(path).unwrap_or_default()
}

/// 尝试读取 JSON 文件，失败时返回 None
pub fn try_read_json<T>(path: &Path) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    read_json(path).ok()
}
