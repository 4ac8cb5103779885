// Classroom Root Finder
// 数据目录查找逻辑

use std::path::PathBuf;

use crate::store::STORE_DIR;

/// 查找教室数据根目录
///
/// 查找策略:
/// 1. 当前目录
/// 2. 向上遍历查找 .classroom 目录
pub fn find_classroom_root() -> Option<PathBuf> {
    // 方法1: 当前目录
    if let Ok(cwd) = std::env::current_dir() {
        if cwd.join(STORE_DIR).is_dir() {
            return Some(cwd);
        }
    }

    // 方法2: 向上遍历
    if let Ok(mut current) = std::env::current_dir() {
        for _ in 0..10 {
            if current.join(STORE_DIR).is_dir() {
                return Some(current);
            }
            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_classroom_root() {
        // 找到的根目录必然包含 .classroom
        if let Some(root) = find_classroom_root() {
            assert!(root.join(STORE_DIR).exists());
        }
    }
}
