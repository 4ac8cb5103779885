//! 名单解析器
//!
//! 把多行自由文本解析成有序名单

use super::StateError;

/// 解析名单文本
///
/// 按行拆分，去掉首尾空白，丢弃空行。保持原始顺序，不去重
/// （同名同学各占一行是合法输入）
pub fn parse_name_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// 解析名单文本，空名单视为错误
pub fn parse_required(raw: &str) -> Result<Vec<String>, StateError> {
    let names = parse_name_list(raw);
    if names.is_empty() {
        return Err(StateError::NoValidNames);
    }
    Ok(names)
}
