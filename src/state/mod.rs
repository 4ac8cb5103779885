//! 状态模块
//!
//! 三个小工具的状态机、名单解析和快照同步

pub mod cleaners;
pub mod models;
pub mod parser;
pub mod picker;
pub mod rotation;
pub mod sync;

// 重导出
pub use cleaners::*;
pub use models::*;
pub use parser::*;
pub use picker::*;
pub use rotation::*;
pub use sync::*;
