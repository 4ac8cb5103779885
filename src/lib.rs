// Classroom Tools CLI - Library Root
//
// 教室小助手：随机点名、排队领队、值日生抽签，
// 本地持久化 + 尽力而为的跨设备同步

pub mod cli;
pub mod config;
pub mod controller;
pub mod mirror;
pub mod state;
pub mod store;
pub mod utils;
pub mod watcher;

// 重新导出常用类型
pub use config::{AppConfig, RemoteConfig};
pub use controller::{Controller, Feature, SyncStatus};
pub use mirror::{RemoteMirror, SyncOutcome};
pub use state::{PairPicker, Rotation, StateError};
pub use store::LocalStore;
pub use utils::find_classroom_root;
