//! CLI 命令模块
//!
//! leader / cleaners / watch 子命令的实现；简单命令直接在 main.rs 里

pub mod cleaners;
pub mod leader;
pub mod watch;

use colored::*;

use crate::controller::{Controller, Feature, SystemClock};
use crate::mirror::SyncOutcome;

/// 命令收尾：冲掉挂起的自动同步并汇报结果
pub(crate) fn finish(mut ctrl: Controller<SystemClock>) {
    for (feature, outcome) in ctrl.flush() {
        report_outcome(feature, &outcome);
    }
}

/// 把一次同步结果打印成一行提示
pub(crate) fn report_outcome(feature: Feature, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Synced => {
            println!("   {} {} state synced", "🔄".cyan(), feature.as_str());
        }
        SyncOutcome::OfflineSavedLocally => {
            println!(
                "   {} {} state saved locally {}",
                "💾".yellow(),
                feature.as_str(),
                "(offline)".yellow()
            );
        }
        SyncOutcome::Error(e) => {
            println!(
                "   {} {} state not saved: {}",
                "✗".red(),
                feature.as_str(),
                e.to_string().red()
            );
        }
    }
}

/// 校验类错误的统一提示（状态未变，不算命令失败）
pub(crate) fn report_validation(error: &crate::state::StateError) {
    println!("{}", format!("❌ {}", error).red());
}
