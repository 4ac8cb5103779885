//! watch 模式
//!
//! 长驻进程：监听名单文件的外部编辑，按静默窗口执行自动同步，
//! 并把同步状态的变化打到终端

use anyhow::Result;
use colored::*;
use std::path::Path;
use std::time::Duration;

use crate::controller::{Controller, Feature};
use crate::watcher::{RosterChangeKind, RosterWatcher};

use super::report_outcome;

/// 时间片长度：够细就行，防抖窗口另算
const TICK_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(workspace_root: &Path) -> Result<()> {
    let mut ctrl = Controller::open(workspace_root)?;
    let watcher = RosterWatcher::with_defaults(ctrl.store().root().to_path_buf())?;

    println!(
        "{}",
        format!("👀 Watching {}", watcher.store_dir().display())
            .cyan()
            .bold()
    );
    match ctrl.mirror_description() {
        Some(desc) => println!("   Mirror: {}", desc.yellow()),
        None => println!("   Mirror: {}", "none (local only)".yellow()),
    }
    println!("   Press Ctrl-C to stop");
    println!();

    let mut last_messages: [Option<String>; 2] = [None, None];

    loop {
        for change in watcher.poll_changes() {
            match change.kind {
                RosterChangeKind::NamePicker => {
                    println!("✏️  Name picker roster updated");
                }
                RosterChangeKind::LineLeader => {
                    println!("✏️  Line leader roster updated");
                }
                RosterChangeKind::Cleaners => {
                    println!("✏️  Cleaners roster updated");
                    ctrl.notify_cleaners_roster_edited();
                }
                RosterChangeKind::Other => {}
            }
        }

        for (feature, outcome) in ctrl.tick() {
            report_outcome(feature, &outcome);
        }

        // 状态格子的文案变化打一行，消退回 idle 不打扰
        for (slot, feature) in [Feature::LineLeader, Feature::Cleaners].iter().enumerate() {
            let message = ctrl.sync_message(*feature).map(String::from);
            if message != last_messages[slot] {
                if let Some(text) = &message {
                    println!("   [{}] {}", feature.as_str(), text.yellow());
                }
                last_messages[slot] = message;
            }
        }

        std::thread::sleep(TICK_INTERVAL);
    }
}
