//! 排队领队子命令

use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::controller::Controller;
use crate::state::{Advance, Rotation};
use crate::utils::read_file;

use super::{finish, report_validation};

/// 开启新的一轮排队
///
/// 给了 --file 就先把名单存进 store（相当于编辑输入框）
pub fn start(workspace_root: &Path, file: Option<&Path>) -> Result<()> {
    let mut ctrl = Controller::open(workspace_root)?;

    if let Some(path) = file {
        let text = read_file(path)?;
        ctrl.save_leader_roster(&text)?;
    }

    match ctrl.start_line_leader() {
        Ok(rotation) => {
            println!("{}", "🚶 Line leader started!".green().bold());
            println!();
            print_roster(rotation);
        }
        Err(e) => {
            report_validation(&e);
            return Ok(());
        }
    }

    finish(ctrl);
    Ok(())
}

/// 轮到下一个人
pub fn next(workspace_root: &Path) -> Result<()> {
    let mut ctrl = Controller::open(workspace_root)?;

    match ctrl.next_person() {
        Ok(Advance::Moved(_)) => {
            print_roster(ctrl.line_leader());
        }
        Ok(Advance::CycleComplete) => {
            println!("{}", "🎉 Everyone had a turn! Rotation complete.".green().bold());
            println!(
                "   Run {} to begin a fresh cycle",
                "classroom-tools leader start".cyan()
            );
        }
        Err(e) => {
            report_validation(&e);
            return Ok(());
        }
    }

    finish(ctrl);
    Ok(())
}

/// 手动跳到指定的人（0 起始下标）
pub fn select(workspace_root: &Path, index: usize) -> Result<()> {
    let mut ctrl = Controller::open(workspace_root)?;

    match ctrl.select_person(index) {
        Ok(()) => print_roster(ctrl.line_leader()),
        Err(e) => {
            report_validation(&e);
            return Ok(());
        }
    }

    finish(ctrl);
    Ok(())
}

/// 显示当前排队情况
pub fn show(workspace_root: &Path) -> Result<()> {
    let ctrl = Controller::open(workspace_root)?;
    let rotation = ctrl.line_leader();

    if !rotation.is_active() {
        println!("{}", "Line leader is not active".yellow());
        println!(
            "   Run {} to start a rotation",
            "classroom-tools leader start".cyan()
        );
        return Ok(());
    }

    print_roster(rotation);
    Ok(())
}

/// 打印名单：已轮过 ✓、当前 ▶、未轮到 ○
fn print_roster(rotation: &Rotation) {
    let current = rotation.current_index();

    for (index, name) in rotation.names().iter().enumerate() {
        if Some(index) == current {
            println!("   {} {}", "▶".cyan().bold(), name.cyan().bold());
        } else if rotation.is_processed(index) {
            println!("   {} {}", "✓".green(), name.dimmed());
        } else {
            println!("   {} {}", "○".white(), name);
        }
    }
}
