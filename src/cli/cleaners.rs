//! 值日生子命令

use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::controller::Controller;
use crate::utils::read_file;

use super::{finish, report_validation};

/// 抽一对值日生
pub fn pick(workspace_root: &Path, file: Option<&Path>) -> Result<()> {
    let mut ctrl = Controller::open(workspace_root)?;

    if let Some(path) = file {
        let text = read_file(path)?;
        ctrl.save_cleaners_roster(&text)?;
    }

    let mut rng = rand::thread_rng();
    match ctrl.pick_cleaners(&mut rng) {
        Ok(pair) => {
            println!("{}", "🧹 Today's cleaners:".green().bold());
            println!();
            println!("   {}", pair[0].cyan().bold());
            println!("   {}", pair[1].cyan().bold());
        }
        Err(e) => {
            report_validation(&e);
            return Ok(());
        }
    }

    finish(ctrl);
    Ok(())
}

/// 显示当前值日生和抽取历史
pub fn show(workspace_root: &Path) -> Result<()> {
    let ctrl = Controller::open(workspace_root)?;
    let picker = ctrl.cleaners();

    match picker.current_pair() {
        Some(pair) => {
            println!("🧹 Current cleaners:");
            println!("   {}", pair[0].cyan().bold());
            println!("   {}", pair[1].cyan().bold());
        }
        None => {
            println!("{}", "No cleaners picked yet".yellow());
            println!(
                "   Run {} to pick a pair",
                "classroom-tools cleaners pick".cyan()
            );
        }
    }

    if !picker.history().is_empty() {
        println!();
        println!("📜 Recent picks (newest last):");
        for pair in picker.history() {
            println!("   {} + {}", pair[0], pair[1]);
        }
    }

    Ok(())
}
