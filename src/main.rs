use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::env;
use std::path::PathBuf;

use classroom_tools::{
    cli, find_classroom_root, AppConfig, Controller, Feature, LocalStore, SyncStatus,
};

/// Classroom Tools CLI
///
/// 教室小助手 - 随机点名、排队领队、值日生抽签
#[derive(Parser)]
#[command(name = "classroom-tools")]
#[command(author, version = env!("APP_VERSION"), about)]
#[command(
    long_about = "Three small classroom helpers - a random name picker, a line leader rotation\n\
                        and a cleaners pair picker - with local persistence and best-effort sync."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 初始化数据目录（.classroom）
    Init {
        /// 强制覆盖已存在的数据目录
        #[arg(short, long)]
        force: bool,
    },

    /// 随机点一个名字
    Pick {
        /// 名单文件（每行一个名字），给了就先保存再抽
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// 排队领队轮换
    #[command(subcommand)]
    Leader(LeaderCommands),

    /// 值日生抽签
    #[command(subcommand)]
    Cleaners(CleanersCommands),

    /// 手动同步到远端镜像（跳过自动同步的静默窗口）
    Sync {
        /// 要同步的工具：leader, cleaners, all（默认 all）
        #[arg(short, long, default_value = "all")]
        tool: String,
    },

    /// 显示当前状态
    Status,

    /// 长驻监听名单编辑并自动同步
    Watch,

    /// 诊断数据目录和镜像配置
    Doctor,

    /// 显示数据根目录
    Root,
}

/// 排队领队子命令
#[derive(Subcommand)]
enum LeaderCommands {
    /// 用保存的名单开启新的一轮
    Start {
        /// 名单文件（每行一个名字），给了就先保存再开始
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// 轮到下一个人
    Next,

    /// 手动跳到指定的人（0 起始下标）
    Select {
        /// 目标下标
        index: usize,
    },

    /// 显示当前排队情况
    Show,
}

/// 值日生子命令
#[derive(Subcommand)]
enum CleanersCommands {
    /// 抽一对值日生
    Pick {
        /// 名单文件（每行一个名字），给了就先保存再抽
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// 显示当前值日生和抽取历史
    Show,
}

// ═══════════════════════════════════════════════════════════════════
// 初始化
// ═══════════════════════════════════════════════════════════════════

fn init(force: bool) -> Result<()> {
    let cwd = env::current_dir()?;
    let store = LocalStore::init(&cwd, force)?;
    AppConfig::default().save(&store)?;

    println!("{}", "✅ Classroom data directory created!".green().bold());
    println!("   📁 {}", store.root().display().to_string().cyan());
    println!();
    println!(
        "💡 Put one name per line into a file and try {}",
        "classroom-tools pick --file names.txt".cyan()
    );
    println!(
        "💡 Edit {} to point syncing at a shared folder or HTTP mirror",
        "config.json".cyan()
    );

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════
// 随机点名
// ═══════════════════════════════════════════════════════════════════

fn pick_name(file: Option<PathBuf>) -> Result<()> {
    let root = match require_root() {
        Some(root) => root,
        None => return Ok(()),
    };

    let mut ctrl = Controller::open(&root)?;
    if let Some(path) = file {
        let text = classroom_tools::utils::read_file(&path)?;
        ctrl.save_picker_roster(&text)?;
    }

    let mut rng = rand::thread_rng();
    match ctrl.pick_name(&mut rng) {
        Ok(name) => {
            println!("{}", "🎯 The chosen one:".green().bold());
            println!();
            println!("   {}", name.green().bold());
        }
        Err(e) => println!("{}", format!("❌ {}", e).red()),
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════
// 手动同步
// ═══════════════════════════════════════════════════════════════════

fn sync(tool: &str) -> Result<()> {
    let root = match require_root() {
        Some(root) => root,
        None => return Ok(()),
    };

    let features: Vec<Feature> = match tool {
        "leader" => vec![Feature::LineLeader],
        "cleaners" => vec![Feature::Cleaners],
        "all" => vec![Feature::LineLeader, Feature::Cleaners],
        _ => {
            println!("{}", format!("❌ Unknown tool: {}", tool).red());
            println!("Available tools: leader, cleaners, all");
            return Ok(());
        }
    };

    let mut ctrl = Controller::open(&root)?;

    for feature in features {
        ctrl.sync_now(feature);

        let glyph = match ctrl.sync_status(feature) {
            SyncStatus::Success => "✓".green(),
            SyncStatus::Error => "⚠".yellow(),
            _ => "•".white(),
        };
        let message = ctrl.sync_message(feature).unwrap_or("done").to_string();
        println!("{} {}: {}", glyph, feature.as_str(), message.yellow());
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════
// 状态显示
// ═══════════════════════════════════════════════════════════════════

fn show_status() -> Result<()> {
    let root = match require_root() {
        Some(root) => root,
        None => return Ok(()),
    };

    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║                    Classroom Tools Status                        ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════════╝".cyan()
    );
    println!();

    let ctrl = Controller::open(&root)?;
    println!(
        "📁 Data Root: {}",
        ctrl.store().root().display().to_string().green()
    );
    match ctrl.mirror_description() {
        Some(desc) => println!("🔄 Mirror: {}", desc.yellow()),
        None => println!("🔄 Mirror: {}", "none (local only)".yellow()),
    }

    println!();
    println!("🚶 Line Leader:");
    let rotation = ctrl.line_leader();
    if rotation.is_active() {
        let index = rotation.current_index().unwrap_or(0);
        println!(
            "   Current: {} ({} of {})",
            rotation.current_name().unwrap_or("?").cyan(),
            index + 1,
            rotation.names().len()
        );
    } else {
        println!("   {}", "inactive".dimmed());
    }

    println!();
    println!("🧹 Cleaners:");
    match ctrl.cleaners().current_pair() {
        Some(pair) => println!("   Current: {} + {}", pair[0].cyan(), pair[1].cyan()),
        None => println!("   {}", "inactive".dimmed()),
    }
    println!("   History: {} picks remembered", ctrl.cleaners().history().len());

    println!();
    println!(
        "💡 Tip: Use {} for live auto-sync while editing rosters",
        "classroom-tools watch".cyan()
    );

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════
// 诊断环境
// ═══════════════════════════════════════════════════════════════════

fn doctor() -> Result<()> {
    println!("{}", "🔍 Classroom Tools Doctor".cyan().bold());
    println!();

    // 检查数据根目录
    print!("📁 Data root detection... ");
    let root = match find_classroom_root() {
        Some(root) => {
            println!("{}", "✓".green());
            println!("   {}", root.display().to_string().yellow());
            root
        }
        None => {
            println!("{}", "✗".red());
            println!("   {}", "No .classroom directory found in current path".red());
            println!("   Run {} to initialize", "classroom-tools init".cyan());
            return Ok(());
        }
    };

    let store = LocalStore::open(&root)?;

    println!();
    println!("📝 Stored keys:");
    let entries = vec![
        ("savedNames", "Name picker roster"),
        ("savedLineLeaderNames", "Line leader roster"),
        ("savedCleanersNames", "Cleaners roster"),
        ("lineLeaderState", "Line leader snapshot"),
        ("cleanersState", "Cleaners snapshot"),
        ("cleanersHistory", "Cleaners pick history"),
    ];
    for (key, desc) in entries {
        if store.get(key).is_some() {
            println!("   {} {}", "✓".green(), desc.yellow());
        } else {
            println!("   {} {} {}", "✗".red(), desc.yellow(), "(missing)".dimmed());
        }
    }

    println!();
    println!("🔄 Mirror:");
    let config = AppConfig::load(&store);
    match classroom_tools::mirror::mirror_from_config(config.remote.as_ref()) {
        Some(mirror) => {
            println!("   {}", mirror.describe().yellow());
            // 一次真实的读尝试足以判断可达性
            print!("   Reachability... ");
            match mirror.pull("lineLeaderState") {
                Ok(_) => println!("{}", "✓".green()),
                Err(e) => {
                    println!("{}", "✗".red());
                    println!("   {}", e.to_string().red());
                }
            }
        }
        None => println!("   {} (sync degrades to local saves)", "not configured".yellow()),
    }

    println!();
    println!("{}", "✅ Diagnostic complete".green().bold());

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════

fn require_root() -> Option<PathBuf> {
    match find_classroom_root() {
        Some(root) => Some(root),
        None => {
            println!("{}", "❌ No .classroom directory found".red());
            println!("Run {} to initialize", "classroom-tools init".cyan());
            None
        }
    }
}

fn with_root(run: impl FnOnce(&std::path::Path) -> Result<()>) -> Result<()> {
    match require_root() {
        Some(root) => run(&root),
        None => Ok(()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => init(force),
        Commands::Pick { file } => pick_name(file),
        Commands::Leader(cmd) => match cmd {
            LeaderCommands::Start { file } => {
                with_root(|root| cli::leader::start(root, file.as_deref()))
            }
            LeaderCommands::Next => with_root(cli::leader::next),
            LeaderCommands::Select { index } => with_root(|root| cli::leader::select(root, index)),
            LeaderCommands::Show => with_root(cli::leader::show),
        },
        Commands::Cleaners(cmd) => match cmd {
            CleanersCommands::Pick { file } => {
                with_root(|root| cli::cleaners::pick(root, file.as_deref()))
            }
            CleanersCommands::Show => with_root(cli::cleaners::show),
        },
        Commands::Sync { tool } => sync(&tool),
        Commands::Status => show_status(),
        Commands::Watch => with_root(cli::watch::run),
        Commands::Doctor => doctor(),
        Commands::Root => {
            match find_classroom_root() {
                Some(root) => println!("{}", root.display()),
                None => {
                    eprintln!("{}", "No .classroom directory found".red());
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}
