use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::time::Instant;

use bmp_shadow::{
    cli::{Cli, Commands},
    handler::{handle_expose, handle_hide},
};

/// 程序的主入口点
///
/// 负责解析命令行参数，初始化日志，并根据指定的子命令（`hide` 或 `expose`）
/// 将执行分派到相应的处理函数。任何错误都会使进程以状态码 1 退出。
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new().with_level(level).init()?;

    let start = Instant::now();

    // 根据子命令调用相应的处理函数
    let outcome = match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Expose(args) => handle_expose(args),
    };
    outcome?;

    println!(
        "Execution time: {} ms",
        start.elapsed().as_millis().to_string().dimmed()
    );

    Ok(())
}
