//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

use crate::constants::DEFAULT_BITS_PER_BYTE;

/// 一款把任意文件隐藏到 BMP 图像像素数据中的命令行工具。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款把任意文件隐藏到 BMP 图像像素数据中的命令行工具。隐藏的消息长度记录在 BMP 文件头的保留字段中。"
)]
pub struct Cli {
    /// 输出调试日志。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏) 和 expose (取出)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将文件内容隐藏到 BMP 图像中。
    Hide(HideArgs),

    /// 从 BMP 图像中取出隐藏的文件内容。
    Expose(ExposeArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径。
    #[arg(short, long)]
    pub message: PathBuf,

    /// 保存结果图像的路径，默认为图像所在目录下的 `doctored_<图像文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 每个像素字节使用的低位数，必须是 1 到 8 之间的 2 的幂。
    /// 位数越多，原图的改动越明显。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_BYTE)]
    pub bits_per_byte: u8,

    /// 覆盖已存在的输出文件，或覆盖图像中已隐藏的消息。
    #[arg(short, long)]
    pub force: bool,
}

/// 'expose' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExposeArgs {
    /// 隐藏了消息的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 保存取出内容的路径，默认为图像所在目录下的 `recovered_<图像名>.bin`。
    #[arg(short, long)]
    pub message: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}
