//! # 命令处理逻辑模块
//!
//! 包含处理 `hide` 和 `expose` 子命令的高级业务逻辑。
//! 本模块负责路径检查、文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::bmp::BmpFile;
use crate::cli::{ExposeArgs, HideArgs};
use crate::constants::{
    DOCTORED_PREFIX, MAX_BITS_PER_BYTE, MIN_BITS_PER_BYTE, RECOVERED_EXTENSION, RECOVERED_PREFIX,
};
use crate::steganography::{expose, hide};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// 未指定输出路径时，隐写结果图像的默认路径：`<目录>/doctored_<文件名>`。
fn default_dest(image: &Path) -> PathBuf {
    let file_name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.bmp".to_owned());
    image.with_file_name(format!("{DOCTORED_PREFIX}{file_name}"))
}

/// 未指定输出路径时，取出内容的默认路径：`<目录>/recovered_<文件名主干>.bin`。
fn default_message_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    image.with_file_name(format!("{RECOVERED_PREFIX}{stem}.{RECOVERED_EXTENSION}"))
}

/// 确认 `path` 存在且是普通文件。
fn ensure_regular_file(path: &Path, what: &str) -> Result<()> {
    anyhow::ensure!(
        path.is_file(),
        "The {} either does not exist or is a directory: {}",
        what,
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 确认可以写入 `path`：目录不可写，已存在的文件需要 `--force`。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        !path.is_dir(),
        "The output path is a directory: {}. \nPlease provide a different path.",
        path.to_string_lossy().red().bold()
    );
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse '--force' to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责校验参数与路径、读取图像和待隐藏文件、调用隐写核心函数，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和隐写参数的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * `bits_per_byte` 不是 1 到 8 之间的 2 的幂。
/// * 目标文件已存在且未指定 `--force`。
/// * 输入的图像或待隐藏文件不存在、无法读取或不是有效的 BMP 图像。
/// * 图像中已隐藏消息且未指定 `--force`。
/// * 图像没有足够的空间来隐藏文件内容。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let bits_per_byte = args.bits_per_byte;
    anyhow::ensure!(
        (MIN_BITS_PER_BYTE..=MAX_BITS_PER_BYTE).contains(&bits_per_byte)
            && bits_per_byte.is_power_of_two(),
        "--bits-per-byte needs to be a power of 2 between {} and {} inclusively, got {}",
        MIN_BITS_PER_BYTE,
        MAX_BITS_PER_BYTE,
        bits_per_byte.to_string().red().bold()
    );

    let dest = args.dest.unwrap_or_else(|| default_dest(&args.image));
    ensure_writable(&dest, args.force)?;
    ensure_regular_file(&args.message, "message file")?;
    ensure_regular_file(&args.image, "BMP file")?;

    let mut bmp = BmpFile::open(&args.image).with_context(|| {
        format!(
            "Unable to parse BMP file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(
        args.force || !bmp.has_message(),
        "The BMP file already has a message hidden inside: {}. \nUse '--force' to overwrite it.",
        args.image.to_string_lossy().red().bold()
    );

    let message = fs::read(&args.message).with_context(|| {
        format!(
            "Unable to read message file: {}",
            args.message.to_string_lossy().red().bold()
        )
    })?;

    hide(&mut bmp, &message, bits_per_byte).with_context(|| {
        format!(
            "Failed to hide {} bytes in an image with room for {} bytes.",
            message.len().to_string().red().bold(),
            bmp.capacity().to_string().green().bold()
        )
    })?;

    bmp.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The message has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Expose' 命令的执行逻辑。
///
/// 负责校验路径、解析图像、调用取出核心函数，
/// 最后将取出的内容写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `ExposeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出路径是目录，或输出文件已存在且未指定 `--force`。
/// * 输入的图像不存在、无法读取或不是有效的 BMP 图像。
/// * 图像中没有隐藏消息，或像素数据不足以容纳记录的消息长度。
/// * 无法写入到目标文件。
pub fn handle_expose(args: ExposeArgs) -> Result<()> {
    let dest = args
        .message
        .unwrap_or_else(|| default_message_path(&args.image));
    ensure_writable(&dest, args.force)?;
    ensure_regular_file(&args.image, "BMP file")?;

    let mut bmp = BmpFile::open(&args.image).with_context(|| {
        format!(
            "Unable to parse BMP file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(
        bmp.has_message(),
        "The BMP file does not contain a hidden message: {}",
        args.image.to_string_lossy().red().bold()
    );

    let message = expose(&mut bmp).with_context(|| {
        format!(
            "Failed to expose the message from '{}'. \nThe image header may be corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, &message).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The message has been successfully exposed and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}
