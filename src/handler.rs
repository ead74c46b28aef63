//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用 [`operations`](crate::operations) 中的操作以及向用户报告结果。

use crate::capacity::{EmbedConfig, capacity_bytes};
use crate::cli::{CapacityArgs, EmbedArgs, ExtractArgs, SaveAsArgs, VisualizeArgs};
use crate::constants::EMBEDDED_PREFIX;
use crate::operations::{Workspace, label_prefix, persist, png_name, save_as};
use crate::pixel_buffer;
use crate::timing::DurationListener;
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 将耗时打印到终端并写入日志的监听器。
struct ConsoleListener;

impl DurationListener for ConsoleListener {
    fn on_duration(&self, event: &str, elapsed: Duration) {
        info!("{event}: {} ms", elapsed.as_millis());
        println!(
            "{}: {} ms",
            event.cyan(),
            elapsed.as_millis().to_string().yellow().bold()
        );
    }
}

/// 处理 'Embed' 命令的执行逻辑。
///
/// 读取要隐藏的文本，把隐写结果写入暂存目录，再另存到目标路径。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 文本为空、参数非法或图像没有足够的空间来隐藏文本。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标图像文件。
pub fn handle_embed(args: EmbedArgs, workspace: &Workspace) -> Result<()> {
    let dest = args
        .dest
        .unwrap_or_else(|| sibling(&args.image, png_name(EMBEDDED_PREFIX, &args.image)));
    ensure_writable(&dest, args.force)?;

    let message = match (args.message, &args.text) {
        (Some(message), _) => message,
        (None, Some(text)) => fs::read_to_string(text).with_context(|| {
            format!(
                "Unable to read text file: {}",
                text.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Either --message or --text must be given."),
    };

    let staged = workspace
        .embed(&args.image, &message, args.bits.bits, &ConsoleListener)
        .with_context(|| {
            format!(
                "Failed to hide the text in: {}",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    persist(&staged, &dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 恢复出的文本总是打印到标准输出；指定了 `--text` 时另外写入该文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入的图像文件。
/// * 图像中没有有效的隐藏数据，或 `bits` 与隐写时不一致。
/// * 无法写入到目标文本文件。
pub fn handle_extract(args: ExtractArgs, workspace: &Workspace) -> Result<()> {
    if let Some(text) = &args.text {
        ensure_writable(text, args.force)?;
    }

    let message = workspace
        .extract(&args.image, args.bits.bits, &ConsoleListener)
        .with_context(|| {
            format!(
                "Failed to recover the hidden text from '{}'. \nThe image may not contain a hidden message, or was hidden with a different bits value.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    println!("{message}");

    if let Some(text) = &args.text {
        fs::write(text, &message).with_context(|| {
            format!(
                "Unable to write to target text file: {}",
                text.to_string_lossy().red().bold()
            )
        })?;

        println!(
            "The text has been successfully recovered and saved: {}",
            text.to_string_lossy().green().bold()
        );
    }

    Ok(())
}

/// 处理 'Visualize' 命令的执行逻辑。
pub fn handle_visualize(args: VisualizeArgs, workspace: &Workspace) -> Result<()> {
    let dest = match args.dest {
        Some(dest) => dest,
        None => {
            let prefix = label_prefix(&args.label)?;
            sibling(&args.image, png_name(&prefix, &args.image))
        }
    };
    ensure_writable(&dest, args.force)?;

    let staged = workspace
        .visualize(&args.image, args.bits.bits, &args.label)
        .with_context(|| {
            format!(
                "Failed to build the bit-plane map of: {}",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    persist(&staged, &dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The bit-plane map has been saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'SaveAs' 命令的执行逻辑。
pub fn handle_save_as(args: SaveAsArgs) -> Result<()> {
    ensure_writable(&args.dest, args.force)?;

    save_as(&args.source, &args.dest).with_context(|| {
        format!(
            "Unable to copy {} to {}",
            args.source.to_string_lossy().red().bold(),
            args.dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The file has been saved: {}",
        args.dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑，返回可隐藏的字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<usize> {
    let config = EmbedConfig::new(args.bits.bits)?;
    let raster = pixel_buffer::load(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let bytes = capacity_bytes(&raster, config);
    println!(
        "{}x{} with {} channels can hide up to {} bytes at {} bits per channel.",
        raster.width(),
        raster.height(),
        raster.channels(),
        bytes.to_string().green().bold(),
        config.bits_per_channel()
    );

    Ok(bytes)
}

fn sibling(path: &Path, file_name: String) -> PathBuf {
    path.with_file_name(file_name)
}

/// 目标文件已存在且未指定 `--force` 时拒绝覆盖。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}
