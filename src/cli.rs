//! # 命令行参数定义
//!
//! 五个子命令：`embed` 隐藏文本，`extract` 恢复文本，`visualize` 生成位平面图，
//! `save-as` 另存文件，`capacity` 查询容量。
//! `--bits` 与 `--staging-dir` 也可以通过环境变量 `LSB_PLANE_BITS`、`LSB_PLANE_STAGING_DIR` 设置。

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// 基于 LSB (最低有效位) 隐写术的命令行工具，可选择每个通道使用的低位数，并能生成位平面图。
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// 提高日志详细程度 (-v 为 info，-vv 为 debug)。RUST_LOG 优先。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// 中间结果的暂存目录，默认为系统临时目录下的 lsb_plane。
    #[arg(long, env = "LSB_PLANE_STAGING_DIR", global = true)]
    pub staging_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将文本隐藏到图像中，结果始终保存为 PNG。
    Embed(EmbedArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Extract(ExtractArgs),

    /// 生成图像低位的位平面图 (PNG)。
    Visualize(VisualizeArgs),

    /// 将文件另存到新路径。
    SaveAs(SaveAsArgs),

    /// 查看图像在给定参数下可隐藏的最大字节数。
    Capacity(CapacityArgs),
}

/// 每个通道样本使用的低位数 (1-8)。
#[derive(Args, Debug, Clone, Copy)]
pub struct BitsArg {
    #[arg(short, long, default_value_t = 1, env = "LSB_PLANE_BITS")]
    pub bits: u8,
}

/// 'embed' 命令所需的参数。
#[derive(Args, Debug)]
#[command(group = clap::ArgGroup::new("payload").required(true))]
pub struct EmbedArgs {
    /// 用于隐写的输入图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 直接给出要隐藏的文本。
    #[arg(short, long, group = "payload")]
    pub message: Option<String>,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long, group = "payload")]
    pub text: Option<PathBuf>,

    #[command(flatten)]
    pub bits: BitsArg,

    /// 结果图像的输出路径，默认为输入图像同目录下的 embedded_<文件名>.png。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub bits: BitsArg,

    /// 将恢复的文本另外保存到此路径。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'visualize' 命令所需的参数。
#[derive(Args, Debug)]
pub struct VisualizeArgs {
    /// 输入图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub bits: BitsArg,

    /// 位平面图的标签，用作文件名前缀。
    #[arg(short, long, default_value = crate::constants::DEFAULT_LABEL)]
    pub label: String,

    /// 位平面图的输出路径，默认为输入图像同目录下的 <标签>_<文件名>.png。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'save-as' 命令所需的参数。
#[derive(Args, Debug)]
pub struct SaveAsArgs {
    /// 源文件路径。
    #[arg(short, long)]
    pub source: PathBuf,

    /// 目标路径。
    #[arg(short, long)]
    pub dest: PathBuf,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 输入图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub bits: BitsArg,
}
