use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

use lsb_plane::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_embed, handle_extract, handle_save_as, handle_visualize},
    operations::Workspace,
};

/// 初始化日志：默认只输出 warn 及以上，每个 `-v` 提高一级，`RUST_LOG` 优先
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .init();
}

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let workspace = cli.staging_dir.map(Workspace::new).unwrap_or_default();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Embed(args) => handle_embed(args, &workspace),
        Commands::Extract(args) => handle_extract(args, &workspace),
        Commands::Visualize(args) => handle_visualize(args, &workspace),
        Commands::SaveAs(args) => handle_save_as(args),
        Commands::Capacity(args) => handle_capacity(args).map(|_| ()),
    }
}
