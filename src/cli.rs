//! 命令行参数

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// 配置文件路径，未指定时按默认路径搜索
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 启动数据接口服务
    Serve(ServeArgs),

    /// 在终端中浏览指数数据
    Browse(BrowseArgs),

    /// 导出某个指数的 HTML 快照
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// 指数数据 CSV 文件
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// 监听端口
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// API 根地址
    #[arg(long)]
    pub api_base: Option<String>,

    /// 开发者模式：展示接口返回的字段结构
    #[arg(long)]
    pub developer: bool,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// 指数名称
    pub entity: String,

    /// 展示日期，未指定时为最新
    #[arg(short, long)]
    pub date: Option<String>,

    /// 输出文件，未指定时写到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// API 根地址
    #[arg(long)]
    pub api_base: Option<String>,

    /// 开发者模式：附带字段结构
    #[arg(long)]
    pub developer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let cli = Cli::try_parse_from([
            "index-dashboard",
            "--config",
            "conf.json",
            "snapshot",
            "NIFTY 50",
            "--date",
            "2024-01-02",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("conf.json")));
        match cli.command {
            Commands::Snapshot(args) => {
                assert_eq!(args.entity, "NIFTY 50");
                assert_eq!(args.date.as_deref(), Some("2024-01-02"));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["index-dashboard", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.data.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
