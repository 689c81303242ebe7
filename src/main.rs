//! 指数看板
//!
//! - `serve`：从 CSV 数据文件提供指数数据接口
//! - `browse`：终端看板，浏览公司列表、详情和走势
//! - `snapshot`：导出单个指数的 HTML 页面

mod cli;        // 命令行参数
mod commands;   // 子命令
mod config;     // 配置
mod dashboard;  // 看板
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use clap::Parser;
use env_logger::Env;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

/// 应用程序入口
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = AppConfig::load(cli.config.as_deref())?;

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &source {
        Some(path) => log::info!("使用配置文件: {}", path.display()),
        None => log::info!("未找到配置文件，使用默认配置"),
    }
    log::debug!("命令行参数: {:?}", cli);

    match &cli.command {
        Commands::Serve(args) => commands::serve::run(config, args).await,
        Commands::Browse(args) => commands::browse::run(config, args).await,
        Commands::Snapshot(args) => commands::snapshot::run(config, args).await,
    }
}
