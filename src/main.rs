//! A股市值排行导出工具
//!
//! 从行情数据源获取沪深京A股实时快照，按总市值降序取前 20 只，
//! 把代码和名称写入 config/stocks.json
//! 数据来源：东方财富、新浪财经

mod cli;        // 命令行定义与命令实现
mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use clap::Parser;
use env_logger::Env;

use crate::cli::Cli;
use crate::config::AppConfig;

/// 应用程序入口
///
/// 默认命令为 gen；serve 启动 HTTP 服务
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    cli::run(cli, config).await
}
