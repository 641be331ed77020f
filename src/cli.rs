//! 命令行定义与命令实现

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, SpotSource};
use crate::handlers::{self, AppState};
use crate::middleware::ApiKeyAuth;
use crate::services::{export, ranking, stock};

/// 默认过滤关键字
const DEFAULT_KEYWORD: &str = "银行";

#[derive(Parser, Debug)]
#[command(name = "a-stock-gen")]
#[command(about = "导出总市值前 20 的A股到 config/stocks.json", long_about = None)]
pub struct Cli {
    /// 配置文件路径（默认依次尝试 config.json、config/config.json）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// 获取实时行情并导出市值排行（默认命令）
    Gen {
        /// 输出文件路径
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// 保留的股票数量
        #[arg(short = 'n', long)]
        top: Option<usize>,
        /// 行情数据源
        #[arg(short, long, value_enum)]
        source: Option<SpotSource>,
    },
    /// 按名称关键字过滤已导出的股票列表
    Filter {
        /// 输入文件（默认为导出路径）
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// 输出文件（默认为输入目录下的 filtered_stocks.json）
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// 名称关键字
        #[arg(short, long, default_value = DEFAULT_KEYWORD)]
        keyword: String,
    },
    /// 启动 HTTP 服务
    Serve,
}

pub async fn run(cli: Cli, mut config: AppConfig) -> Result<()> {
    match &config.source_path {
        Some(path) => log::info!("使用配置文件 {}", path.display()),
        None => log::info!("使用默认配置"),
    }

    let command = cli.command.unwrap_or(Commands::Gen {
        output: None,
        top: None,
        source: None,
    });

    match command {
        Commands::Gen { output, top, source } => {
            if let Some(top) = top {
                config.export.top_n = top;
            }
            if let Some(source) = source {
                config.export.source = source;
            }
            let path = match output {
                Some(path) => path,
                None => resolve_output(&config)?,
            };
            generate(&config, &path).await?;
            Ok(())
        }
        Commands::Filter { input, output, keyword } => {
            let input = match input {
                Some(path) => path,
                None => resolve_output(&config)?,
            };
            let output = output.unwrap_or_else(|| export::filtered_path_for(&input));
            filter(&input, &output, &keyword)?;
            Ok(())
        }
        Commands::Serve => serve(config).await,
    }
}

/// 导出路径：配置优先，否则为程序所在目录的 ../config/stocks.json
fn resolve_output(config: &AppConfig) -> Result<PathBuf> {
    match &config.export.output {
        Some(path) => Ok(path.clone()),
        None => export::default_output_path(),
    }
}

/// 获取快照 → 按总市值排序取前 N → 写入文件
pub async fn generate(config: &AppConfig, output: &Path) -> Result<usize> {
    let client = config.http_client()?;
    let rows = stock::fetch_spot(&client, &config.export)
        .await
        .context("获取A股实时行情失败")?;

    let entries = ranking::rank_by_market_cap(&rows, config.export.top_n);
    for (i, entry) in entries.iter().enumerate() {
        log::debug!("{:>2}. {} {}", i + 1, entry.code, entry.name);
    }

    export::write_stocks(output, &entries)?;
    Ok(entries.len())
}

/// 读取股票列表，保留名称包含关键字的股票
pub fn filter(input: &Path, output: &Path, keyword: &str) -> Result<usize> {
    let entries = export::load_stocks(input)?;
    let filtered = ranking::filter_by_name(&entries, keyword);
    log::info!("关键字 \"{}\" 匹配 {}/{} 只股票", keyword, filtered.len(), entries.len());

    export::write_stocks(output, &filtered)?;
    Ok(filtered.len())
}

async fn serve(config: AppConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let workers = config.server.workers;
    let api_key = config.api.api_key.clone();

    if api_key.is_empty() {
        log::warn!("未设置 API Key，接口不做认证");
    }

    let state = web::Data::new(AppState {
        client: config.http_client()?,
        config,
    });

    log::info!("启动 HTTP 服务，监听 {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(ApiKeyAuth::new(&api_key))  // API Key 认证
            .wrap(Logger::default())  // 请求日志
            .configure(handlers::config)
    });
    if workers > 0 {
        server = server.workers(workers);
    }

    server
        .bind(&bind_addr)
        .with_context(|| format!("绑定地址 {} 失败", bind_addr))?
        .run()
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StockEntry;
    use actix_web::HttpResponse;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_parse_no_subcommand() {
        let cli = Cli::try_parse_from(["a-stock-gen"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_gen_args() {
        let cli = Cli::try_parse_from(["a-stock-gen", "gen", "-n", "10", "--source", "sina", "-o", "out.json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Gen {
                output: Some(PathBuf::from("out.json")),
                top: Some(10),
                source: Some(SpotSource::Sina),
            })
        );
    }

    #[test]
    fn test_parse_filter_default_keyword() {
        let cli = Cli::try_parse_from(["a-stock-gen", "filter", "--config", "c.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        match cli.command {
            Some(Commands::Filter { keyword, input, output }) => {
                assert_eq!(keyword, "银行");
                assert!(input.is_none());
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_filter_command() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stocks.json");
        fs::write(
            &input,
            r#"[{"code":"601398","name":"工商银行"},{"code":"600519","name":"贵州茅台"},{"code":"601939","name":"建设银行"}]"#,
        )
        .unwrap();
        let output = export::filtered_path_for(&input);

        let count = filter(&input, &output, "银行").unwrap();
        assert_eq!(count, 2);

        let filtered = export::load_stocks(&output).unwrap();
        let codes: Vec<&str> = filtered.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["601398", "601939"]);
    }

    #[test]
    fn test_filter_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stocks.json");
        assert!(filter(&input, &dir.path().join("out.json"), "银行").is_err());
    }

    async fn mock_clist() -> HttpResponse {
        let diff: Vec<serde_json::Value> = (0..25)
            .map(|i| json!({ "f12": format!("{:06}", i), "f14": format!("股票{}", i), "f20": (i as f64) * 1.0e10 }))
            .collect();
        HttpResponse::Ok().json(json!({ "rc": 0, "data": { "total": 25, "diff": diff } }))
    }

    #[actix_web::test]
    async fn test_generate_writes_top_20() {
        let server = HttpServer::new(|| App::new().route("/clist", web::get().to(mock_clist)))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        let running = server.run();
        let server_handle = running.handle();
        actix_web::rt::spawn(running);

        let mut config = AppConfig::default();
        config.export.eastmoney_url = format!("http://{}/clist", addr);
        config.export.page_delay_ms = 0;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("config").join("stocks.json");

        let count = generate(&config, &output).await.unwrap();
        assert_eq!(count, 20);

        let entries: Vec<StockEntry> = export::load_stocks(&output).unwrap();
        assert_eq!(entries.len(), 20);
        assert_eq!(entries[0].code, "000024");
        assert_eq!(entries[0].name, "股票24");
        assert_eq!(entries[19].code, "000005");

        let first = fs::read(&output).unwrap();
        generate(&config, &output).await.unwrap();
        assert_eq!(fs::read(&output).unwrap(), first);

        server_handle.stop(true).await;
    }

    #[actix_web::test]
    async fn test_generate_source_failure_writes_nothing() {
        let mut config = AppConfig::default();
        config.export.eastmoney_url = "http://127.0.0.1:1/clist".to_string();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("stocks.json");

        assert!(generate(&config, &output).await.is_err());
        assert!(!output.exists());
    }
}
