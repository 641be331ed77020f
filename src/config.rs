//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，环境变量 API_KEY 可覆盖 api.api_key

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::services::stock::common::{EASTMONEY_SPOT_API, SINA_SPOT_API};

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 行情数据源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpotSource {
    /// 东方财富 沪深京A股实时行情
    Eastmoney,
    /// 新浪财经 沪深A股实时行情
    Sina,
}

/// 导出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// 行情数据源
    #[serde(default = "default_source")]
    pub source: SpotSource,
    /// 按总市值保留的股票数量
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// 分页大小
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// 翻页间隔（毫秒）
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_eastmoney_url")]
    pub eastmoney_url: String,
    #[serde(default = "default_sina_url")]
    pub sina_url: String,
    /// 输出文件路径（为空则使用程序所在目录的 ../config/stocks.json）
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 导出配置
    #[serde(default)]
    pub export: ExportConfig,
    /// 实际加载的配置文件路径
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// 未指定 --config 时依次尝试的配置文件
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_source() -> SpotSource { SpotSource::Eastmoney }
fn default_top_n() -> usize { 20 }
fn default_page_size() -> usize { 100 }
fn default_page_delay_ms() -> u64 { 300 }
fn default_eastmoney_url() -> String { EASTMONEY_SPOT_API.to_string() }
fn default_sina_url() -> String { SINA_SPOT_API.to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            top_n: default_top_n(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            eastmoney_url: default_eastmoney_url(),
            sina_url: default_sina_url(),
            output: None,
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件 {} 失败", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 {} 失败", path.display()))?;
        Ok(config)
    }

    /// 加载配置
    ///
    /// 显式指定的路径优先，其次依次尝试默认路径，都不存在则使用默认值；
    /// 找到的文件解析失败时返回错误
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => DEFAULT_CONFIG_PATHS
                .iter()
                .map(PathBuf::from)
                .find(|p| p.exists()),
        };

        let mut config = match &path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.source_path = path;
        config.apply_env(|name| env::var(name).ok());
        Ok(config)
    }

    /// 用环境变量覆盖配置，目前只有 API_KEY
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("API_KEY").filter(|k| !k.is_empty()) {
            self.api.api_key = key;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 按配置的超时时间构建 HTTP 客户端
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .connect_timeout(Duration::from_secs(self.api.connect_timeout_secs))
            .user_agent(crate::services::stock::common::USER_AGENT)
            .gzip(true)
            .build()?;
        Ok(client)
    }
}
