//! 股票行情数据源模块
//!
//! 提供A股全市场实时行情快照，支持东方财富与新浪两个数据源

pub mod common;
pub mod eastmoney;
pub mod sina;

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

use crate::config::{ExportConfig, SpotSource};
use crate::models::SpotRow;

pub use eastmoney::fetch_spot_em;
pub use sina::fetch_spot_sina;

/// 按配置的数据源获取全市场实时行情快照
pub async fn fetch_spot(client: &Client, export: &ExportConfig) -> Result<Vec<SpotRow>> {
    log::info!("从 {:?} 获取A股实时行情快照", export.source);

    match export.source {
        SpotSource::Eastmoney => {
            fetch_spot_em(
                client,
                &export.eastmoney_url,
                export.page_size,
                Duration::from_millis(export.page_delay_ms),
            )
            .await
        }
        SpotSource::Sina => fetch_spot_sina(client, &export.sina_url, export.page_size).await,
    }
}
