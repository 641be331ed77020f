//! 新浪财经沪深A股实时行情
//!
//! 对应 akshare 的 stock_zh_a_spot()，作为东方财富之外的备选数据源
//! 对接 https://vip.stock.finance.sina.com.cn/quotes_service/api/json_v2.php

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::Value;

use crate::models::SpotRow;

use super::common::{decode_body, get_f64, get_string, SINA_A_SHARE_NODE, SINA_COUNT_METHOD, SINA_REFERER};

/// 新浪列表中的市值单位为万元
const SINA_CAP_UNIT: f64 = 10_000.0;

/// 单页解析结果
#[derive(Debug, Default)]
pub struct SinaPage {
    /// 本页原始条数，包含被跳过的行
    pub raw_count: usize,
    pub rows: Vec<SpotRow>,
}

/// 获取沪深A股全量实时行情
///
/// 先查询节点股票数量，再按 num 分页拉取，直到累计原始条数达到数量或某页为空
pub async fn fetch_spot_sina(client: &Client, base_url: &str, page_size: usize) -> Result<Vec<SpotRow>> {
    let page_size = page_size.max(1);
    let total = fetch_stock_count(client, base_url).await?;
    log::debug!("新浪沪深A股数量: {}", total);

    let mut rows: Vec<SpotRow> = Vec::with_capacity(total);
    let mut fetched = 0usize;
    let mut page = 1usize;

    while fetched < total {
        let text = get_text(
            client,
            base_url,
            &[
                ("page", page.to_string().as_str()),
                ("num", page_size.to_string().as_str()),
                ("sort", "symbol"),
                ("asc", "1"),
                ("node", SINA_A_SHARE_NODE),
                ("symbol", ""),
                ("_s_r_a", "page"),
            ],
        )
        .await?;

        let batch = parse_sina_page(&text)
            .with_context(|| format!("新浪第 {} 页解析失败: {}", page, base_url))?;
        if batch.raw_count == 0 {
            break;
        }
        fetched += batch.raw_count;
        rows.extend(batch.rows);
        page += 1;
    }

    log::info!("新浪实时行情共 {} 条", rows.len());
    Ok(rows)
}

/// 由列表 API 地址推出同目录下的数量 API 地址
fn count_url(base_url: &str) -> String {
    match base_url.rsplit_once('/') {
        Some((prefix, _)) => format!("{}/{}", prefix, SINA_COUNT_METHOD),
        None => SINA_COUNT_METHOD.to_string(),
    }
}

async fn fetch_stock_count(client: &Client, base_url: &str) -> Result<usize> {
    let text = get_text(client, &count_url(base_url), &[("node", SINA_A_SHARE_NODE)]).await?;
    parse_stock_count(&text)
}

async fn get_text(client: &Client, url: &str, query: &[(&str, &str)]) -> Result<String> {
    let response = client
        .get(url)
        .query(query)
        .header("Referer", SINA_REFERER)
        .send()
        .await
        .with_context(|| format!("请求新浪行情失败: {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!("获取新浪行情失败: {}", response.status()));
    }

    let headers = response.headers().clone();
    let bytes = response.bytes().await?;
    Ok(decode_body(&headers, &bytes))
}

/// 解析数量接口，返回形如 "5321" 的 JSON 字符串或数字
fn parse_stock_count(text: &str) -> Result<usize> {
    let trimmed = text.trim().trim_matches('"').trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| anyhow!("无法解析新浪股票数量: {}", text.trim()))
}

/// 解析列表接口
///
/// 格式: [{"symbol":"sh600000","code":"600000","name":"浦发银行","trade":"10.050",...,"mktcap":29490000.0,...}]
pub fn parse_sina_page(text: &str) -> Result<SinaPage> {
    let text = text.trim();
    if text.is_empty() || text == "null" {
        return Ok(SinaPage::default());
    }

    let json: Value = serde_json::from_str(text).map_err(|e| anyhow!("新浪数据解析失败: {}", e))?;
    let items = json
        .as_array()
        .ok_or_else(|| anyhow!("新浪数据格式错误，期望数组"))?;

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let (Some(code), Some(name)) = (get_string(item, "code"), get_string(item, "name")) else {
            log::debug!("跳过缺少代码或名称的行: {}", item);
            continue;
        };

        rows.push(SpotRow {
            code,
            name,
            latest_price: get_f64(item, "trade"),
            change_percent: get_f64(item, "changepercent"),
            change: get_f64(item, "pricechange"),
            // 新浪成交量单位为股
            volume: get_f64(item, "volume").map(|v| v / 100.0),
            amount: get_f64(item, "amount"),
            high: get_f64(item, "high"),
            low: get_f64(item, "low"),
            open: get_f64(item, "open"),
            prev_close: get_f64(item, "settlement"),
            turnover_rate: get_f64(item, "turnoverratio"),
            pe_dynamic: get_f64(item, "per"),
            pb: get_f64(item, "pb"),
            total_market_cap: get_f64(item, "mktcap").map(|v| v * SINA_CAP_UNIT),
            float_market_cap: get_f64(item, "nmc").map(|v| v * SINA_CAP_UNIT),
            ..SpotRow::default()
        });
    }

    Ok(SinaPage {
        raw_count: items.len(),
        rows,
    })
}
