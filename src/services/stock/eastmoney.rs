//! 东方财富沪深京A股实时行情
//!
//! 对应 akshare 的 stock_zh_a_spot_em()
//! 对接 https://82.push2.eastmoney.com/api/qt/clist/get

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::cmp::Ordering;
use std::time::Duration;

use crate::models::SpotRow;

use super::common::{
    get_f64, get_string, EASTMONEY_A_SHARE_FS, EASTMONEY_REFERER, EASTMONEY_SPOT_FIELDS,
    EASTMONEY_UT,
};

/// 单页解析结果
#[derive(Debug, Default)]
pub struct EmPage {
    /// 全市场总条数
    pub total: usize,
    /// 本页 diff 原始条数，包含被跳过的行
    pub raw_count: usize,
    pub rows: Vec<SpotRow>,
}

/// 获取沪深京A股全量实时行情
///
/// 按 pz 分页拉取，直到累计的原始条数达到 data.total 或某页 diff 为空；
/// 任何请求或解析失败直接返回错误
pub async fn fetch_spot_em(
    client: &Client,
    base_url: &str,
    page_size: usize,
    page_delay: Duration,
) -> Result<Vec<SpotRow>> {
    let page_size = page_size.max(1);
    let mut rows: Vec<SpotRow> = Vec::new();
    let mut fetched = 0usize;
    let mut page = 1usize;

    loop {
        let batch = fetch_em_page(client, base_url, page, page_size).await?;
        fetched += batch.raw_count;
        log::debug!(
            "东方财富第 {} 页: {}/{} 条有效，累计 {}/{}",
            page,
            batch.rows.len(),
            batch.raw_count,
            fetched,
            batch.total
        );
        rows.extend(batch.rows);

        if batch.raw_count == 0 || fetched >= batch.total {
            break;
        }

        page += 1;
        if !page_delay.is_zero() {
            tokio::time::sleep(page_delay).await;
        }
    }

    log::info!("东方财富实时行情共 {} 条", rows.len());
    Ok(rows)
}

async fn fetch_em_page(client: &Client, base_url: &str, page: usize, page_size: usize) -> Result<EmPage> {
    let response = client
        .get(base_url)
        .query(&[
            ("pn", page.to_string().as_str()),
            ("pz", page_size.to_string().as_str()),
            ("po", "1"),
            ("np", "1"),
            ("ut", EASTMONEY_UT),
            ("fltt", "2"),
            ("invt", "2"),
            ("fid", "f12"),
            ("fs", EASTMONEY_A_SHARE_FS),
            ("fields", EASTMONEY_SPOT_FIELDS),
        ])
        .header("Referer", EASTMONEY_REFERER)
        .send()
        .await
        .with_context(|| format!("请求东方财富行情失败: {}", base_url))?;

    if !response.status().is_success() {
        return Err(anyhow!("获取东方财富行情失败: {}", response.status()));
    }

    let json: Value = response
        .json()
        .await
        .with_context(|| format!("东方财富数据解析失败: {} 第 {} 页", base_url, page))?;

    parse_em_page(&json)
}

/// 解析 clist 接口响应
///
/// data 为 null 表示没有数据；diff 在 np=1 时为数组，np=0 时为以序号为键的对象，
/// 对象形式按序号数值排序以保持接口原始顺序
pub fn parse_em_page(json: &Value) -> Result<EmPage> {
    let data = match json.get("data") {
        Some(Value::Null) | None => return Ok(EmPage::default()),
        Some(data) => data,
    };

    let total = data
        .get("total")
        .and_then(Value::as_u64)
        .ok_or_else(|| anyhow!("响应缺少 data.total 字段"))? as usize;

    let items: Vec<&Value> = match data.get("diff") {
        Some(Value::Array(arr)) => arr.iter().collect(),
        Some(Value::Object(map)) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| match (a.parse::<usize>(), b.parse::<usize>()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            });
            entries.into_iter().map(|(_, v)| v).collect()
        }
        Some(Value::Null) | None => Vec::new(),
        Some(other) => return Err(anyhow!("无法识别的 data.diff 格式: {}", other)),
    };

    let raw_count = items.len();
    let mut rows = Vec::with_capacity(raw_count);
    for item in items {
        match parse_em_item(item) {
            Some(row) => rows.push(row),
            None => log::debug!("跳过缺少代码或名称的行: {}", item),
        }
    }

    Ok(EmPage { total, raw_count, rows })
}

/// 字段映射：
///   f2=最新价, f3=涨跌幅, f4=涨跌额, f5=成交量, f6=成交额, f7=振幅,
///   f8=换手率, f9=市盈率-动态, f10=量比, f11=5分钟涨跌, f12=代码, f14=名称,
///   f15=最高, f16=最低, f17=今开, f18=昨收, f20=总市值, f21=流通市值,
///   f22=涨速, f23=市净率, f24=60日涨跌幅, f25=年初至今涨跌幅
fn parse_em_item(item: &Value) -> Option<SpotRow> {
    let code = get_string(item, "f12")?;
    let name = get_string(item, "f14")?;

    Some(SpotRow {
        code,
        name,
        latest_price: get_f64(item, "f2"),
        change_percent: get_f64(item, "f3"),
        change: get_f64(item, "f4"),
        volume: get_f64(item, "f5"),
        amount: get_f64(item, "f6"),
        amplitude: get_f64(item, "f7"),
        high: get_f64(item, "f15"),
        low: get_f64(item, "f16"),
        open: get_f64(item, "f17"),
        prev_close: get_f64(item, "f18"),
        volume_ratio: get_f64(item, "f10"),
        turnover_rate: get_f64(item, "f8"),
        pe_dynamic: get_f64(item, "f9"),
        pb: get_f64(item, "f23"),
        total_market_cap: get_f64(item, "f20"),
        float_market_cap: get_f64(item, "f21"),
        speed: get_f64(item, "f22"),
        change_5min: get_f64(item, "f11"),
        change_60d: get_f64(item, "f24"),
        change_ytd: get_f64(item, "f25"),
    })
}
