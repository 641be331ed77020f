//! 市值排序与名称过滤

use std::cmp::Ordering;

use crate::models::{SpotRow, StockEntry};

/// 按总市值降序排序并保留前 top_n 条
///
/// 稳定排序，市值相同的行保持原始顺序；没有市值的行排在所有有市值的行之后
pub fn rank_by_market_cap(rows: &[SpotRow], top_n: usize) -> Vec<StockEntry> {
    let mut ranked: Vec<&SpotRow> = rows.iter().collect();
    ranked.sort_by(|a, b| compare_cap_desc(a.total_market_cap, b.total_market_cap));

    ranked.into_iter().take(top_n).map(StockEntry::from).collect()
}

fn compare_cap_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 保留名称中包含关键字的股票，顺序不变
pub fn filter_by_name(entries: &[StockEntry], keyword: &str) -> Vec<StockEntry> {
    entries
        .iter()
        .filter(|e| e.name.contains(keyword))
        .cloned()
        .collect()
}
