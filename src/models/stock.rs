//! 股票数据模型
//!
//! 定义A股实时行情快照及导出记录

use serde::{Deserialize, Serialize};

/// A股实时行情快照中的一行
///
/// 对应 akshare stock_zh_a_spot_em 的列；停牌或无数据的数值为 None
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SpotRow {
    /// 代码
    pub code: String,
    /// 名称
    pub name: String,
    /// 最新价
    pub latest_price: Option<f64>,
    /// 涨跌幅（百分比）
    pub change_percent: Option<f64>,
    /// 涨跌额
    pub change: Option<f64>,
    /// 成交量（手）
    pub volume: Option<f64>,
    /// 成交额
    pub amount: Option<f64>,
    /// 振幅
    pub amplitude: Option<f64>,
    /// 最高
    pub high: Option<f64>,
    /// 最低
    pub low: Option<f64>,
    /// 今开
    pub open: Option<f64>,
    /// 昨收
    pub prev_close: Option<f64>,
    /// 量比
    pub volume_ratio: Option<f64>,
    /// 换手率
    pub turnover_rate: Option<f64>,
    /// 市盈率-动态
    pub pe_dynamic: Option<f64>,
    /// 市净率
    pub pb: Option<f64>,
    /// 总市值（元）
    pub total_market_cap: Option<f64>,
    /// 流通市值（元）
    pub float_market_cap: Option<f64>,
    /// 涨速
    pub speed: Option<f64>,
    /// 5分钟涨跌
    pub change_5min: Option<f64>,
    /// 60日涨跌幅
    pub change_60d: Option<f64>,
    /// 年初至今涨跌幅
    pub change_ytd: Option<f64>,
}

/// 导出到 stocks.json 的股票记录
///
/// 字段顺序即序列化顺序：code 在前，name 在后
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StockEntry {
    /// 股票代码
    pub code: String,
    /// 股票名称
    pub name: String,
}

impl From<&SpotRow> for StockEntry {
    fn from(row: &SpotRow) -> Self {
        Self {
            code: row.code.clone(),
            name: row.name.clone(),
        }
    }
}

/// 排行查询参数
#[derive(Debug, Deserialize)]
pub struct TopStocksQuery {
    /// 返回数量限制
    pub limit: Option<usize>,
    /// 名称关键字过滤
    pub keyword: Option<String>,
}
