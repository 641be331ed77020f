//! 公共常量和辅助函数

use chrono::Utc;
use chrono_tz::Asia::Shanghai;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde_json::Value;

// ==================== 东方财富 API 常量 ====================

/// 东方财富沪深京A股列表 API
pub const EASTMONEY_SPOT_API: &str = "https://82.push2.eastmoney.com/api/qt/clist/get";
/// 东方财富页面 Referer
pub const EASTMONEY_REFERER: &str = "https://quote.eastmoney.com/";
/// 沪深京A股市场过滤：深主板、创业板、沪主板、科创板、北交所
pub const EASTMONEY_A_SHARE_FS: &str = "m:0 t:6,m:0 t:80,m:1 t:2,m:1 t:23,m:0 t:81 s:2048";
/// 东方财富公共 ut 参数
pub const EASTMONEY_UT: &str = "bd1d9ddb04089700cf9c27f6f7426281";
/// 实时行情字段列表
pub const EASTMONEY_SPOT_FIELDS: &str =
    "f1,f2,f3,f4,f5,f6,f7,f8,f9,f10,f12,f13,f14,f15,f16,f17,f18,f20,f21,f23,f24,f25,f22,f11,f62,f128,f136,f115,f152";

// ==================== 新浪财经 API 常量 ====================

/// 新浪沪深A股列表 API
pub const SINA_SPOT_API: &str =
    "https://vip.stock.finance.sina.com.cn/quotes_service/api/json_v2.php/Market_Center.getHQNodeData";
/// 新浪沪深A股数量 API（与列表 API 同目录）
pub const SINA_COUNT_METHOD: &str = "Market_Center.getHQNodeStockCount";
/// 新浪页面 Referer
pub const SINA_REFERER: &str = "https://finance.sina.com.cn/";
/// 新浪沪深A股节点
pub const SINA_A_SHARE_NODE: &str = "hs_a";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// 获取北京时间字符串（ISO 8601 格式，带+08:00时区）
pub fn get_beijing_time() -> String {
    Utc::now().with_timezone(&Shanghai).to_rfc3339()
}

/// 把 JSON 值解析为数值
///
/// 接口对缺失值返回 "-" 或空串，数值可能是数字也可能是字符串
pub fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "-" {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// 读取 JSON 对象中的数值字段
pub fn get_f64(item: &Value, key: &str) -> Option<f64> {
    item.get(key).and_then(value_to_f64)
}

/// 读取 JSON 对象中的字符串字段，数字按原样转为字符串
pub fn get_string(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 按 Content-Type 的 charset 解码响应体，GBK/GB2312 走 encoding_rs
pub fn decode_body(headers: &HeaderMap, bytes: &[u8]) -> String {
    let charset = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    if charset.contains("gbk") || charset.contains("gb2312") || charset.contains("gb18030") {
        encoding_rs::GBK.decode(bytes).0.into_owned()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
