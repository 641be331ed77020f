//! 业务逻辑服务模块
//! 
//! 封装行情获取、排序过滤和文件导出逻辑

pub mod export;     // stocks.json 读写
pub mod ranking;    // 市值排序与名称过滤
pub mod stock;      // 行情数据源
