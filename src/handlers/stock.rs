use actix_web::{web, HttpResponse, Result};

use super::AppState;
use crate::models::{ApiResponse, StockEntry, TopStocksQuery};
use crate::services::{ranking, stock};

/// 单次查询最多返回的条数
const MAX_LIMIT: usize = 5000;

/// 实时拉取行情，返回按总市值降序的前 limit 只股票
///
/// 指定 keyword 时在排行结果上再按名称过滤，与 filter 命令一致
pub async fn top_stocks(
    state: web::Data<AppState>,
    query: web::Query<TopStocksQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(state.config.export.top_n).min(MAX_LIMIT);

    match stock::fetch_spot(&state.client, &state.config.export).await {
        Ok(rows) => {
            let mut entries = ranking::rank_by_market_cap(&rows, limit);
            if let Some(keyword) = query.keyword.as_deref().filter(|k| !k.is_empty()) {
                entries = ranking::filter_by_name(&entries, keyword);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
        }
        Err(e) => {
            log::error!("获取实时行情失败: {:#}", e);
            let response = ApiResponse::<Vec<StockEntry>>::error(format!("{:#}", e));
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stocks")
            .route("/top", web::get().to(top_stocks))
    );
}
