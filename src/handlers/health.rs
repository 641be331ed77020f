use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::config::SpotSource;
use crate::models::ApiResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthInfo {
    pub status: String,
    pub version: String,
    /// 当前配置的行情数据源
    pub source: SpotSource,
}

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = ApiResponse::success(HealthInfo {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: state.config.export.source,
    });
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
