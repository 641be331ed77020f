pub mod health;
pub mod stock;

use actix_web::web;
use reqwest::Client;

use crate::config::AppConfig;

/// 服务共享状态
pub struct AppState {
    pub config: AppConfig,
    pub client: Client,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(stock::config)
    );
}
