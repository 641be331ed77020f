//! API Key 认证中间件
//!
//! 支持 `Authorization: Bearer <key>` 或 `X-API-Key: <key>` 两种方式；
//! 未配置 key 时不做认证

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpResponse,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::models::ApiResponse;

const API_KEY_HEADER: &str = "X-API-Key";

/// API Key 中间件
pub struct ApiKeyAuth {
    api_key: Option<Rc<String>>,
}

impl ApiKeyAuth {
    /// 空字符串表示关闭认证
    pub fn new(api_key: &str) -> Self {
        let api_key = if api_key.is_empty() {
            None
        } else {
            Some(Rc::new(api_key.to_string()))
        };
        Self { api_key }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ApiKeyAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ApiKeyAuthService {
            service: Rc::new(service),
            api_key: self.api_key.clone(),
        })
    }
}

pub struct ApiKeyAuthService<S> {
    service: Rc<S>,
    api_key: Option<Rc<String>>,
}

/// 从请求头中取出客户端提供的 key
fn provided_key(req: &ServiceRequest) -> Option<&str> {
    let headers = req.headers();
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .or_else(|| headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()))
        .map(str::trim)
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let authorized = match &self.api_key {
            None => true,
            Some(_) if req.path().ends_with("/health") => true,
            Some(expected) => provided_key(&req) == Some(expected.as_str()),
        };

        Box::pin(async move {
            if authorized {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            log::warn!("拒绝未认证请求: {} {}", req.method(), req.path());
            let response = HttpResponse::Unauthorized()
                .json(ApiResponse::<()>::error("无效的 API Key"));
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}
