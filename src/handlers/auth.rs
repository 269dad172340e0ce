use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::MockBackend;
use crate::utils::validate_username;

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功（新用户自动创建）", body = User),
        (status = 400, description = "用户名不合法", body = ApiError)
    )
)]
/// 按用户名登录，不存在则创建
pub async fn login(
    backend: web::Data<MockBackend>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let username = match validate_username(&request.username) {
        Ok(username) => username,
        Err(e) => return Ok(e.error_response()),
    };

    match backend.login(&username, &request.code).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "登出成功", body = Ack)
    )
)]
pub async fn logout(backend: web::Data<MockBackend>) -> Result<HttpResponse> {
    match backend.logout().await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(Ack::ok()))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout)),
    );
}
