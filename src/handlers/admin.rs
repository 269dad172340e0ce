use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::MockBackend;

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "全部用户", body = [User])
    )
)]
pub async fn list_users(backend: web::Data<MockBackend>) -> Result<HttpResponse> {
    match backend.list_users().await {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(users))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/{id}/give-spins",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "用户 id")
    ),
    request_body = GiveSpinsRequest,
    responses(
        (status = 200, description = "赠送成功（结果不低于 0）", body = User),
        (status = 404, description = "用户不存在", body = ApiError)
    )
)]
pub async fn give_spins(
    backend: web::Data<MockBackend>,
    path: web::Path<i64>,
    request: web::Json<GiveSpinsRequest>,
) -> Result<HttpResponse> {
    match backend.give_spins(path.into_inner(), request.amount).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/users/{id}/spins",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "用户 id")
    ),
    request_body = UpdateSpinsRequest,
    responses(
        (status = 200, description = "设置成功", body = User),
        (status = 400, description = "次数为负", body = ApiError),
        (status = 404, description = "用户不存在", body = ApiError)
    )
)]
pub async fn update_spins(
    backend: web::Data<MockBackend>,
    path: web::Path<i64>,
    request: web::Json<UpdateSpinsRequest>,
) -> Result<HttpResponse> {
    match backend.update_spins(path.into_inner(), request.spins).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "admin",
    responses(
        (status = 200, description = "已恢复初始数据", body = Ack)
    )
)]
pub async fn reset(backend: web::Data<MockBackend>) -> Result<HttpResponse> {
    match backend.reset().await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            Ack::ok(),
            "Mock data restored".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::get().to(list_users))
            .route("/users/{id}/give-spins", web::post().to(give_spins))
            .route("/users/{id}/spins", web::put().to(update_spins))
            .route("/reset", web::post().to(reset)),
    );
}
