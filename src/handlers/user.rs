use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::error::AppError;
use crate::models::*;
use crate::services::MockBackend;

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "user",
    params(
        ("id" = i64, Path, description = "用户 id")
    ),
    responses(
        (status = 200, description = "获取用户成功", body = User),
        (status = 404, description = "用户不存在", body = ApiError)
    )
)]
pub async fn get_user(
    backend: web::Data<MockBackend>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match backend.get_user(path.into_inner()).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Ok(None) => Ok(AppError::NotFound("User not found".to_string()).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}/spins",
    tag = "user",
    params(
        ("id" = i64, Path, description = "用户 id")
    ),
    responses(
        (status = 200, description = "剩余次数（未知用户为 0）", body = SpinBalance)
    )
)]
pub async fn get_spins(
    backend: web::Data<MockBackend>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match backend.get_spins(user_id).await {
        Ok(spins) => Ok(HttpResponse::Ok().json(ApiResponse::success(SpinBalance { user_id, spins }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/users/{id}/spin",
    tag = "spin",
    params(
        ("id" = i64, Path, description = "用户 id")
    ),
    responses(
        (status = 200, description = "抽奖成功", body = SpinResult),
        (status = 404, description = "用户不存在", body = ApiError),
        (status = 409, description = "没有剩余次数", body = ApiError),
        (status = 500, description = "奖品目录为空", body = ApiError)
    )
)]
/// 进行一次抽奖:
/// 1. 检查剩余次数
/// 2. 在当前目录中等概率选择奖品
/// 3. 扣减次数并生成中奖记录
pub async fn spin(backend: web::Data<MockBackend>, path: web::Path<i64>) -> Result<HttpResponse> {
    match backend.perform_spin(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}/wins",
    tag = "spin",
    params(
        ("id" = i64, Path, description = "用户 id"),
        ("limit" = Option<usize>, Query, description = "条数上限 (默认50)")
    ),
    responses(
        (status = 200, description = "中奖记录（倒序）", body = [WinRecord])
    )
)]
pub async fn get_wins(
    backend: web::Data<MockBackend>,
    path: web::Path<i64>,
    query: web::Query<WinHistoryQuery>,
) -> Result<HttpResponse> {
    match backend
        .fetch_previous_wins(path.into_inner(), query.get_limit())
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/{id}", web::get().to(get_user))
            .route("/{id}/spins", web::get().to(get_spins))
            .route("/{id}/spin", web::post().to(spin))
            .route("/{id}/wins", web::get().to(get_wins)),
    );
}
