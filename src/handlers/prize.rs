use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::error::AppError;
use crate::models::*;
use crate::services::MockBackend;

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "prize",
    responses(
        (status = 200, description = "获取奖品目录成功", body = [Prize])
    )
)]
/// 当前奖品目录（顺序即转盘上的扇区顺序）
pub async fn get_prizes(backend: web::Data<MockBackend>) -> Result<HttpResponse> {
    match backend.fetch_prizes().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/prizes",
    tag = "prize",
    request_body = Prize,
    responses(
        (status = 200, description = "添加成功，返回新的目录", body = [Prize]),
        (status = 400, description = "奖品 id 或名称为空", body = ApiError)
    )
)]
/// 添加奖品；id 已存在时替换原奖品
pub async fn add_prize(
    backend: web::Data<MockBackend>,
    prize: web::Json<Prize>,
) -> Result<HttpResponse> {
    let prize = prize.into_inner();
    if prize.id.trim().is_empty() || prize.full_name.trim().is_empty() {
        return Ok(
            AppError::ValidationError("Prize id and name are required".to_string())
                .error_response(),
        );
    }

    match backend.add_prize(prize).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/prizes/{id}",
    tag = "prize",
    params(
        ("id" = String, Path, description = "奖品 id")
    ),
    responses(
        (status = 200, description = "删除成功（id 不存在时目录不变）", body = [Prize])
    )
)]
pub async fn remove_prize(
    backend: web::Data<MockBackend>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match backend.remove_prize(&path.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("", web::get().to(get_prizes))
            .route("", web::post().to(add_prize))
            .route("/{id}", web::delete().to(remove_prize)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed_prizes;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_catalog_add_and_remove() {
        let backend = MockBackend::without_latency();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(backend.clone()))
                .configure(prize_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/prizes").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), seed_prizes().len());
        assert_eq!(body["data"][5]["fullName"], "Jackpot!");
        assert_eq!(body["data"][5]["rarity"], "legendary");

        let req = test::TestRequest::post()
            .uri("/prizes")
            .set_json(json!({ "id": "X1", "fullName": "Sticker" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let catalog = body["data"].as_array().unwrap();
        assert_eq!(catalog.len(), seed_prizes().len() + 1);
        assert_eq!(catalog.last().unwrap()["rarity"], "common");

        let req = test::TestRequest::delete().uri("/prizes/X1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(backend.fetch_prizes().await.unwrap(), seed_prizes());
    }

    #[actix_web::test]
    async fn test_add_prize_requires_name() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(MockBackend::without_latency()))
                .configure(prize_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/prizes")
            .set_json(json!({ "id": "X1", "fullName": " " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
