use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::logout,
        handlers::prize::get_prizes,
        handlers::prize::add_prize,
        handlers::prize::remove_prize,
        handlers::user::get_user,
        handlers::user::get_spins,
        handlers::user::spin,
        handlers::user::get_wins,
        handlers::admin::list_users,
        handlers::admin::give_spins,
        handlers::admin::update_spins,
        handlers::admin::reset,
    ),
    components(
        schemas(
            User,
            UserPatch,
            LoginRequest,
            GiveSpinsRequest,
            UpdateSpinsRequest,
            SpinBalance,
            Prize,
            Rarity,
            SpinResult,
            WinRecord,
            WinHistoryQuery,
            Ack,
            ApiError,
        )
    ),
    tags(
        (name = "auth", description = "Login / logout"),
        (name = "prize", description = "Prize catalog"),
        (name = "user", description = "Player lookup"),
        (name = "spin", description = "Spinning and win history"),
        (name = "admin", description = "Spin allotments and mock data reset"),
    ),
    info(
        title = "Naughty Spin API",
        version = "0.1.0",
        description = "Mock backend for the Naughty Spin prize wheel"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
