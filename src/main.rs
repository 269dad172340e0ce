use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;

use naughty_spin::{
    config::Config,
    handlers,
    middlewares::create_cors,
    services::MockBackend,
    swagger::swagger_config,
    utils::init_json_logger,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_json_logger();

    // 加载配置
    let config = Config::from_toml().context("Failed to load configuration file")?;

    // 内存模拟后端，所有 worker 共享同一份数据
    let backend = MockBackend::new(config.latency, config.seed);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(backend.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::prize_config)
                    .configure(handlers::user_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))
    .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?
    .run()
    .await?;

    Ok(())
}
