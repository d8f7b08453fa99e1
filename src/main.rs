use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;
use tokio::sync::Mutex;

use kerelia_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::ChannelManagerApi,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::jwt::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(&config.jwt.secret);

    // The channel manager session is established once at startup; a
    // failed login is logged here and later pushes surface the error.
    let mut cm_api = ChannelManagerApi::new(config.channel_manager.clone());
    if let Err(e) = cm_api.login().await {
        log::error!("Channel manager login failed: {:?}", e);
    }
    let cm_api = Arc::new(Mutex::new(cm_api));

    let season_calendar_service = SeasonCalendarService::new(config.season.clone());
    let override_service = OverrideService::new(pool.clone());
    let season_request_service = SeasonRequestService::new(pool.clone());
    let reconciliation_service = ReconciliationService::new(pool.clone(), cm_api.clone());
    let calendar_service = CalendarService::new(pool.clone(), cm_api.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(season_calendar_service.clone()))
            .app_data(web::Data::new(override_service.clone()))
            .app_data(web::Data::new(season_request_service.clone()))
            .app_data(web::Data::new(reconciliation_service.clone()))
            .app_data(web::Data::new(calendar_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::season_config)
                    .configure(handlers::room_config)
                    .configure(handlers::calendar_config)
                    .configure(handlers::overrides_config)
                    .configure(handlers::season_request_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
