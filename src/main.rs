use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use ecommerce_backend::{
    db::postgres::create_pool,
    graceful_shutdown::shutdown_signal,
    repositories::sqlx_repo::SqlxProductRepo,
    routes::configure_routes,
    settings::AppConfig,
    storage::{local::LocalStorage, s3::S3Storage},
    AppState, SharedProductRepo,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,aws_config=warn"));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.is_production());
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };

    let product_repo: SharedProductRepo = Arc::new(SqlxProductRepo::new(pool));
    let local_storage = LocalStorage::new(&config.upload_dir);

    let s3_storage = match config.s3_bucket.clone() {
        Some(bucket) => {
            tracing::info!(bucket = %bucket, region = %config.s3_region, "S3 storage enabled");
            Some(S3Storage::new(bucket, config.s3_region.clone(), config.s3_endpoint.clone()).await)
        }
        None => {
            tracing::info!("S3 storage not configured; S3 routes will return 500");
            None
        }
    };

    let app_state = web::Data::new(AppState::new(
        product_repo,
        local_storage,
        s3_storage,
        config.trust_x_forwarded_for,
    ));

    let server_addr = format!("{}:{}", config.host, config.port);
    let cors_origins = config.cors_origins();

    tracing::info!(
        "🚀 Starting {} v{} on {} (upload dir: {})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.upload_dir
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&cors_origins))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
