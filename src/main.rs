use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use std::sync::Arc;

use rustysend::api::handlers::AppState;
use rustysend::api::routes::{configure_routes, json_config};
use rustysend::config::Settings;
use rustysend::mailer::attachment::build_http_client;

#[derive(Parser, Debug)]
#[command(name = "rustysend-server", about = "SMTP relay HTTP API")]
struct Cli {
    /// Path to an optional configuration file
    #[arg(short, long, env = "RUSTYSEND_CONFIG")]
    config: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings =
        Settings::new(cli.config.as_deref()).expect("Failed to load configuration");

    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log.level.as_str()))
        .init();

    let relay = settings.smtp.relay();
    if relay.is_none() {
        warn!(
            "SMTP relay not configured (SMTP_SERVER/SMTP_USERNAME/SMTP_PASSWORD); \
             send capability disabled, health endpoints remain available"
        );
    }

    let http_client = build_http_client().expect("Failed to build HTTP client");

    let state = AppState {
        settings: Arc::new(settings.clone()),
        relay,
        http_client,
    };
    let app_data = web::Data::new(state);

    let bind_addr = (settings.rest.host.clone(), settings.rest.port);
    info!(
        "Starting server at http://{}:{}",
        settings.rest.host, settings.rest.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(json_config())
            .app_data(app_data.clone())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
