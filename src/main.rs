// src/main.rs

use dotenvy::dotenv;
use leaderboard_backend::config::Config;
use leaderboard_backend::moodle::MoodleClient;
use leaderboard_backend::routes;
use leaderboard_backend::state::AppState;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load and validate configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Deliberate security posture: no secret means a public endpoint.
    if config.leaderboard_secret.is_none() {
        tracing::warn!("LEADERBOARD_SECRET not set; the leaderboard endpoint is public");
    }

    // Build the Moodle web-service client
    let moodle = match MoodleClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build Moodle client: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        course_id = config.course_id,
        subjects = config.subjects.len(),
        "Moodle client ready"
    );

    // Create AppState
    let state = AppState {
        moodle,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
