mod extractors;
mod handlers;
mod routes;

use buzzclip_app::{AppConfig, AppContext};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let app_context = match AppContext::from_config(&config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize database");
            std::process::exit(1);
        }
    };

    // one scheduler per deployment; disable it on extra replicas
    let scheduler = if config.scheduler_enabled {
        Some(app_context.snapshot_scheduler().start())
    } else {
        tracing::info!("Snapshot scheduler disabled");
        None
    };

    let app = routes::router(app_context);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr, "Failed to bind address");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on http://{}", config.bind_addr);
    tracing::info!(
        "Trending: min {} votes, {}x pace, {}m/{}m windows. Vote limit {}/min",
        config.trending.min_votes,
        config.trending.multiplier,
        config.trending.short_window_mins,
        config.trending.long_window_mins,
        config.vote_rate_limit_per_minute
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    if let Some(scheduler) = scheduler {
        scheduler.stop().await;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
