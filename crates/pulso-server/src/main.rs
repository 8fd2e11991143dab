mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(pulso_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let summarizer = match &config.summary_api_key {
        Some(key) => {
            let options = pulso_summarizer::SummaryOptions {
                model: config.summary_model.clone(),
                timeout_secs: config.summary_timeout_secs,
                max_comments: config.summary_max_comments,
            };
            let client = pulso_summarizer::SummaryClient::with_base_url(
                key,
                &options,
                &config.summary_base_url,
            )?;
            tracing::info!(model = %config.summary_model, "narrative summarizer enabled");
            Some(Arc::new(client))
        }
        None => {
            tracing::info!("PULSO_SUMMARY_API_KEY not set; narrative summaries disabled");
            None
        }
    };

    let app = build_app(AppState {
        config: Arc::clone(&config),
        summarizer,
    });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
