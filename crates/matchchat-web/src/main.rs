//! matchchat-web — Axum dev server entry point.
//! Loads the seed, serves the chat API until Ctrl+C.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use matchchat_web::seed::Seed;
use matchchat_web::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let seed = Seed::load_or_demo(&project_root)?;

    let mut ids: Vec<String> = seed.matches.iter().map(|m| m.id.to_string()).collect();
    ids.sort();
    eprintln!(
        "\n  Serving {} match(es): {} ({} session(s))",
        seed.matches.len(),
        ids.join(", "),
        seed.sessions.len()
    );

    let app = server::router(AppState::new(seed));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = format!("0.0.0.0:{}", port);

    eprintln!("  Point matchchat-tui at http://localhost:{}\n", port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Graceful shutdown on Ctrl+C
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    info!("Server stopped.");
    Ok(())
}
