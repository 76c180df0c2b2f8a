//! Rapport — remember what people tell you.

use std::sync::Arc;

use rapport_core::RapportConfig;
use rapport_server::{build_router, AppState, Engine};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "serve" => {}
            "extract" => {
                let text = args[2..].join(" ");
                if text.trim().is_empty() {
                    eprintln!("Usage: rapport extract <text...>");
                    std::process::exit(1);
                }
                let result = rapport_extract::extract_rules(&text);
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Rapport — remember what people tell you");
                println!();
                println!("Usage: rapport [command]");
                println!();
                println!("Commands:");
                println!("  (none) | serve           Start the server");
                println!("  extract <text...>        Run the rule-based extractor and print JSON");
                println!("  help                     Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'rapport help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let config = RapportConfig::from_env()?;
    let port = config.port;
    info!("Data directory: {}", config.data_paths.root.display());

    let engine = Engine::from_config(&config)?;
    info!("Extraction engine: {} (mode {})", engine.describe(), config.extractor);

    let state = Arc::new(AppState::new(config, engine));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Rapport server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
