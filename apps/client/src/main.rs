use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use client::{ApiClient, ClientConfig, ResultStatus};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = std::env::args()
        .nth(1)
        .context("Usage: portfolioai <resume.txt>")?;
    let resume_text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read resume from '{path}'"))?;

    let client = ApiClient::new(&config);

    let health = client.health_check().await;
    if !health.ok {
        warn!(
            "backend health check failed: {}",
            health.error.unwrap_or_else(|| "not healthy".to_string())
        );
    }

    info!("optimizing resume from {path} ({} chars)", resume_text.len());
    let result = client.optimize_resume(&resume_text).await;

    match result.status {
        ResultStatus::Error => {
            eprintln!(
                "Optimization failed: {}",
                result.message.unwrap_or_else(|| "unknown error".to_string())
            );
            std::process::exit(1);
        }
        ResultStatus::Success => {
            println!("ATS score: {:.0}/100", result.score);
            if !result.suggestions.is_empty() {
                println!("\nSuggestions:");
                for suggestion in &result.suggestions {
                    println!("  - {suggestion}");
                }
            }
            if !result.missing_keywords.is_empty() {
                println!("\nMissing keywords: {}", result.missing_keywords.join(", "));
            }
            println!("\n{}", result.optimized_text);
        }
    }

    Ok(())
}
