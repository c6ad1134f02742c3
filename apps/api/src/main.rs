mod cli;
mod config;
mod errors;
mod extraction;
mod matching;
mod report;
mod routes;
mod state;
mod text;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::extraction::SkillDictionary;
use crate::matching::corpus::{CorpusHandle, JobCorpus};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let command = Cli::parse().command.unwrap_or(Command::Serve);

    // Load configuration first (fails on unparsable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match command {
        Command::Serve => serve(config).await,
        Command::Rank(args) => cli::run_rank(&args, &config),
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting ATS Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Skill dictionary: built-in table, optionally extended or replaced from JSON
    let dictionary = SkillDictionary::load(
        config.skill_dictionary_path.as_deref(),
        config.skill_dictionary_mode,
    )
    .context("failed to load skill dictionary")?;
    if dictionary.is_empty() {
        warn!("Skill dictionary is empty: skill scores and highlighting are disabled");
    } else {
        info!("Skill dictionary loaded ({} skills)", dictionary.len());
    }

    // Job corpus: a missing or unreadable CSV is a startup failure
    let corpus = JobCorpus::from_csv_path(&config.jobs_csv_path, &dictionary).with_context(|| {
        format!(
            "failed to load job corpus from {}",
            config.jobs_csv_path.display()
        )
    })?;

    let state = AppState::new(config.clone(), CorpusHandle::new(corpus), Arc::new(dictionary));
    info!("Scoring strategy: {}", state.scorer.strategy());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
