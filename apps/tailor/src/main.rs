mod artifacts;
mod assembler;
mod compiler;
mod config;
mod errors;
mod models;
mod pipeline;
mod quality;
mod scoring;
mod selector;
mod store;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compiler::CompilerGateway;
use crate::config::Config;
use crate::models::job::JobPosting;
use crate::pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor pipeline v{}", env!("CARGO_PKG_VERSION"));

    let postings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: tailor <postings.json>")?;

    // Load the candidate profile — fatal if missing or malformed
    let profile = store::load_profile(&config.profile_path).await?;
    info!(
        candidate = %profile.contact.name,
        experience = profile.experience.len(),
        projects = profile.projects.len(),
        "candidate profile loaded"
    );

    // Probe the LaTeX toolchain once per process; refuse to start on failure
    let compiler = CompilerGateway::new(
        &config.latex_bin,
        &config.failed_dir,
        Duration::from_secs(config.probe_timeout_secs),
        Duration::from_secs(config.pass_timeout_secs),
    );
    let (ok, diagnostic) = compiler.verify_toolchain(&profile.preamble).await;
    if !ok {
        bail!("LaTeX toolchain probe failed: {diagnostic}");
    }
    info!("toolchain probe passed: {diagnostic}");

    // Read the posting batch
    let raw = tokio::fs::read_to_string(&postings_path)
        .await
        .with_context(|| format!("cannot read postings file '{}'", postings_path.display()))?;
    let jobs: Vec<JobPosting> = serde_json::from_str(&raw)
        .with_context(|| format!("'{}' is not a JSON array of postings", postings_path.display()))?;
    info!(count = jobs.len(), "postings loaded");

    // Sequential, one posting at a time — each run performs blocking
    // external-compiler invocations
    let pipeline = Pipeline::new(config, profile, compiler);
    let summary = pipeline.run(&jobs).await;

    if summary.accepted == 0 && summary.total > 0 {
        info!("no posting produced an accepted artifact this run");
    }
    Ok(())
}
