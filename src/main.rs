// gemini-vision - ask Gemini a question about an image
// Author: kelexine (https://github.com/kelexine)

use anyhow::{Context, Result};
use clap::Parser;
use gemini_vision::cli::Args;
use gemini_vision::config::AppConfig;
use gemini_vision::utils::logging;
use gemini_vision::vision::{ask_about_image, Credential, UploadedBlob};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(model) = &args.model {
        config.gemini.model = model.clone();
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting gemini-vision v{}", env!("CARGO_PKG_VERSION"));

    let outcome = run(&args, &config).await;

    if args.metrics {
        eprint!("{}", gemini_vision::metrics::gather_metrics());
    }

    outcome
}

async fn run(args: &Args, config: &AppConfig) -> Result<()> {
    // Phase 3: Read the upload
    let blob = UploadedBlob::from_path(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;

    // Phase 4: Validate, configure the model and ask the question
    let credential = Credential::new(args.api_key.clone());
    let answer = ask_about_image(&blob, &args.question, &credential, config).await?;

    println!("{}", answer);
    Ok(())
}
