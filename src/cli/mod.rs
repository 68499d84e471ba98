// CLI module for gemini-vision
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;
use std::path::PathBuf;

/// gemini-vision - ask Gemini a question about an image
#[derive(Parser, Debug)]
#[command(name = "gemini-vision", version, about, long_about = None)]
pub struct Args {
    /// Image to analyze (PNG, JPEG or WebP, max 10MB)
    #[arg(short, long)]
    pub image: PathBuf,

    /// Question to ask about the image
    #[arg(short, long)]
    pub question: String,

    /// Google API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Override the configured Gemini model
    #[arg(long)]
    pub model: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long)]
    pub metrics: bool,
}
