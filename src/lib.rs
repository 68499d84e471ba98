// gemini-vision - ask Gemini a question about an image
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod models;
pub mod utils;
pub mod vision;
