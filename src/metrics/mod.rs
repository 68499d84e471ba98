// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    ANALYSES_TOTAL,
    GEMINI_API_CALLS,
    GEMINI_API_DURATION,
    IMAGE_VALIDATIONS,
    TOKENS_TOTAL,
};

/// Helper to record an upload validation outcome
pub fn record_validation(outcome: &str) {
    IMAGE_VALIDATIONS.with_label_values(&[outcome]).inc();
}

/// Helper to record an analyze outcome
pub fn record_analysis(model: &str, outcome: &str) {
    ANALYSES_TOTAL.with_label_values(&[model, outcome]).inc();
}

/// Helper to record Gemini API call metrics
pub fn record_gemini_call(model: &str, status_code: u16, duration_secs: f64) {
    GEMINI_API_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    GEMINI_API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record token usage
pub fn record_tokens(model: &str, input: u32, output: u32) {
    if input > 0 {
        TOKENS_TOTAL
            .with_label_values(&[model, "input"])
            .inc_by(input as f64);
    }
    if output > 0 {
        TOKENS_TOTAL
            .with_label_values(&[model, "output"])
            .inc_by(output as f64);
    }
}
