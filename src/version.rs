// Version information for the civic content engine

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-multi-source-aggregation-2025-08-25";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-25";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multi-source-search",
    "ttl-caching",
    "topic-aggregates",
    "rate-limit-gating",
    "provider-health-monitoring",
    "fallback-digest",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Civic Content Engine {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
