//! Matcher metrics.

use metrics::counter;

pub mod names {
    pub const MATCHES_TOTAL: &str = "qreel_matches_total";
}

/// Record one match attempt. `outcome` is `success` or an error kind.
pub fn record_match(provider: &str, outcome: &str) {
    let labels = [
        ("provider", provider.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::MATCHES_TOTAL, &labels).increment(1);
}
