use prometheus::core::Collector;
use prometheus::{Encoder, IntGauge, Opts, TextEncoder};

pub const ACTIVE_SESSIONS_METRIC: &str = "concurrent_connections";
pub const ACTIVE_SESSIONS_HELP: &str = "The number of active user sessions.";

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Render the live-session gauge in Prometheus text format.
///
/// A fresh gauge is built per scrape so concurrent scrapes never observe each
/// other's counts.
pub fn render_active_sessions(active: usize) -> Result<String, prometheus::Error> {
    let gauge = IntGauge::with_opts(Opts::new(ACTIVE_SESSIONS_METRIC, ACTIVE_SESSIONS_HELP))?;
    gauge.set(i64::try_from(active).unwrap_or(i64::MAX));

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&gauge.collect(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposition_format() {
        let text = render_active_sessions(3).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# HELP concurrent_connections The number of active user sessions.",
                "# TYPE concurrent_connections gauge",
                "concurrent_connections 3",
            ]
        );
    }

    #[test]
    fn test_zero_sessions() {
        let text = render_active_sessions(0).unwrap();
        assert!(text.ends_with("concurrent_connections 0\n"));
    }
}
