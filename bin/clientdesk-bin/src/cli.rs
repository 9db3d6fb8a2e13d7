use clap::Parser;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// OTEL collector endpoint
    #[arg(long, env = "OTEL_COLLECTOR_ENDPOINT")]
    pub otel_collector_endpoint: Option<String>,

    /// API port
    #[arg(long, env = "API_PORT", default_value = "8080")]
    pub api_port: u16,

    /// HS256 secret shared with the identity provider
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Root directory of the client-logos and project-documents buckets
    #[arg(long, env = "STORAGE_ROOT", default_value = "./storage")]
    pub storage_root: String,

    /// Chat assistant webhook, chat is disabled when unset
    #[arg(long, env = "CHAT_WEBHOOK_URL")]
    pub chat_webhook_url: Option<Url>,

    /// Seconds between two overdue payout scans
    #[arg(
        long,
        env = "OVERDUE_SCAN_INTERVAL_SECS",
        default_value = "3600",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub overdue_scan_interval_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(interval: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from([
            "clientdesk",
            "--database-url",
            "postgres://localhost/clientdesk",
            "--jwt-secret",
            "secret",
            "--overdue-scan-interval-secs",
            interval,
        ])
    }

    #[test]
    fn scan_interval_must_be_positive() {
        assert!(parse("0").is_err());
        assert_eq!(parse("60").unwrap().overdue_scan_interval_secs, 60);
    }
}
