use tracing_subscriber::fmt;

/// Initializes tracing for the CLI. Logs go to stderr so panel output on
/// stdout stays clean.
pub fn init_tracing() {
    fmt()
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()))
        .with_writer(std::io::stderr)
        .init();
}

/// Hides all but the last four characters of a secret.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    match chars.len() {
        0 => "(empty)".to_owned(),
        n if n <= 4 => "*".repeat(n),
        n => {
            let tail: String = chars[n - 4..].iter().collect();
            format!("{}{}", "*".repeat(n - 4), tail)
        }
    }
}
