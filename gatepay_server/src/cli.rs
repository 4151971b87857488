use std::env::{self, VarError};

const HELP: &str = include_str!("./cli-help.txt");

/// The environment variables the server reads, and whether their values may be printed.
const SETTINGS: [(&str, bool); 13] = [
    ("RUST_LOG", false),
    ("GPG_HOST", false),
    ("GPG_PORT", false),
    ("GPG_API_URL", false),
    ("GPG_CLIENT_ID", false),
    ("GPG_PAYMENT_KEY", true),
    ("GPG_MERCHANT_USER_ID", false),
    ("GPG_SITE_URL", false),
    ("GPG_GATEWAY_ID", false),
    ("GPG_CACHE_TTL", false),
    ("GPG_RECONCILE_ENABLED", false),
    ("GPG_RECONCILE_INTERVAL", false),
    ("GPG_RECONCILE_BATCH_SIZE", false),
];

/// The server takes no arguments. If any are given, prints usage and the current settings, and returns `true` so
/// that the caller exits without starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{HELP}\n");
    println!("{}", settings_report(|name| env::var(name)));
    true
}

fn settings_report<F>(lookup: F) -> String
where F: Fn(&str) -> Result<String, VarError> {
    let mut report = String::from("Current settings:\n");
    for (name, secret) in SETTINGS {
        let value = match (lookup(name), secret) {
            (Err(VarError::NotPresent), _) => "Not set".to_string(),
            (Ok(v), _) if v.trim().is_empty() => "Not set".to_string(),
            (_, true) => "**** (hidden)".to_string(),
            (Ok(v), false) => v,
            (Err(VarError::NotUnicode(v)), false) => format!("Invalid value: {}", v.to_string_lossy()),
        };
        report.push_str(&format!("  {name:<30} {value}\n"));
    }
    report
}
