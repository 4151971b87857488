use chrono::Utc;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Milliseconds since the unix epoch, in UTC. The local timezone of the host never leaks into this value.
pub fn utc_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}
