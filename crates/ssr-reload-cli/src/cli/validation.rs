/// Parse the `--protocol` flag.
///
/// Accepts `http` or `https` in any case and normalizes to lowercase.
///
/// # Errors
///
/// Returns an error message for any other scheme.
pub fn parse_protocol(s: &str) -> Result<String, String> {
    let protocol = s.trim().to_ascii_lowercase();
    match protocol.as_str() {
        "http" | "https" => Ok(protocol),
        "" => Err("Protocol cannot be empty".to_string()),
        _ => Err(format!("Protocol must be 'http' or 'https': '{}'", s)),
    }
}
