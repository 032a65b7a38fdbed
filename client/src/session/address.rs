//! Server address validation

use url::Url;

use crate::errors::CoolifyError;

/// Body the health endpoint answers with
pub const HEALTH_OK: &str = "OK";

/// Reject anything that is not an absolute http(s) URL with a host
pub fn validate_address(address: &str) -> Result<(), CoolifyError> {
    let invalid = || CoolifyError::Validation(format!("Invalid server address: {}", address));

    let url = Url::parse(address.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// Strip a trailing `/`, then an `/api` suffix, then any trailing `/`
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/api").unwrap_or(trimmed);
    trimmed.trim_end_matches('/').to_string()
}

pub fn is_healthy_body(body: &str) -> bool {
    body.trim() == HEALTH_OK
}
