use url::Url;

use crate::error::AppError;

/// Longest normalised name the registry accepts.
pub const MAX_NAME_LEN: usize = 255;

/// Reduce user input to the registry key `scheme://host[:port]`, lowercased.
///
/// Only absolute `http`/`https` addresses are accepted. Path, query,
/// fragment and credentials are dropped, and the port is kept only when it
/// differs from the scheme's default.
pub fn normalize_url(input: &str) -> Result<String, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::InvalidUrl("URL must not be blank".to_string()));
    }

    let parsed =
        Url::parse(input).map_err(|e| AppError::InvalidUrl(format!("{}: {}", input, e)))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(AppError::InvalidUrl(format!("unsupported scheme {}", scheme)));
    }

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::InvalidUrl(format!("{}: missing host", input)))?;

    let mut name = format!("{}://{}", scheme, host);
    if let Some(port) = parsed.port() {
        name.push_str(&format!(":{}", port));
    }
    let name = name.to_lowercase();

    if name.len() > MAX_NAME_LEN {
        return Err(AppError::InvalidUrl(format!(
            "longer than {} characters",
            MAX_NAME_LEN
        )));
    }

    Ok(name)
}
