pub mod keepalive;
pub mod session;
pub mod soap;

pub use session::{Session, SessionManager};

use anyhow::{Result, anyhow};
use url::Url;

/// Validate and normalize the backend base URL, keeping any service path but
/// dropping a trailing slash.
///
/// # Errors
/// Returns an error if `url` cannot be parsed, has no host, or uses an
/// unsupported scheme.
pub fn normalize_base_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}"));
    }

    parsed
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?;

    Ok(url.trim_end_matches('/').to_string())
}
