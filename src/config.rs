//! Configuration constants for the qrserver client.

use std::time::Duration;

use once_cell::sync::Lazy;
use url::Url;

/// QR code endpoint of the goqr.me / qrserver.com API
pub const DEFAULT_BASE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Parsed form of [`DEFAULT_BASE_URL`]
pub static DEFAULT_BASE_URI: Lazy<Url> =
    Lazy::new(|| Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid absolute URL"));

/// Default pixel margin
pub const DEFAULT_MARGIN: u8 = 4;

/// Largest margin the service accepts
pub const MAX_MARGIN: u8 = 50;

/// Default quiet zone, in modules
pub const DEFAULT_QUIET_ZONE: u8 = 1;

/// Largest quiet zone the service accepts
pub const MAX_QUIET_ZONE: u8 = 100;

/// Image side length used by the CLI when none is given
pub const DEFAULT_SIZE: u32 = 200;

/// Request timeout applied by the HTTP transport unless overridden
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent header sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build the QR image URL for a pre-encoded query string
pub fn qr_image_url(base: &Url, query: &str) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.set_query(Some(query));
    url
}

/// Parse and check a replacement endpoint
pub fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(url)
}
