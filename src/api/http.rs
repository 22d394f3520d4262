//! Blocking HTTP transport for the qrserver API.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config;
use crate::uri::redacted;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-2xx response. `url` has its query removed.
    #[error("Server error: {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Server certificate handling for HTTPS requests
#[derive(Debug, Clone, Default)]
pub enum CertificateValidation {
    /// Platform/webpki roots
    #[default]
    Default,
    /// Additionally trust the given PEM-encoded root certificate
    TrustRoot(Vec<u8>),
    /// Skip verification entirely. Only for testing against local endpoints.
    AcceptInvalid,
}

/// Settings handed through to the HTTP client untouched
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub certificate_validation: CertificateValidation,
    /// `None` disables the timeout
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            certificate_validation: CertificateValidation::Default,
            timeout: Some(config::DEFAULT_TIMEOUT),
            user_agent: config::USER_AGENT.to_string(),
        }
    }
}

/// Performs a single GET and returns the full response body
pub trait Transport {
    fn download(&self, uri: &Url) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn download(&self, uri: &Url) -> Result<Vec<u8>, TransportError> {
        (**self).download(uri)
    }
}

/// HTTP transport backed by a blocking reqwest client
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_options(TransportOptions::default())
    }

    pub fn with_options(options: TransportOptions) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(options.user_agent)
            .timeout(options.timeout);

        match options.certificate_validation {
            CertificateValidation::Default => {}
            CertificateValidation::TrustRoot(pem) => {
                if !contains_pem_certificate(&pem) {
                    return Err(TransportError::Client(
                        "invalid root certificate: no PEM certificate block".to_string(),
                    ));
                }
                let cert = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| TransportError::Client(format!("invalid root certificate: {}", e)))?;
                builder = builder.add_root_certificate(cert);
            }
            CertificateValidation::AcceptInvalid => {
                log::warn!("TLS certificate validation disabled");
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn download(&self, uri: &Url) -> Result<Vec<u8>, TransportError> {
        let shown = redacted(uri);
        log::debug!("Fetching image from {}", shown);
        let response = self.client.get(uri.as_str()).send()?;

        if !response.status().is_success() {
            let status = response.status();
            log::warn!("Image request to {} returned {}", shown, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: shown.to_string(),
            });
        }

        let bytes = response.bytes()?;
        log::info!("Fetched {} bytes from {}", bytes.len(), uri.host_str().unwrap_or_default());
        Ok(bytes.to_vec())
    }
}

fn contains_pem_certificate(pem: &[u8]) -> bool {
    std::str::from_utf8(pem).is_ok_and(|text| text.contains("-----BEGIN CERTIFICATE-----"))
}
