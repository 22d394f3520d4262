//! The QR image client: options in, image bytes out.

use url::Url;

use crate::api::{HttpTransport, Transport, TransportError, TransportOptions};
use crate::config;
use crate::options::{field, OptionsError, QrOptions};
use crate::uri;

/// Anything that can turn text into a QR code image
pub trait QrCodeProvider {
    /// Content type of the bytes returned by [`get_image`](Self::get_image)
    fn mime_type(&self) -> &str;

    /// Produce a `size` x `size` image encoding `text`
    fn get_image(&self, text: &str, size: u32) -> Result<Vec<u8>, TransportError>;
}

/// Client for the qrserver.com QR image API
///
/// Holds a validated [`QrOptions`] and a [`Transport`]. Every call to
/// [`get_image`](Self::get_image) issues exactly one GET request; failures
/// from the transport are returned as-is.
#[derive(Debug, Clone)]
pub struct QrImageClient<T = HttpTransport> {
    options: QrOptions,
    base_uri: Url,
    transport: T,
}

impl QrImageClient<HttpTransport> {
    /// Client with the default HTTP transport
    pub fn new(options: QrOptions) -> Result<Self, TransportError> {
        Ok(Self::with_transport(options, HttpTransport::new()?))
    }

    /// Client whose HTTP transport uses the given timeout and certificate policy
    pub fn with_transport_options(
        options: QrOptions,
        transport_options: TransportOptions,
    ) -> Result<Self, TransportError> {
        Ok(Self::with_transport(
            options,
            HttpTransport::with_options(transport_options)?,
        ))
    }
}

impl<T: Transport> QrImageClient<T> {
    pub fn with_transport(options: QrOptions, transport: T) -> Self {
        Self {
            options,
            base_uri: config::DEFAULT_BASE_URI.clone(),
            transport,
        }
    }

    /// Point the client at a different host serving the same API
    pub fn with_base_uri(mut self, base_uri: &str) -> Result<Self, OptionsError> {
        self.base_uri = config::parse_base_url(base_uri)
            .map_err(|reason| OptionsError::invalid(field::BASE_URI, reason))?;
        Ok(self)
    }

    pub fn options(&self) -> &QrOptions {
        &self.options
    }

    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request URI for `text` at `size` pixels, without fetching it
    pub fn uri(&self, text: &str, size: u32) -> Url {
        uri::build_uri(&self.base_uri, &self.options, text, size)
    }

    /// Fetch the QR code image for `text`
    pub fn get_image(&self, text: &str, size: u32) -> Result<Vec<u8>, TransportError> {
        let uri = self.uri(text, size);
        log::info!(
            "Requesting {}x{} {} QR code ({} chars)",
            size,
            size,
            self.options.format(),
            text.chars().count()
        );
        if self.options.format().is_vector() && self.options.margin() > 0 {
            log::debug!(
                "Margin {} is ignored by the service for {} output",
                self.options.margin(),
                self.options.format()
            );
        }
        self.transport.download(&uri)
    }

    pub fn mime_type(&self) -> &'static str {
        self.options.mime_type()
    }
}

impl<T: Transport> QrCodeProvider for QrImageClient<T> {
    fn mime_type(&self) -> &str {
        QrImageClient::mime_type(self)
    }

    fn get_image(&self, text: &str, size: u32) -> Result<Vec<u8>, TransportError> {
        QrImageClient::get_image(self, text, size)
    }
}
