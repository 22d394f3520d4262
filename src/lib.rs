//! Client for the qrserver.com QR code image API.
//!
//! Architecture:
//! - `options` module: validated, immutable rendering options
//! - `uri` module: request URI construction (the wire contract)
//! - `api` module: transport trait and the blocking HTTP implementation
//! - `client` module: `QrImageClient`, tying options and transport together
//! - `config` module: endpoint and default values
//!
//! ```no_run
//! use qrserver_client::{QrImageClient, QrOptions};
//!
//! let client = QrImageClient::new(QrOptions::default())?;
//! let png = client.get_image("otpauth://totp/Example:alice?secret=JBSWY3DPEHPK3PXP", 200)?;
//! assert_eq!(client.mime_type(), "image/png");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod options;
pub mod uri;

pub use api::{CertificateValidation, HttpTransport, Transport, TransportError, TransportOptions};
pub use client::{QrCodeProvider, QrImageClient};
pub use options::{Color, ErrorCorrectionLevel, ImageFormat, OptionsError, QrOptions, QrOptionsBuilder};
