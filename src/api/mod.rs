//! Transport layer for talking to the remote QR image service.

pub mod http;

pub use http::{CertificateValidation, HttpTransport, Transport, TransportError, TransportOptions};
