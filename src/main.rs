//! qrserver - fetch a QR code image from api.qrserver.com and save it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use qrserver_client::{
    config, CertificateValidation, Color, ErrorCorrectionLevel, ImageFormat, QrImageClient,
    QrOptions, TransportOptions,
};

/// Generate a QR code image via the qrserver.com API
#[derive(Parser, Debug)]
#[command(name = "qrserver", version, about, long_about = None)]
struct Cli {
    /// Text to encode
    text: String,

    /// Image width and height in pixels
    #[arg(short, long, default_value_t = config::DEFAULT_SIZE)]
    size: u32,

    /// Output file (defaults to qrcode.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with rendering options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Error correction level: L, M, Q or H
    #[arg(long)]
    ecc: Option<ErrorCorrectionLevel>,

    /// Pixel margin, 0-50
    #[arg(long, allow_negative_numbers = true)]
    margin: Option<i32>,

    /// Quiet zone in modules, 0-100
    #[arg(long, allow_negative_numbers = true)]
    quiet_zone: Option<i32>,

    /// Background color as RRGGBB
    #[arg(long)]
    bg: Option<Color>,

    /// Foreground color as RRGGBB
    #[arg(long)]
    fg: Option<Color>,

    /// png, gif, jpeg, svg or eps
    #[arg(long)]
    format: Option<ImageFormat>,

    /// Alternative endpoint serving the same API
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Print the request URI and exit without downloading
    #[arg(long)]
    print_uri: bool,
}

impl Cli {
    fn options(&self) -> Result<QrOptions> {
        let base = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                QrOptions::from_json(&json)
                    .with_context(|| format!("Invalid options in {}", path.display()))?
            }
            None => QrOptions::default(),
        };

        let mut builder = base.to_builder();
        if let Some(ecc) = self.ecc {
            builder = builder.error_correction(ecc);
        }
        if let Some(margin) = self.margin {
            builder = builder.margin(margin);
        }
        if let Some(quiet_zone) = self.quiet_zone {
            builder = builder.quiet_zone(quiet_zone);
        }
        if let Some(bg) = self.bg {
            builder = builder.background(bg);
        }
        if let Some(fg) = self.fg {
            builder = builder.foreground(fg);
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        Ok(builder.build()?)
    }

    fn transport_options(&self) -> TransportOptions {
        let mut opts = TransportOptions::default();
        if let Some(secs) = self.timeout_secs {
            opts.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if self.insecure {
            opts.certificate_validation = CertificateValidation::AcceptInvalid;
        }
        opts
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = cli.options()?;

    let mut client = QrImageClient::with_transport_options(options, cli.transport_options())
        .context("Failed to create HTTP client")?;
    if let Some(base_url) = &cli.base_url {
        client = client.with_base_uri(base_url)?;
    }

    if cli.print_uri {
        println!("{}", client.uri(&cli.text, cli.size));
        return Ok(());
    }

    let bytes = client
        .get_image(&cli.text, cli.size)
        .context("Failed to fetch QR code image")?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("qrcode.{}", options.format().extension())));
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!("Saved {} ({}, {} bytes)", output.display(), client.mime_type(), bytes.len());
    Ok(())
}
