//! Request URI construction.
//!
//! The parameter names and their order form the compatibility contract with
//! the qrserver API:
//!
//! ```text
//! ?size=WxH&ecc=L&margin=4&qzone=1&bgcolor=FFFFFF&color=000000&format=png&data=...
//! ```

use std::borrow::Cow;

use url::Url;

use crate::config;
use crate::options::QrOptions;

/// Percent-encode caller text for the `data` parameter.
///
/// Everything except the RFC 3986 unreserved set (`A-Z a-z 0-9 - _ . ~`) is
/// escaped as UTF-8 bytes; spaces become `%20`.
pub fn escape_data(text: &str) -> Cow<'_, str> {
    urlencoding::encode(text)
}

/// Query string (without the leading `?`) for one image request
pub fn query_string(options: &QrOptions, text: &str, size: u32) -> String {
    format!(
        "size={size}x{size}&ecc={ecc}&margin={margin}&qzone={qzone}&bgcolor={bg}&color={fg}&format={format}&data={data}",
        size = size,
        ecc = options.error_correction().code(),
        margin = options.margin(),
        qzone = options.quiet_zone(),
        bg = options.background().to_hex(),
        fg = options.foreground().to_hex(),
        format = options.format().token(),
        data = escape_data(text),
    )
}

/// Absolute request URI against `base`
pub fn build_uri(base: &Url, options: &QrOptions, text: &str, size: u32) -> Url {
    let url = config::qr_image_url(base, &query_string(options, text, size));
    log::debug!(
        "Built QR image URI for {} ({} query bytes)",
        redacted(&url),
        url.query().map_or(0, str::len)
    );
    url
}

/// `uri` without its query and fragment. The query carries the encoded
/// payload, which may be a secret, so only this form goes into logs and
/// error messages.
pub fn redacted(uri: &Url) -> Url {
    let mut url = uri.clone();
    url.set_query(None);
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Color, ErrorCorrectionLevel, ImageFormat};

    fn default_uri(text: &str, size: u32) -> Url {
        build_uri(&config::DEFAULT_BASE_URI, &QrOptions::default(), text, size)
    }

    fn data_param(url: &Url) -> &str {
        let query = url.query().unwrap();
        let idx = query.find("&data=").unwrap();
        &query[idx + "&data=".len()..]
    }

    #[test]
    fn test_hello_world_example() {
        let url = default_uri("Hello World", 200);
        assert_eq!(
            url.as_str(),
            "https://api.qrserver.com/v1/create-qr-code/?size=200x200&ecc=L&margin=4&qzone=1&bgcolor=FFFFFF&color=000000&format=png&data=Hello%20World"
        );
    }

    #[test]
    fn test_parameter_order_and_values() {
        let opts = QrOptions::new(
            ErrorCorrectionLevel::Quartile,
            0,
            100,
            Some(Color::rgb(0x10, 0x20, 0xAB)),
            Some(Color::rgb(0xFE, 0xDC, 0xBA)),
            ImageFormat::Jpeg,
        )
        .unwrap();
        let url = build_uri(&config::DEFAULT_BASE_URI, &opts, "x", 50);

        let names: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(
            names,
            vec!["size", "ecc", "margin", "qzone", "bgcolor", "color", "format", "data"]
        );
        assert_eq!(
            url.query(),
            Some("size=50x50&ecc=Q&margin=0&qzone=100&bgcolor=1020AB&color=FEDCBA&format=jpeg&data=x")
        );
    }

    #[test]
    fn test_every_level_and_format_token() {
        for (level, letter) in [
            (ErrorCorrectionLevel::Low, "L"),
            (ErrorCorrectionLevel::Medium, "M"),
            (ErrorCorrectionLevel::Quartile, "Q"),
            (ErrorCorrectionLevel::High, "H"),
        ] {
            let opts = QrOptions::builder().error_correction(level).build().unwrap();
            let query = query_string(&opts, "", 1);
            assert!(query.contains(&format!("&ecc={}&", letter)), "{}", query);
        }

        for (format, token) in [
            (ImageFormat::Png, "png"),
            (ImageFormat::Gif, "gif"),
            (ImageFormat::Jpeg, "jpeg"),
            (ImageFormat::Svg, "svg"),
            (ImageFormat::Eps, "eps"),
        ] {
            let opts = QrOptions::builder().format(format).build().unwrap();
            let query = query_string(&opts, "", 1);
            assert!(query.contains(&format!("&format={}&", token)), "{}", query);
        }
    }

    #[test]
    fn test_deterministic() {
        let opts = QrOptions::builder().margin(7).build().unwrap();
        let a = build_uri(&config::DEFAULT_BASE_URI, &opts, "otpauth://totp/a?b=c", 300);
        let b = build_uri(&config::DEFAULT_BASE_URI, &opts, "otpauth://totp/a?b=c", 300);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_reserved_characters_escaped() {
        let text = "a&b=c d?e#f/g+h%i";
        let url = default_uri(text, 100);
        let data = data_param(&url);
        assert_eq!(data, "a%26b%3Dc%20d%3Fe%23f%2Fg%2Bh%25i");
        assert!(url.fragment().is_none());
        assert_eq!(url.query_pairs().count(), 8);
    }

    #[test]
    fn test_percent_decoding_recovers_text() {
        for text in [
            "Hello World",
            "otpauth://totp/ACME%20Co:john@example.com?secret=ABC&issuer=ACME Co",
            "ünïcødé ✓ 日本語",
            "~-_.!*'()[]{}<>\"\\|^`",
            "",
        ] {
            let url = default_uri(text, 200);
            let decoded = urlencoding::decode(data_param(&url)).unwrap();
            assert_eq!(decoded, text);
        }
    }

    #[test]
    fn test_unreserved_left_alone() {
        assert_eq!(escape_data("AZaz09-_.~"), "AZaz09-_.~");
        assert_eq!(escape_data("é"), "%C3%A9");
    }

    #[test]
    fn test_empty_text_and_zero_size_allowed() {
        let url = default_uri("", 0);
        assert!(url.as_str().ends_with("?size=0x0&ecc=L&margin=4&qzone=1&bgcolor=FFFFFF&color=000000&format=png&data="));
    }

    #[test]
    fn test_redacted_drops_payload() {
        let url = default_uri("otpauth://totp/x?secret=JBSWY3DPEHPK3PXP", 200);
        let shown = redacted(&url).to_string();
        assert_eq!(shown, "https://api.qrserver.com/v1/create-qr-code/");
        assert!(!shown.contains("JBSWY3DPEHPK3PXP"));
    }

    #[test]
    fn test_custom_base() {
        let base = Url::parse("http://localhost:9000/v1/create-qr-code/").unwrap();
        let url = build_uri(&base, &QrOptions::default(), "x", 10);
        assert!(url.as_str().starts_with("http://localhost:9000/v1/create-qr-code/?size=10x10&"));
    }
}
