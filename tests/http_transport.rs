//! HttpTransport against a local one-shot HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use qrserver_client::{
    HttpTransport, ImageFormat, QrImageClient, QrOptions, Transport, TransportError,
};

/// Serve a single canned response; returns the base URL and a receiver for
/// the raw request line.
fn serve_once(status_line: &'static str, body: &'static [u8]) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let request = String::from_utf8_lossy(&request).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_string();
        tx.send(request_line).unwrap();

        let head = format!(
            "{}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status_line,
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
        stream.flush().unwrap();
    });

    (format!("http://{}/v1/create-qr-code/", addr), rx)
}

/// Direct connections only, whatever proxy the environment configures
fn local_transport() -> HttpTransport {
    HttpTransport::from_client(reqwest::blocking::Client::builder().no_proxy().build().unwrap())
}

#[test]
fn test_fetches_image_body() {
    let (base, requests) = serve_once("HTTP/1.1 200 OK", b"\x89PNG\r\n\x1a\nfake");

    let client = QrImageClient::with_transport(QrOptions::default(), local_transport())
        .with_base_uri(&base)
        .unwrap();
    let bytes = client.get_image("Hello World", 200).unwrap();

    assert_eq!(bytes, b"\x89PNG\r\n\x1a\nfake");
    assert_eq!(
        requests.recv().unwrap(),
        "GET /v1/create-qr-code/?size=200x200&ecc=L&margin=4&qzone=1&bgcolor=FFFFFF&color=000000&format=png&data=Hello%20World HTTP/1.1"
    );
}

#[test]
fn test_non_success_status_is_an_error() {
    let (base, _requests) = serve_once("HTTP/1.1 400 Bad Request", b"invalid size");

    let opts = QrOptions::builder().format(ImageFormat::Svg).build().unwrap();
    let client = QrImageClient::with_transport(opts, local_transport())
        .with_base_uri(&base)
        .unwrap();
    let err = client.get_image("x", 0).unwrap_err();

    assert!(matches!(err, TransportError::Status { status: 400, .. }));
}

#[test]
fn test_connection_refused_is_request_error() {
    // bind then drop to get a port nothing is listening on
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let url = url::Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

    let err = local_transport().download(&url).unwrap_err();
    assert!(matches!(err, TransportError::Request(_)));
}

#[test]
fn test_status_error_omits_payload() {
    let (base, _requests) = serve_once("HTTP/1.1 500 Internal Server Error", b"");

    let client = QrImageClient::with_transport(QrOptions::default(), local_transport())
        .with_base_uri(&base)
        .unwrap();
    let err = client
        .get_image("otpauth://totp/x?secret=JBSWY3DPEHPK3PXP", 200)
        .unwrap_err();

    assert!(matches!(err, TransportError::Status { status: 500, .. }));
    let message = err.to_string();
    assert!(message.ends_with("/v1/create-qr-code/"), "{}", message);
    assert!(!message.contains("JBSWY3DPEHPK3PXP"), "{}", message);
    assert!(!message.contains("data="), "{}", message);
}
