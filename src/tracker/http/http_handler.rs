use std::fmt;
use std::io::{self, Read, Write};
use std::net::TcpStream;

use native_tls::{self, TlsConnector};

use super::query_params::QueryParams;
use super::url_parser::ParsedUrl;

/// Possible `HttpHandler` errors.
#[derive(Debug)]
pub enum HttpHandlerError {
    Connect(io::Error),
    CreateTlsConnector(native_tls::Error),
    TlsHandshake(String),
    Write(io::Error),
    Read(io::Error),
}

impl fmt::Display for HttpHandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpHandlerError::Connect(e) => write!(f, "tcp connect failed: {}", e),
            HttpHandlerError::CreateTlsConnector(e) => write!(f, "tls connector: {}", e),
            HttpHandlerError::TlsHandshake(msg) => write!(f, "tls handshake: {}", msg),
            HttpHandlerError::Write(e) => write!(f, "write failed: {}", e),
            HttpHandlerError::Read(e) => write!(f, "read failed: {}", e),
        }
    }
}

/// Issues the one HTTP GET the core needs from a tracker: builds the
/// request line from a parsed announce URL and query string, connects
/// plain or through `native-tls` depending on the URL's scheme, and
/// returns the response body with its headers stripped.
pub struct HttpHandler;

impl HttpHandler {
    pub fn get(url: &ParsedUrl, query: &QueryParams) -> Result<Vec<u8>, HttpHandlerError> {
        let request = Self::build_request(url, query);
        let stream = TcpStream::connect((url.host.as_str(), url.port))
            .map_err(HttpHandlerError::Connect)?;

        if url.is_tls {
            let connector = TlsConnector::new().map_err(HttpHandlerError::CreateTlsConnector)?;
            let mut tls_stream = connector
                .connect(&url.host, stream)
                .map_err(|e| HttpHandlerError::TlsHandshake(e.to_string()))?;
            Self::send_and_read(&mut tls_stream, &request)
        } else {
            let mut stream = stream;
            Self::send_and_read(&mut stream, &request)
        }
    }

    fn build_request(url: &ParsedUrl, query: &QueryParams) -> String {
        format!(
            "GET {}?{} HTTP/1.1\r\nHost: {}\r\nUser-Agent: peer_exchange_core/0.1\r\nConnection: close\r\n\r\n",
            url.path,
            query.build(),
            url.host,
        )
    }

    fn send_and_read<S: Read + Write>(
        stream: &mut S,
        request: &str,
    ) -> Result<Vec<u8>, HttpHandlerError> {
        stream
            .write_all(request.as_bytes())
            .map_err(HttpHandlerError::Write)?;

        let mut response = Vec::new();
        stream
            .read_to_end(&mut response)
            .map_err(HttpHandlerError::Read)?;

        Ok(Self::strip_headers(&response).to_vec())
    }

    /// The tracker's bencoded body follows the first blank line of the HTTP
    /// response.
    fn strip_headers(response: &[u8]) -> &[u8] {
        for i in 0..response.len() {
            if response[i..].starts_with(b"\r\n\r\n") {
                return &response[i + 4..];
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_strip_headers_finds_blank_line() {
        let response = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";
        assert_eq!(HttpHandler::strip_headers(response), b"hello");
    }

    #[test]
    fn test_strip_headers_no_blank_line_returns_whole_response() {
        let response = b"not an http response";
        assert_eq!(HttpHandler::strip_headers(response), &response[..]);
    }

    #[test]
    fn test_build_request_has_path_and_query() {
        let url = ParsedUrl {
            is_tls: false,
            host: "tracker.example.com".to_string(),
            port: 6969,
            path: "/announce".to_string(),
        };
        let query = QueryParams::new([1u8; 20], [2u8; 20], 6881, 10);
        let request = HttpHandler::build_request(&url, &query);

        assert!(request.starts_with("GET /announce?info_hash="));
        assert!(request.contains("Host: tracker.example.com\r\n"));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_http_get_against_fake_tracker() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]);
            assert!(request.starts_with("GET /announce?info_hash="));

            let body = b"d8:completei1ee";
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });

        let url = ParsedUrl {
            is_tls: false,
            host: "127.0.0.1".to_string(),
            port,
            path: "/announce".to_string(),
        };
        let query = QueryParams::new([1u8; 20], [2u8; 20], 6881, 10);
        let body = HttpHandler::get(&url, &query).unwrap();

        assert_eq!(body, b"d8:completei1ee");
        handle.join().unwrap();
    }
}
