use super::constants::{DEFAULT_ANNOUNCE_PORT, DEFAULT_TLS_PORT};

/// The pieces of an announce URL relevant to issuing a raw HTTP GET: whether
/// to speak TLS, which host/port to connect to, and the path+query prefix
/// to send in the request line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUrl {
    pub is_tls: bool,
    pub host: String,
    pub port: u16,
    pub path: String,
}

#[derive(Debug, PartialEq)]
pub enum UrlParseError {
    MissingScheme,
    UnsupportedScheme(String),
    MissingHost,
}

/// Parses an `http://` or `https://` announce URL. UDP trackers
/// (`udp://...`) are out of scope and rejected as an unsupported scheme.
pub fn parse(url: &str) -> Result<ParsedUrl, UrlParseError> {
    let (scheme, rest) = url.split_once("://").ok_or(UrlParseError::MissingScheme)?;

    let is_tls = match scheme {
        "http" => false,
        "https" => true,
        other => return Err(UrlParseError::UnsupportedScheme(other.to_string())),
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };

    if authority.is_empty() {
        return Err(UrlParseError::MissingHost);
    }

    let (host, port) = match authority.split_once(':') {
        Some((host, port_str)) => {
            let port = port_str
                .parse::<u16>()
                .unwrap_or(if is_tls { DEFAULT_TLS_PORT } else { DEFAULT_ANNOUNCE_PORT });
            (host.to_string(), port)
        }
        None => (
            authority.to_string(),
            if is_tls {
                DEFAULT_TLS_PORT
            } else {
                DEFAULT_ANNOUNCE_PORT
            },
        ),
    };

    Ok(ParsedUrl {
        is_tls,
        host,
        port,
        path: path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_with_explicit_port_and_path() {
        let parsed = parse("http://tracker.example.com:6969/announce").unwrap();
        assert_eq!(
            parsed,
            ParsedUrl {
                is_tls: false,
                host: "tracker.example.com".to_string(),
                port: 6969,
                path: "/announce".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_https_defaults_to_443() {
        let parsed = parse("https://tracker.example.com/announce").unwrap();
        assert_eq!(parsed.is_tls, true);
        assert_eq!(parsed.port, 443);
    }

    #[test]
    fn test_parse_rejects_udp_scheme() {
        assert_eq!(
            parse("udp://tracker.example.com:80").unwrap_err(),
            UrlParseError::UnsupportedScheme("udp".to_string())
        );
    }

    #[test]
    fn test_parse_no_path_defaults_to_slash() {
        let parsed = parse("http://tracker.example.com").unwrap();
        assert_eq!(parsed.path, "/");
    }
}
