use std::fmt;

use crate::peer::bt_peer::BtPeer;

use super::http::http_handler::{HttpHandler, HttpHandlerError};
use super::http::query_params::QueryParams;
use super::http::url_parser::{self, UrlParseError};
use super::tracker_response::{FromTrackerResponseError, TrackerResponse};

/// One failed announce attempt, kept around so a caller can see why every
/// tracker in the list was unreachable.
#[derive(Debug)]
pub struct AnnounceAttempt {
    pub url: String,
    pub kind: AnnounceErrorKind,
}

#[derive(Debug)]
pub enum AnnounceErrorKind {
    UrlParse(UrlParseError),
    Http(HttpHandlerError),
    Response(FromTrackerResponseError),
}

#[derive(Debug)]
pub struct TrackerHandlerError {
    pub attempts: Vec<AnnounceAttempt>,
}

impl fmt::Display for TrackerHandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "every announce URL failed ({} attempted)",
            self.attempts.len()
        )
    }
}

/// Speaks to a tracker: one HTTP GET producing a peer list. Tries each
/// announce URL in order until one succeeds.
pub struct TrackerHandler;

impl TrackerHandler {
    pub fn get_peers(
        announce_urls: &[String],
        info_hash: [u8; 20],
        peer_id: [u8; 20],
        port: u16,
        left: u64,
    ) -> Result<Vec<BtPeer>, TrackerHandlerError> {
        let mut attempts = Vec::new();

        for announce in announce_urls {
            match Self::try_announce(announce, info_hash, peer_id, port, left) {
                Ok(peers) => return Ok(peers),
                Err(kind) => attempts.push(AnnounceAttempt {
                    url: announce.clone(),
                    kind,
                }),
            }
        }

        Err(TrackerHandlerError { attempts })
    }

    fn try_announce(
        announce: &str,
        info_hash: [u8; 20],
        peer_id: [u8; 20],
        port: u16,
        left: u64,
    ) -> Result<Vec<BtPeer>, AnnounceErrorKind> {
        let url = url_parser::parse(announce).map_err(AnnounceErrorKind::UrlParse)?;
        let query = QueryParams::new(info_hash, peer_id, port, left);
        let response = HttpHandler::get(&url, &query).map_err(AnnounceErrorKind::Http)?;
        TrackerResponse::from(&response)
            .map(|r| r.peers)
            .map_err(AnnounceErrorKind::Response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_peers_reports_every_failed_attempt() {
        let urls = vec![
            "udp://tracker.example.com/announce".to_string(),
            "ftp://tracker.example.com/announce".to_string(),
        ];

        let err = TrackerHandler::get_peers(&urls, [0u8; 20], [1u8; 20], 6881, 10).unwrap_err();

        assert_eq!(err.attempts.len(), 2);
        assert!(matches!(
            err.attempts[0].kind,
            AnnounceErrorKind::UrlParse(_)
        ));
    }
}
