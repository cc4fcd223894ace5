use std::fmt;
use std::io;

/// Error kinds surfaced at the peer session boundary. Every variant here is
/// fatal to the connection that produced it; a hash mismatch on a
/// successfully downloaded piece is not one of them -- `download_piece`
/// already returned `Ok` by the time the bytes are verified, so that check
/// (and its re-enqueue-and-continue recovery) lives in the coordinator
/// against the Piece Model's `WorkItem::verify`, not here.
#[derive(Debug)]
pub enum PeerSessionError {
    /// TCP connect failed or timed out.
    Connect(io::Error),
    /// The peer's handshake disagreed with ours (wrong info-hash) or was
    /// malformed.
    HandshakeMismatch,
    /// An unexpected message, a frame that was too short, or an index /
    /// offset mismatch.
    Protocol(String),
    /// A mid-session read or write failed.
    Io(io::Error),
}

impl fmt::Display for PeerSessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerSessionError::Connect(e) => write!(f, "connect failed: {}", e),
            PeerSessionError::HandshakeMismatch => write!(f, "handshake mismatch"),
            PeerSessionError::Protocol(msg) => write!(f, "protocol error: {}", msg),
            PeerSessionError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for PeerSessionError {}

impl From<io::Error> for PeerSessionError {
    fn from(e: io::Error) -> Self {
        PeerSessionError::Io(e)
    }
}
