use std::fmt;
use std::io;

/// Coordinator-level failure: something the `download` operation itself
/// returns as `Err`, distinct from the per-session error kinds which are
/// logged and absorbed.
#[derive(Debug)]
pub enum CoordinatorError {
    /// Every worker thread exited before all pieces were collected; the
    /// work queue may still hold un-downloaded items.
    Incomplete { pieces_remaining: usize },
    /// The assembled buffer could not be written to disk.
    Disk(io::Error),
    /// No peers were available to spawn workers for.
    NoPeers,
}

impl fmt::Display for CoordinatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinatorError::Incomplete { pieces_remaining } => write!(
                f,
                "download incomplete: every peer session ended with {} piece(s) still outstanding",
                pieces_remaining
            ),
            CoordinatorError::Disk(e) => write!(f, "failed to write output file: {}", e),
            CoordinatorError::NoPeers => write!(f, "no peers to download from"),
        }
    }
}

impl std::error::Error for CoordinatorError {}
