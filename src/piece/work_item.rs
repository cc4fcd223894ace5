use sha1::{Digest, Sha1};

/// One piece of a torrent: its index, expected hash, and length. Immutable
/// once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub index: u32,
    pub hash: [u8; 20],
    pub length: u32,
}

/// A piece plus the mutable progress of downloading it from one peer
/// session.
///
/// Invariant: `downloaded <= requested <= piece.length`, `backlog >= 0`.
/// `buffer[0..downloaded]` holds settled bytes; bytes past `downloaded` are
/// not yet written or only partially filled by in-flight blocks.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub piece: Piece,
    pub downloaded: u32,
    pub requested: u32,
    pub backlog: u32,
    pub buffer: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub enum ApplyPieceError {
    IndexMismatch { expected: u32, actual: u32 },
    BeginOutOfBounds { begin: u32, piece_length: u32 },
    BlockOverrunsPiece { begin: u32, data_len: u32, piece_length: u32 },
}

impl WorkItem {
    pub fn new(piece: Piece) -> Self {
        let buffer = vec![0u8; piece.length as usize];
        Self {
            piece,
            downloaded: 0,
            requested: 0,
            backlog: 0,
            buffer,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.downloaded >= self.piece.length
    }

    /// Copies a PIECE message's block into the buffer at `begin`, bounds
    /// checked against the piece length, and advances `downloaded`.
    ///
    /// Returns the number of bytes written.
    pub fn apply_piece(
        &mut self,
        index: u32,
        begin: u32,
        data: &[u8],
    ) -> Result<u32, ApplyPieceError> {
        if index != self.piece.index {
            return Err(ApplyPieceError::IndexMismatch {
                expected: self.piece.index,
                actual: index,
            });
        }
        if begin >= self.piece.length {
            return Err(ApplyPieceError::BeginOutOfBounds {
                begin,
                piece_length: self.piece.length,
            });
        }
        let data_len = data.len() as u32;
        let end = begin
            .checked_add(data_len)
            .ok_or(ApplyPieceError::BlockOverrunsPiece {
                begin,
                data_len,
                piece_length: self.piece.length,
            })?;
        if end > self.piece.length {
            return Err(ApplyPieceError::BlockOverrunsPiece {
                begin,
                data_len,
                piece_length: self.piece.length,
            });
        }

        self.buffer[begin as usize..end as usize].copy_from_slice(data);
        self.downloaded += data_len;
        Ok(data_len)
    }

    /// Verifies the buffer's SHA-1 against the piece's expected hash.
    pub fn verify(&self) -> bool {
        let digest = Sha1::digest(&self.buffer);
        digest.as_slice() == self.piece.hash
    }
}
