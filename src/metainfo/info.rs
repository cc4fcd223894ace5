use std::collections::BTreeMap;

use crate::encoder_decoder::bencode::{Bencode, ToBencode};

/// The `info` dictionary of a single-file torrent: everything needed to
/// verify and assemble the downloaded bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub name: String,
    pub length: i64,
    pub piece_length: i64,
    /// Concatenated 20-byte SHA-1 hashes, one per piece, in order.
    pub pieces: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub enum FromInfoError {
    MissingName,
    MissingLength,
    MissingPieceLength,
    MissingPieces,
    InvalidPiecesLength,
    NotADict,
}

impl Info {
    pub fn from(bencode: &Bencode) -> Result<Info, FromInfoError> {
        let d = match bencode {
            Bencode::BDict(d) => d,
            _ => return Err(FromInfoError::NotADict),
        };

        let name = match d.get(b"name".as_slice()) {
            Some(Bencode::BString(s)) => {
                String::from_utf8(s.clone()).map_err(|_| FromInfoError::MissingName)?
            }
            _ => return Err(FromInfoError::MissingName),
        };

        let length = match d.get(b"length".as_slice()) {
            Some(Bencode::BNumber(n)) => *n,
            _ => return Err(FromInfoError::MissingLength),
        };

        let piece_length = match d.get(b"piece length".as_slice()) {
            Some(Bencode::BNumber(n)) => *n,
            _ => return Err(FromInfoError::MissingPieceLength),
        };

        let pieces = match d.get(b"pieces".as_slice()) {
            Some(Bencode::BString(s)) => s.clone(),
            _ => return Err(FromInfoError::MissingPieces),
        };

        if pieces.len() % 20 != 0 {
            return Err(FromInfoError::InvalidPiecesLength);
        }

        Ok(Info {
            name,
            length,
            piece_length,
            pieces,
        })
    }

    /// Number of pieces described by this torrent.
    pub fn num_pieces(&self) -> u32 {
        (self.pieces.len() / 20) as u32
    }

    /// The expected SHA-1 hash of the piece at `index`.
    pub fn piece_hash(&self, index: u32) -> &[u8] {
        let start = index as usize * 20;
        &self.pieces[start..start + 20]
    }

    /// Length in bytes of the piece at `index`, accounting for a possibly
    /// shorter final piece.
    pub fn piece_length_at(&self, index: u32) -> u32 {
        let piece_length = self.piece_length as u32;
        if index + 1 < self.num_pieces() {
            return piece_length;
        }
        let remainder = (self.length as u64) % (piece_length as u64);
        if remainder == 0 {
            piece_length
        } else {
            remainder as u32
        }
    }
}

impl ToBencode for Info {
    fn to_bencode(&self) -> Bencode {
        let mut m = BTreeMap::new();
        m.insert(b"name".to_vec(), self.name.to_bencode());
        m.insert(b"length".to_vec(), self.length.to_bencode());
        m.insert(b"piece length".to_vec(), self.piece_length.to_bencode());
        m.insert(b"pieces".to_vec(), self.pieces.to_bencode());
        Bencode::BDict(m)
    }
}
