use crate::metainfo::torrent::Torrent;

/// The core's own view of a torrent: exactly the fields the peer-exchange
/// core needs to drive a download, independent of how they were parsed.
/// Distinct from `metainfo::Torrent` -- this also carries the local
/// client's peer-id, which the metainfo never does.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentDescriptor {
    pub info_hash: [u8; 20],
    pub peer_id: [u8; 20],
    pub total_length: u64,
    pub piece_length: u32,
    pub piece_hashes: Vec<[u8; 20]>,
}

#[derive(Debug, PartialEq)]
pub enum DescriptorError {
    NoPieces,
    /// `total_length` disagreed with
    /// `(num_pieces - 1) * piece_length + last_piece_length`.
    LengthMismatch,
}

impl TorrentDescriptor {
    pub fn new(
        info_hash: [u8; 20],
        peer_id: [u8; 20],
        total_length: u64,
        piece_length: u32,
        piece_hashes: Vec<[u8; 20]>,
    ) -> Result<Self, DescriptorError> {
        if piece_hashes.is_empty() {
            return Err(DescriptorError::NoPieces);
        }

        let full_pieces_length = (piece_hashes.len() as u64 - 1) * piece_length as u64;
        if total_length <= full_pieces_length {
            return Err(DescriptorError::LengthMismatch);
        }
        let last_piece_length = total_length - full_pieces_length;
        if last_piece_length > piece_length as u64 {
            return Err(DescriptorError::LengthMismatch);
        }

        Ok(Self {
            info_hash,
            peer_id,
            total_length,
            piece_length,
            piece_hashes,
        })
    }

    /// Builds a descriptor from a parsed `.torrent` file plus this client's
    /// peer-id.
    pub fn from_torrent(torrent: &Torrent, peer_id: [u8; 20]) -> Result<Self, DescriptorError> {
        let num_pieces = torrent.total_pieces();
        let piece_hashes = (0..num_pieces)
            .map(|i| {
                let mut hash = [0u8; 20];
                hash.copy_from_slice(torrent.info.piece_hash(i));
                hash
            })
            .collect();

        Self::new(
            torrent.info_hash,
            peer_id,
            torrent.total_length() as u64,
            torrent.piece_length(),
            piece_hashes,
        )
    }

    pub fn num_pieces(&self) -> u32 {
        self.piece_hashes.len() as u32
    }

    pub fn piece_hash(&self, index: u32) -> [u8; 20] {
        self.piece_hashes[index as usize]
    }

    /// Length of the piece at `index`, accounting for a possibly shorter
    /// final piece.
    pub fn piece_length_at(&self, index: u32) -> u32 {
        if index + 1 < self.num_pieces() {
            return self.piece_length;
        }
        (self.total_length - self.piece_offset(index)) as u32
    }

    /// Byte offset of the piece at `index` within the assembled file.
    pub fn piece_offset(&self, index: u32) -> u64 {
        index as u64 * self.piece_length as u64
    }
}
