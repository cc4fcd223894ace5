use crate::encoder_decoder::bencode::{Bencode, BencodeError};
use crate::peer::bt_peer::{BtPeer, FromBtPeerError};

/// The tracker's answer to an announce: how long to wait before the next
/// one, and -- the only part the core consumes -- a peer list, accepted in
/// either the dictionary form (`{ip, port}` per peer) or the compact
/// 6-byte-per-peer binary form.
#[derive(Debug, PartialEq)]
pub struct TrackerResponse {
    pub interval: i64,
    pub peers: Vec<BtPeer>,
}

#[derive(Debug, PartialEq)]
pub enum FromTrackerResponseError {
    Decode(BencodeError),
    NotADict,
    PeersNotAList,
    InvalidPeer(FromBtPeerError),
}

impl TrackerResponse {
    /// Decodes a bencoded tracker response body.
    pub fn from(response: &[u8]) -> Result<TrackerResponse, FromTrackerResponseError> {
        let decoded = Bencode::decode(response).map_err(FromTrackerResponseError::Decode)?;

        let d = match decoded {
            Bencode::BDict(d) => d,
            _ => return Err(FromTrackerResponseError::NotADict),
        };

        let interval = match d.get(b"interval".as_slice()) {
            Some(Bencode::BNumber(n)) => *n,
            _ => 0,
        };

        let peers = match d.get(b"peers".as_slice()) {
            Some(Bencode::BList(list)) => list
                .iter()
                .map(BtPeer::from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(FromTrackerResponseError::InvalidPeer)?,
            Some(Bencode::BString(compact)) => Self::peers_from_compact(compact),
            Some(_) => return Err(FromTrackerResponseError::PeersNotAList),
            None => Vec::new(),
        };

        Ok(TrackerResponse { interval, peers })
    }

    /// Decodes the compact binary peer list: 6 bytes per peer, 4-byte IPv4
    /// followed by a 2-byte big-endian port. A trailing partial chunk (a
    /// malformed tracker) is silently dropped rather than failing the whole
    /// response.
    fn peers_from_compact(bytes: &[u8]) -> Vec<BtPeer> {
        bytes
            .chunks(6)
            .filter(|chunk| chunk.len() == 6)
            .map(|chunk| {
                let ip = format!("{}.{}.{}.{}", chunk[0], chunk[1], chunk[2], chunk[3]);
                let port = u16::from_be_bytes([chunk[4], chunk[5]]);
                BtPeer::new(ip, port)
            })
            .collect()
    }
}
