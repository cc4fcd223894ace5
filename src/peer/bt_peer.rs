use crate::encoder_decoder::bencode::Bencode;

/// `BtPeer` contains the address (and, once known, peer-id) of a peer
/// returned by the tracker.
///
/// To create a new `BtPeer` use the method builder `from()`.
#[derive(Debug, Clone, PartialEq)]
pub struct BtPeer {
    pub peer_id: Option<Vec<u8>>,
    pub ip: String,
    pub port: u16,
}

/// Possible `BtPeer` errors.
#[derive(Debug, PartialEq)]
pub enum FromBtPeerError {
    InvalidPeerId,
    InvalidIp,
    InvalidPort,
    NotADict,
}

impl BtPeer {
    pub fn new(ip: String, port: u16) -> Self {
        Self {
            peer_id: None,
            ip,
            port,
        }
    }

    /// Builds a new `BtPeer` from a bencoded peer dictionary in the
    /// tracker response's peer list.
    ///
    /// It returns a `FromBtPeerError` if:
    /// - The peer IP is invalid.
    /// - The peer Port is invalid.
    /// - The bencoded peer is not a dict.
    pub fn from(bencode: &Bencode) -> Result<BtPeer, FromBtPeerError> {
        let d = match bencode {
            Bencode::BDict(d) => d,
            _ => return Err(FromBtPeerError::NotADict),
        };

        let mut peer_id: Option<Vec<u8>> = None;
        let mut ip: String = String::new();
        let mut port: u16 = 0;

        for (k, v) in d.iter() {
            if k == b"peer id" {
                peer_id = Some(Self::create_peer_id(v)?);
            } else if k == b"ip" {
                ip = Self::create_ip(v)?;
            } else if k == b"port" {
                port = Self::create_port(v)?;
            }
        }

        if ip.is_empty() {
            return Err(FromBtPeerError::InvalidIp);
        }

        Ok(BtPeer { peer_id, ip, port })
    }

    fn create_peer_id(bencode: &Bencode) -> Result<Vec<u8>, FromBtPeerError> {
        match bencode {
            Bencode::BString(s) => Ok(s.clone()),
            _ => Err(FromBtPeerError::InvalidPeerId),
        }
    }

    fn create_ip(bencode: &Bencode) -> Result<String, FromBtPeerError> {
        let ip = match bencode {
            Bencode::BString(s) => s,
            _ => return Err(FromBtPeerError::InvalidIp),
        };
        String::from_utf8(ip.to_vec()).map_err(|_| FromBtPeerError::InvalidIp)
    }

    fn create_port(bencode: &Bencode) -> Result<u16, FromBtPeerError> {
        match bencode {
            Bencode::BNumber(n) => u16::try_from(*n).map_err(|_| FromBtPeerError::InvalidPort),
            _ => Err(FromBtPeerError::InvalidPort),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_from_bt_peer() {
        let mut dict = BTreeMap::new();
        dict.insert(b"peer id".to_vec(), Bencode::BString(b"peer id".to_vec()));
        dict.insert(b"ip".to_vec(), Bencode::BString(b"127.0.0.1".to_vec()));
        dict.insert(b"port".to_vec(), Bencode::BNumber(6868));

        let bencode = Bencode::BDict(dict);

        let bt_peer = BtPeer::from(&bencode).unwrap();

        assert_eq!(bt_peer.peer_id, Some(b"peer id".to_vec()));
        assert_eq!(bt_peer.ip, "127.0.0.1");
        assert_eq!(bt_peer.port, 6868);
    }

    #[test]
    fn test_from_bt_peer_missing_ip() {
        let mut dict = BTreeMap::new();
        dict.insert(b"port".to_vec(), Bencode::BNumber(6868));
        let bencode = Bencode::BDict(dict);

        assert_eq!(
            BtPeer::from(&bencode).unwrap_err(),
            FromBtPeerError::InvalidIp
        );
    }

    #[test]
    fn test_new_peer() {
        let bt_peer = BtPeer::new("127.0.0.1".to_string(), 6868);

        assert_eq!(bt_peer.peer_id, None);
        assert_eq!(bt_peer.ip, "127.0.0.1");
        assert_eq!(bt_peer.port, 6868);
    }
}
