pub const PSTR: &str = "BitTorrent protocol";
pub const HANDSHAKE_LEN: usize = 49 + 19; // pstrlen(1) + pstr(19) + reserved(8) + info_hash(20) + peer_id(20)

/// The 68-byte opening exchange of the peer wire protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct Handshake {
    pub info_hash: [u8; 20],
    pub peer_id: [u8; 20],
}

#[derive(Debug, PartialEq)]
pub enum HandshakeError {
    InvalidLength,
    InvalidPstrlen(u8),
}

impl Handshake {
    pub fn new(info_hash: [u8; 20], peer_id: [u8; 20]) -> Self {
        Self { info_hash, peer_id }
    }

    pub fn to_bytes(&self) -> [u8; HANDSHAKE_LEN] {
        let mut bytes = [0u8; HANDSHAKE_LEN];
        bytes[0] = PSTR.len() as u8;
        bytes[1..20].copy_from_slice(PSTR.as_bytes());
        // bytes[20..28] stays zeroed (reserved).
        bytes[28..48].copy_from_slice(&self.info_hash);
        bytes[48..68].copy_from_slice(&self.peer_id);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HandshakeError> {
        if bytes.is_empty() {
            return Err(HandshakeError::InvalidLength);
        }
        let pstrlen = bytes[0] as usize;
        if pstrlen == 0 {
            return Err(HandshakeError::InvalidPstrlen(0));
        }
        let expected_len = 1 + pstrlen + 8 + 20 + 20;
        if bytes.len() != expected_len {
            return Err(HandshakeError::InvalidLength);
        }

        let mut info_hash = [0u8; 20];
        info_hash.copy_from_slice(&bytes[1 + pstrlen + 8..1 + pstrlen + 28]);
        let mut peer_id = [0u8; 20];
        peer_id.copy_from_slice(&bytes[1 + pstrlen + 28..1 + pstrlen + 48]);

        Ok(Self { info_hash, peer_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_roundtrip() {
        let info_hash = [1u8; 20];
        let peer_id = [2u8; 20];
        let handshake = Handshake::new(info_hash, peer_id);

        let bytes = handshake.to_bytes();
        assert_eq!(bytes.len(), HANDSHAKE_LEN);
        assert_eq!(bytes[0], 19);

        let parsed = Handshake::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, handshake);
    }

    #[test]
    fn test_handshake_rejects_zero_pstrlen() {
        let mut bytes = Handshake::new([0; 20], [0; 20]).to_bytes();
        bytes[0] = 0;
        assert_eq!(
            Handshake::from_bytes(&bytes).unwrap_err(),
            HandshakeError::InvalidPstrlen(0)
        );
    }

    #[test]
    fn test_handshake_rejects_wrong_length() {
        let bytes = vec![19u8; 10];
        assert_eq!(
            Handshake::from_bytes(&bytes).unwrap_err(),
            HandshakeError::InvalidLength
        );
    }
}
