use crate::encoder_decoder::url_encoder;

/// The query parameters sent on the tracker GET request: raw 20-byte
/// `info_hash` and `peer_id`, percent-escaped, plus the plain integers the
/// tracker wants to see.
#[derive(Debug, Clone)]
pub struct QueryParams {
    info_hash: [u8; 20],
    peer_id: [u8; 20],
    port: u16,
    left: u64,
}

impl QueryParams {
    pub fn new(info_hash: [u8; 20], peer_id: [u8; 20], port: u16, left: u64) -> Self {
        Self {
            info_hash,
            peer_id,
            port,
            left,
        }
    }

    /// Builds the query string (without a leading `?`).
    pub fn build(&self) -> String {
        format!(
            "info_hash={}&peer_id={}&port={}&uploaded=0&downloaded=0&left={}",
            url_encoder::encode_bytes(&self.info_hash),
            url_encoder::encode_bytes(&self.peer_id),
            self.port,
            self.left
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_build() {
        let info_hash = [0x2cu8, 0x6b, 0x68, 0x58];
        let mut info_hash_full = [0u8; 20];
        info_hash_full[..4].copy_from_slice(&info_hash);
        let peer_id = [1u8; 20];

        let query_params = QueryParams::new(info_hash_full, peer_id, 6969, 100);

        assert_eq!(
            query_params.build(),
            format!(
                "info_hash={}&peer_id={}&port=6969&uploaded=0&downloaded=0&left=100",
                url_encoder::encode_bytes(&info_hash_full),
                url_encoder::encode_bytes(&peer_id)
            )
        );
    }

    #[test]
    fn test_query_params_includes_zero_uploaded_and_downloaded() {
        let query_params = QueryParams::new([0u8; 20], [0u8; 20], 6881, 0);
        let built = query_params.build();
        assert!(built.contains("uploaded=0"));
        assert!(built.contains("downloaded=0"));
        assert!(built.contains("left=0"));
        assert!(built.contains("port=6881"));
    }
}
