/// Takes a hex string and applies Percent-Encoding, returning an encoded version.
///
/// # Example
///
/// ```rust
/// use peer_exchange_core::encoder_decoder::url_encoder::encode;
///
/// let hex_string = "2c6b6858d61da9543d4231a71db4b1c9264b0685";
/// let encoded_hex_string = encode(hex_string);
///
/// assert_eq!(encoded_hex_string, "%2c%6b%68%58%d6%1d%a9%54%3d%42%31%a7%1d%b4%b1%c9%26%4b%06%85");
/// ```
pub fn encode(hex_string: &str) -> String {
    if hex_string.is_empty() {
        return hex_string.to_string();
    }
    let mut encoded_hex_string = hex_string
        .chars()
        .collect::<Vec<char>>()
        .chunks(2)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join("%");
    encoded_hex_string.insert(0, '%');
    encoded_hex_string
}

/// Percent-encodes a raw byte string directly, without an intermediate hex
/// representation. Used for the tracker query string, where `info_hash` and
/// `peer_id` are raw 20-byte values rather than hex text.
///
/// # Example
///
/// ```rust
/// use peer_exchange_core::encoder_decoder::url_encoder::encode_bytes;
///
/// assert_eq!(encode_bytes(&[0xd6, 0x1d]), "%d6%1d");
/// ```
pub fn encode_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("%{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty_string_returns_empty_string() {
        assert_eq!("", encode(""));
    }

    #[test]
    fn test_encode_info_hash() {
        let info_hash = "2c6b6858d61da9543d4231a71db4b1c9264b0685";
        let expected_info_hash = "%2c%6b%68%58%d6%1d%a9%54%3d%42%31%a7%1d%b4%b1%c9%26%4b%06%85";

        assert_eq!(expected_info_hash, encode(info_hash));
    }

    #[test]
    fn test_encode_bytes_empty() {
        assert_eq!("", encode_bytes(&[]));
    }

    #[test]
    fn test_encode_bytes_matches_hex_then_encode() {
        let bytes: Vec<u8> = vec![0x2c, 0x6b, 0x68, 0x58];
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(encode_bytes(&bytes), encode(&hex));
    }
}
