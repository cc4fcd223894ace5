use std::fs;
use std::io;

use crate::encoder_decoder::bencode::BencodeError;
use crate::encoder_decoder::bencode::Bencode;

use super::torrent::{FromTorrentError, Torrent};

#[derive(Debug)]
pub enum TorrentParserError {
    ReadFileError(io::Error),
    DecodeError(BencodeError),
    FromTorrentError(FromTorrentError),
}

/// Reads a `.torrent` file from disk and parses it into a `Torrent`.
pub struct TorrentParser;

impl TorrentParser {
    pub fn parse(path: &str) -> Result<Torrent, TorrentParserError> {
        let bytes = fs::read(path).map_err(TorrentParserError::ReadFileError)?;
        let bencode = Bencode::decode(&bytes).map_err(TorrentParserError::DecodeError)?;
        Torrent::from(bencode).map_err(TorrentParserError::FromTorrentError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;

    #[test]
    fn test_parse_missing_file() {
        let result = TorrentParser::parse("./this_file_does_not_exist.torrent");
        assert!(matches!(result, Err(TorrentParserError::ReadFileError(_))));
    }

    #[test]
    fn test_parse_good_file() {
        let mut info = BTreeMap::new();
        info.insert(b"length".to_vec(), Bencode::BNumber(10));
        info.insert(b"name".to_vec(), Bencode::BString(b"example".to_vec()));
        info.insert(b"piece length".to_vec(), Bencode::BNumber(20));
        info.insert(b"pieces".to_vec(), Bencode::BString(vec![0u8; 20]));

        let mut torrent = BTreeMap::new();
        torrent.insert(
            b"announce".to_vec(),
            Bencode::BString(b"http://example.com/announce".to_vec()),
        );
        torrent.insert(b"info".to_vec(), Bencode::BDict(info));

        let bytes = Bencode::encode(&torrent);
        let path = "./test_parse_good_file.torrent";
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(&bytes).unwrap();

        let parsed = TorrentParser::parse(path).unwrap();
        assert_eq!(parsed.name(), "example");

        std::fs::remove_file(path).unwrap();
    }
}
