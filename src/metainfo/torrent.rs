use sha1::{Digest, Sha1};

use crate::encoder_decoder::bencode::Bencode;

use super::info::{FromInfoError, Info};

/// A parsed `.torrent` file: where to announce, and what to verify the
/// download against.
#[derive(Debug, Clone, PartialEq)]
pub struct Torrent {
    /// Announce URLs in priority order: the first URL of each inner list of
    /// `announce-list` when present, falling back to the single `announce`
    /// value otherwise.
    pub announce_urls: Vec<String>,
    pub info: Info,
    pub info_hash: [u8; 20],
}

#[derive(Debug, PartialEq)]
pub enum FromTorrentError {
    MissingAnnounce,
    MissingInfo(FromInfoError),
    NotADict,
}

impl Torrent {
    pub fn from(bencode: Bencode) -> Result<Torrent, FromTorrentError> {
        let d = match bencode {
            Bencode::BDict(d) => d,
            _ => return Err(FromTorrentError::NotADict),
        };

        let mut announce_urls = Vec::new();
        if let Some(Bencode::BList(outer)) = d.get(b"announce-list".as_slice()) {
            for inner in outer {
                if let Bencode::BList(inner) = inner {
                    if let Some(Bencode::BString(url)) = inner.first() {
                        if let Ok(url) = String::from_utf8(url.clone()) {
                            announce_urls.push(url);
                        }
                    }
                }
            }
        }
        if announce_urls.is_empty() {
            if let Some(Bencode::BString(url)) = d.get(b"announce".as_slice()) {
                if let Ok(url) = String::from_utf8(url.clone()) {
                    announce_urls.push(url);
                }
            }
        }
        if announce_urls.is_empty() {
            return Err(FromTorrentError::MissingAnnounce);
        }

        let info_bencode = d
            .get(b"info".as_slice())
            .ok_or(FromTorrentError::MissingInfo(FromInfoError::NotADict))?;
        let info = Info::from(info_bencode).map_err(FromTorrentError::MissingInfo)?;
        let info_hash = Self::compute_info_hash(&info);

        Ok(Torrent {
            announce_urls,
            info,
            info_hash,
        })
    }

    /// SHA-1 of the re-bencoded `info` dictionary. Identifies the swarm.
    fn compute_info_hash(info: &Info) -> [u8; 20] {
        let encoded = Bencode::encode(info);
        let digest = Sha1::digest(encoded);
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest);
        out
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn total_length(&self) -> i64 {
        self.info.length
    }

    pub fn piece_length(&self) -> u32 {
        self.info.piece_length as u32
    }

    pub fn total_pieces(&self) -> u32 {
        self.info.num_pieces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn build_info_bencode(length: i64, name: &str, piece_length: i64, pieces: Vec<u8>) -> Bencode {
        let mut m = BTreeMap::new();
        m.insert(b"length".to_vec(), Bencode::BNumber(length));
        m.insert(b"name".to_vec(), Bencode::BString(name.as_bytes().to_vec()));
        m.insert(b"piece length".to_vec(), Bencode::BNumber(piece_length));
        m.insert(b"pieces".to_vec(), Bencode::BString(pieces));
        Bencode::BDict(m)
    }

    fn build_torrent_bencode(announce: &str, info: Bencode) -> Bencode {
        let mut m = BTreeMap::new();
        m.insert(
            b"announce".to_vec(),
            Bencode::BString(announce.as_bytes().to_vec()),
        );
        m.insert(b"info".to_vec(), info);
        Bencode::BDict(m)
    }

    #[test]
    fn test_from_torrent_full() {
        let info_bencode = build_info_bencode(10, "example", 20, vec![0u8; 20]);
        let torrent_bencode =
            build_torrent_bencode("http://example.com/announce", info_bencode.clone());

        let torrent = Torrent::from(torrent_bencode).unwrap();

        assert_eq!(torrent.announce_urls, vec!["http://example.com/announce"]);
        assert_eq!(torrent.info.length, 10);
        assert_eq!(torrent.info.name, "example");
        assert_eq!(torrent.info.piece_length, 20);
    }

    #[test]
    fn test_from_torrent_missing_announce() {
        let info_bencode = build_info_bencode(10, "example", 20, vec![0u8; 20]);
        let mut m = BTreeMap::new();
        m.insert(b"info".to_vec(), info_bencode);
        let torrent_bencode = Bencode::BDict(m);

        assert_eq!(
            Torrent::from(torrent_bencode).unwrap_err(),
            FromTorrentError::MissingAnnounce
        );
    }

    #[test]
    fn test_from_torrent_not_a_dict() {
        let torrent_bencode = Bencode::BString(b"test".to_vec());

        assert_eq!(
            Torrent::from(torrent_bencode).unwrap_err(),
            FromTorrentError::NotADict
        );
    }

    #[test]
    fn test_announce_list_takes_first_url_of_each_inner_list() {
        let info_bencode = build_info_bencode(10, "example", 20, vec![0u8; 20]);
        let mut m = BTreeMap::new();
        m.insert(
            b"announce".to_vec(),
            Bencode::BString(b"http://fallback/announce".to_vec()),
        );
        m.insert(
            b"announce-list".to_vec(),
            Bencode::BList(vec![
                Bencode::BList(vec![Bencode::BString(b"http://primary/announce".to_vec())]),
                Bencode::BList(vec![
                    Bencode::BString(b"http://backup/announce".to_vec()),
                    Bencode::BString(b"http://backup2/announce".to_vec()),
                ]),
            ]),
        );
        m.insert(b"info".to_vec(), info_bencode);
        let torrent_bencode = Bencode::BDict(m);

        let torrent = Torrent::from(torrent_bencode).unwrap();

        assert_eq!(
            torrent.announce_urls,
            vec!["http://primary/announce", "http://backup/announce"]
        );
    }

    #[test]
    fn test_info_hash_is_deterministic() {
        let info_bencode = build_info_bencode(10, "example", 20, vec![0u8; 20]);
        let torrent_bencode =
            build_torrent_bencode("http://example.com/announce", info_bencode.clone());
        let torrent_bencode_2 =
            build_torrent_bencode("http://example.com/announce", info_bencode);

        let t1 = Torrent::from(torrent_bencode).unwrap();
        let t2 = Torrent::from(torrent_bencode_2).unwrap();

        assert_eq!(t1.info_hash, t2.info_hash);
        assert_eq!(t1.info_hash.len(), 20);
    }
}
