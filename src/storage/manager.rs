use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Writes `bytes` at `offset` within the file for `torrent_name` inside
/// `download_directory`, creating the directory and a length-matching file
/// on first use.
pub fn save_piece(
    download_directory: &str,
    torrent_name: &str,
    total_length: u64,
    offset: u64,
    bytes: &[u8],
) -> io::Result<()> {
    let path = output_path(download_directory, torrent_name);
    fs::create_dir_all(download_directory)?;

    let mut file = open_or_create(&path, total_length)?;
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(bytes)
}

/// Writes the whole assembled buffer in one pass.
pub fn save_file(download_directory: &str, torrent_name: &str, buffer: &[u8]) -> io::Result<()> {
    fs::create_dir_all(download_directory)?;
    let path = output_path(download_directory, torrent_name);
    let mut file = File::create(path)?;
    file.write_all(buffer)
}

/// Reads `length` bytes starting at `offset` out of the already-downloaded
/// file. Used by the coordinator's final assembly check and by the
/// vestigial seed path to serve blocks to a remote peer.
pub fn read_range(
    download_directory: &str,
    torrent_name: &str,
    offset: u64,
    length: u64,
) -> io::Result<Vec<u8>> {
    let path = output_path(download_directory, torrent_name);
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; length as usize];
    file.read_exact(&mut buf)?;
    Ok(buf)
}

fn output_path(download_directory: &str, torrent_name: &str) -> PathBuf {
    Path::new(download_directory).join(torrent_name)
}

fn open_or_create(path: &Path, total_length: u64) -> io::Result<File> {
    if !path.exists() {
        let file = File::create(path)?;
        file.set_len(total_length)?;
    }
    OpenOptions::new().write(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> String {
        format!("./{}_{}", "storage_test", name)
    }

    #[test]
    fn test_save_and_read_range_roundtrip() {
        let dir = temp_dir("roundtrip");
        save_piece(&dir, "file.bin", 10, 5, b"hello").unwrap();

        let read = read_range(&dir, "file.bin", 5, 5).unwrap();
        assert_eq!(read, b"hello");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_piece_at_offset_zero_then_later_offset() {
        let dir = temp_dir("offsets");
        save_piece(&dir, "file.bin", 10, 0, b"abcde").unwrap();
        save_piece(&dir, "file.bin", 10, 5, b"fghij").unwrap();

        let read = read_range(&dir, "file.bin", 0, 10).unwrap();
        assert_eq!(read, b"abcdefghij");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_file_writes_whole_buffer() {
        let dir = temp_dir("wholefile");
        save_file(&dir, "out.bin", b"full content").unwrap();

        let read = read_range(&dir, "out.bin", 0, 12).unwrap();
        assert_eq!(read, b"full content");

        fs::remove_dir_all(&dir).unwrap();
    }
}
