pub const TCP_PORT: &str = "TCP_PORT";
pub const LOG_DIRECTORY: &str = "LOG_DIRECTORY";
pub const DOWNLOAD_DIRECTORY: &str = "DOWNLOAD_DIRECTORY";
pub const READ_WRITE_SECONDS_TIMEOUT: &str = "READ_WRITE_SECONDS_TIMEOUT";
pub const CONNECT_SECONDS_TIMEOUT: &str = "CONNECT_SECONDS_TIMEOUT";
pub const PIPELINING_SIZE: &str = "PIPELINING_SIZE";
pub const MAX_PEERS_PER_TORRENT: &str = "MAX_PEERS_PER_TORRENT";

// TCP_PORT, LOG_DIRECTORY and DOWNLOAD_DIRECTORY are required; the rest fall
// back to their defaults when absent from the config file.
pub const MIN_SETTINGS: u32 = 3;

pub const DEFAULT_READ_WRITE_SECONDS_TIMEOUT: u64 = 30;
pub const DEFAULT_CONNECT_SECONDS_TIMEOUT: u64 = 3;
pub const DEFAULT_PIPELINING_SIZE: u32 = 5;
pub const DEFAULT_MAX_PEERS_PER_TORRENT: u32 = 30;
