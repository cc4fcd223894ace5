use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;

use super::constants;

/// Cfg struct containing the config file information, previously created with Cfg::new.
///
/// tcp_port: u16,
/// log_directory: String,
/// download_directory: String,
/// read_write_seconds_timeout: u64,
/// connect_seconds_timeout: u64,
/// pipelining_size: u32,
/// max_peers_per_torrent: u32,
#[derive(Debug, Clone)]
pub struct Cfg {
    pub tcp_port: u16,
    pub log_directory: String,
    pub download_directory: String,
    pub read_write_seconds_timeout: u64,
    pub connect_seconds_timeout: u64,
    pub pipelining_size: u32,
    pub max_peers_per_torrent: u32,
}

impl Cfg {
    /// Builds a Cfg struct containing the config file information by the given path.
    /// The format of the config file must be: {config_name}={config_value} (without brackets).
    /// In case of success it returns a Cfg struct.
    ///
    /// It returns an io::Error if:
    /// - The path to the config file does not exist or could not be open/readed.
    /// - The config file has wrong format.
    /// - A wrong config_name was in the config file.
    /// - tcp_port setting is not a number in the config file.
    /// - Minimum number of correct settings were not reached.
    pub fn new(path: &str) -> io::Result<Self> {
        let mut cfg = Self {
            tcp_port: 0,
            log_directory: String::from(""),
            download_directory: String::from(""),
            read_write_seconds_timeout: constants::DEFAULT_READ_WRITE_SECONDS_TIMEOUT,
            connect_seconds_timeout: constants::DEFAULT_CONNECT_SECONDS_TIMEOUT,
            pipelining_size: constants::DEFAULT_PIPELINING_SIZE,
            max_peers_per_torrent: constants::DEFAULT_MAX_PEERS_PER_TORRENT,
        };

        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut settings_loaded = 0;

        for line in reader.lines() {
            let current_line = line?;
            let setting: Vec<&str> = current_line.split('=').collect();

            if setting.len() != 2 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid config input: {}", current_line),
                ));
            }
            cfg = Self::load_setting(cfg, setting[0], setting[1])?;
            settings_loaded += 1;
        }
        if settings_loaded < constants::MIN_SETTINGS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Minimum number of correct settings were not reached: {}",
                    settings_loaded
                ),
            ));
        }
        Ok(cfg)
    }

    fn load_setting(mut self, name: &str, value: &str) -> io::Result<Self> {
        match name {
            constants::TCP_PORT => self.tcp_port = Self::parse_setting(name, value)?,
            constants::LOG_DIRECTORY => self.log_directory = String::from(value),
            constants::DOWNLOAD_DIRECTORY => self.download_directory = String::from(value),
            constants::READ_WRITE_SECONDS_TIMEOUT => {
                self.read_write_seconds_timeout = Self::parse_setting(name, value)?
            }
            constants::CONNECT_SECONDS_TIMEOUT => {
                self.connect_seconds_timeout = Self::parse_setting(name, value)?
            }
            constants::PIPELINING_SIZE => {
                self.pipelining_size = Self::parse_setting(name, value)?
            }
            constants::MAX_PEERS_PER_TORRENT => {
                self.max_peers_per_torrent = Self::parse_setting(name, value)?
            }
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid config setting name: {}", name),
                ))
            }
        }
        Ok(self)
    }

    fn parse_setting<T: std::str::FromStr>(name: &str, value: &str) -> io::Result<T> {
        value.parse::<T>().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid config, {} is not a number: {}", name, value),
            )
        })
    }
}
