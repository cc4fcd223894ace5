use std::env;
use std::process;
use std::time::Duration;

use peer_exchange_core::config::cfg::Cfg;
use peer_exchange_core::coordinator::descriptor::TorrentDescriptor;
use peer_exchange_core::coordinator::download_coordinator::DownloadCoordinator;
use peer_exchange_core::logger::logger_receiver::Logger;
use peer_exchange_core::metainfo::parser::TorrentParser;
use peer_exchange_core::tracker::tracker_handler::TrackerHandler;

/// Arbitrary but stable for the lifetime of one process, as the peer-exchange
/// core requires. Not part of the tested surface.
const OUR_PEER_ID: [u8; 20] = *b"-PC0001-000000000001";

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    let (torrent_path, config_path) = parse_args(&args)?;

    let torrent = TorrentParser::parse(&torrent_path)
        .map_err(|e| format!("could not parse torrent file: {:?}", e))?;
    let config = Cfg::new(&config_path).map_err(|e| format!("could not read config: {}", e))?;

    let logger = Logger::new(&config.log_directory)
        .map_err(|e| format!("could not start logger: {:?}", e))?;
    let logger_sender = logger.new_sender();

    let descriptor = TorrentDescriptor::from_torrent(&torrent, OUR_PEER_ID)
        .map_err(|e| format!("invalid torrent descriptor: {:?}", e))?;

    logger_sender.info(&format!("announcing for {}", torrent.name()));
    let peers = TrackerHandler::get_peers(
        &torrent.announce_urls,
        descriptor.info_hash,
        descriptor.peer_id,
        config.tcp_port,
        descriptor.total_length,
    )
    .map_err(|e| format!("tracker announce failed: {}", e))?;
    logger_sender.info(&format!("tracker returned {} peer(s)", peers.len()));

    let coordinator = DownloadCoordinator::new(
        descriptor,
        Duration::from_secs(config.connect_seconds_timeout),
        Duration::from_secs(config.read_write_seconds_timeout),
        config.pipelining_size,
        logger_sender.clone(),
    );

    let buffer = coordinator
        .download(peers)
        .map_err(|e| format!("download failed: {}", e))?;
    coordinator
        .save(&config.download_directory, torrent.name(), &buffer)
        .map_err(|e| format!("failed to write output file: {}", e))?;

    logger_sender.info(&format!("download of {} complete", torrent.name()));
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(String, String), String> {
    let mut torrent_path = None;
    let mut config_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--file" => {
                torrent_path = args.get(i + 1).cloned();
                i += 2;
            }
            "--config" => {
                config_path = args.get(i + 1).cloned();
                i += 2;
            }
            other => return Err(format!("unrecognized argument: {}", other)),
        }
    }

    match (torrent_path, config_path) {
        (Some(t), Some(c)) => Ok((t, c)),
        _ => Err("usage: peer_exchange_core --file <torrent-path> --config <config-path>".to_string()),
    }
}
