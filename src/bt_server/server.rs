use std::io;
use std::net::TcpListener;
use std::thread;

use crate::config::cfg::Cfg;
use crate::coordinator::descriptor::TorrentDescriptor;
use crate::logger::logger_sender::LoggerSender;
use crate::peer::peer_session::PeerSession;

/// Vestigial responder: accepts incoming connections for the one torrent
/// this process just finished leeching and serves pieces off the
/// already-assembled file. Not exercised by the coordinator and not part
/// of the tested download path; it exists because this codebase never
/// ships a `PeerSession` that cannot also answer one.
#[derive(Debug)]
pub struct BtServer {
    config: Cfg,
    descriptor: TorrentDescriptor,
    torrent_name: String,
    logger: LoggerSender,
}

#[derive(Debug)]
pub enum BtServerError {
    OpeningListenerError(io::Error),
}

impl BtServer {
    pub fn new(
        config: Cfg,
        descriptor: TorrentDescriptor,
        torrent_name: String,
        logger: LoggerSender,
    ) -> Self {
        Self {
            config,
            descriptor,
            torrent_name,
            logger,
        }
    }

    /// Listens on the configured TCP port and spawns one responder thread
    /// per incoming connection. Blocks forever; callers that want the
    /// leech path only should never call this.
    pub fn init(&self) -> Result<(), BtServerError> {
        let listener = TcpListener::bind(format!("0.0.0.0:{}", self.config.tcp_port))
            .map_err(BtServerError::OpeningListenerError)?;

        self.logger.info("seed responder listening for connections");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => self.handle_connection(stream),
                Err(e) => self
                    .logger
                    .warn(&format!("could not accept incoming connection: {}", e)),
            }
        }

        Ok(())
    }

    fn handle_connection(&self, stream: std::net::TcpStream) {
        let info_hash = self.descriptor.info_hash;
        let our_peer_id = self.descriptor.peer_id;
        let num_pieces = self.descriptor.num_pieces();
        let piece_length = self.descriptor.piece_length;
        let total_length = self.descriptor.total_length;
        let download_directory = self.config.download_directory.clone();
        let torrent_name = self.torrent_name.clone();
        let logger = self.logger.clone();

        thread::spawn(move || {
            let result = PeerSession::run_incoming(
                stream,
                our_peer_id,
                info_hash,
                num_pieces,
                piece_length,
                total_length,
                &download_directory,
                &torrent_name,
                &logger,
            );
            if let Err(e) = result {
                logger.warn(&format!("seed responder connection ended: {}", e));
            }
        });
    }
}
