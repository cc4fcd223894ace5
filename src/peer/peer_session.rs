use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::logger::logger_sender::LoggerSender;
use crate::peer::bt_peer::BtPeer;
use crate::peer::message::bitfield::Bitfield;
use crate::peer::message::handshake::{Handshake, HANDSHAKE_LEN};
use crate::peer::message::message::{Frame, Message, MessageId, PieceBlock, Request};
use crate::peer::session_error::PeerSessionError;
use crate::peer::session_status::SessionStatus;
use crate::piece::work_item::WorkItem;

pub const MAX_BLOCK_SIZE: u32 = 16384;
pub const MAX_BACKLOG: u32 = 5;

/// Owns one TCP connection to one peer and drives it through the state
/// machine described in the peer-exchange core: handshake, bitfield,
/// unchoke/interested, then a series of piece-download loops handed to it
/// by the coordinator.
pub struct PeerSession {
    stream: TcpStream,
    pub bitfield: Bitfield,
    pub status: SessionStatus,
    pub peer: BtPeer,
    logger: LoggerSender,
    pipelining_size: u32,
}

impl PeerSession {
    /// Drives a session through CONNECTING, HANDSHAKING, AWAITING_BITFIELD
    /// and READY_TO_UNCHOKE. On success the session is parked in WORKING,
    /// ready to be handed Work Items.
    #[allow(clippy::too_many_arguments)]
    pub fn connect(
        peer: BtPeer,
        our_peer_id: [u8; 20],
        info_hash: [u8; 20],
        num_pieces: u32,
        connect_timeout: Duration,
        read_write_timeout: Duration,
        pipelining_size: u32,
        logger: LoggerSender,
    ) -> Result<Self, PeerSessionError> {
        let addr = format!("{}:{}", peer.ip, peer.port);
        let socket_addr = addr
            .to_socket_addrs()
            .map_err(PeerSessionError::Connect)?
            .next()
            .ok_or_else(|| {
                PeerSessionError::Connect(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("could not resolve peer address {}", addr),
                ))
            })?;

        let stream = TcpStream::connect_timeout(&socket_addr, connect_timeout)
            .map_err(PeerSessionError::Connect)?;
        stream
            .set_read_timeout(Some(read_write_timeout))
            .map_err(PeerSessionError::Connect)?;
        stream
            .set_write_timeout(Some(read_write_timeout))
            .map_err(PeerSessionError::Connect)?;

        let mut session = Self {
            stream,
            bitfield: Bitfield::empty(num_pieces),
            status: SessionStatus::default(),
            peer,
            logger,
            pipelining_size,
        };

        session.handshake(our_peer_id, info_hash)?;
        session.await_bitfield()?;
        session.ready_to_unchoke()?;

        session.logger.info(&format!(
            "handshake complete with {}:{}",
            session.peer.ip, session.peer.port
        ));

        Ok(session)
    }

    fn handshake(
        &mut self,
        our_peer_id: [u8; 20],
        info_hash: [u8; 20],
    ) -> Result<(), PeerSessionError> {
        let handshake = Handshake::new(info_hash, our_peer_id);
        self.stream
            .write_all(&handshake.to_bytes())
            .map_err(PeerSessionError::Io)?;

        let mut buf = [0u8; HANDSHAKE_LEN];
        self.stream.read_exact(&mut buf).map_err(PeerSessionError::Io)?;
        let theirs =
            Handshake::from_bytes(&buf).map_err(|_| PeerSessionError::HandshakeMismatch)?;

        if theirs.info_hash != info_hash {
            self.logger
                .warn(&format!("handshake mismatch from {}", self.peer.ip));
            return Err(PeerSessionError::HandshakeMismatch);
        }
        Ok(())
    }

    fn await_bitfield(&mut self) -> Result<(), PeerSessionError> {
        match Message::read_frame(&mut self.stream).map_err(PeerSessionError::Io)? {
            Frame::Message(msg) if msg.id == MessageId::Bitfield => {
                self.bitfield = Bitfield::new(msg.payload);
                Ok(())
            }
            _ => Err(PeerSessionError::Protocol(
                "expected BITFIELD right after the handshake".to_string(),
            )),
        }
    }

    fn ready_to_unchoke(&mut self) -> Result<(), PeerSessionError> {
        Message::new(MessageId::Unchoke, vec![])
            .write_to(&mut self.stream)
            .map_err(PeerSessionError::Io)?;
        Message::new(MessageId::Interested, vec![])
            .write_to(&mut self.stream)
            .map_err(PeerSessionError::Io)?;
        self.status.am_interested = true;
        Ok(())
    }

    pub fn has_piece(&self, index: u32) -> bool {
        self.bitfield.has_piece(index)
    }

    /// Runs the piece-download loop on `item` to completion. On failure the
    /// caller gets the Work Item back (to re-enqueue) alongside the error
    /// that ended the attempt.
    pub fn download_piece(
        &mut self,
        mut item: WorkItem,
    ) -> Result<WorkItem, (WorkItem, PeerSessionError)> {
        while !item.is_complete() {
            if let Err(e) = self.fill_pipeline(&mut item) {
                return Err((item, e));
            }

            match Message::read_frame(&mut self.stream) {
                Ok(Frame::KeepAlive) => continue,
                Ok(Frame::Message(msg)) => {
                    if let Err(e) = self.dispatch(&mut item, msg) {
                        return Err((item, e));
                    }
                }
                Err(e) => return Err((item, PeerSessionError::Io(e))),
            }
        }
        Ok(item)
    }

    fn fill_pipeline(&mut self, item: &mut WorkItem) -> Result<(), PeerSessionError> {
        if self.status.peer_is_choking_us {
            return Ok(());
        }
        while item.backlog < self.pipelining_size && item.requested < item.piece.length {
            let block = std::cmp::min(MAX_BLOCK_SIZE, item.piece.length - item.requested);
            let request = Request::new(item.piece.index, item.requested, block);
            self.stream
                .write_all(&request.to_bytes())
                .map_err(PeerSessionError::Io)?;
            item.requested += block;
            item.backlog += 1;
        }
        Ok(())
    }

    fn dispatch(&mut self, item: &mut WorkItem, msg: Message) -> Result<(), PeerSessionError> {
        match msg.id {
            MessageId::Unchoke => self.status.peer_is_choking_us = false,
            MessageId::Choke => self.status.peer_is_choking_us = true,
            MessageId::Have => {
                if msg.payload.len() != 4 {
                    return Err(PeerSessionError::Protocol(
                        "HAVE payload must be 4 bytes".to_string(),
                    ));
                }
                let index = u32::from_be_bytes(msg.payload[0..4].try_into().unwrap());
                self.bitfield.set_piece(index);
            }
            MessageId::Piece => {
                let block = PieceBlock::from_bytes(&msg.payload).map_err(|_| {
                    PeerSessionError::Protocol("malformed PIECE message".to_string())
                })?;
                item.apply_piece(block.index, block.begin, &block.data)
                    .map_err(|e| PeerSessionError::Protocol(format!("{:?}", e)))?;
                item.backlog = item.backlog.saturating_sub(1);
            }
            _ => {}
        }
        Ok(())
    }

    /// Vestigial responder side, driven by `bt_server`: answers an
    /// incoming handshake, advertises every piece as owned, and serves
    /// REQUESTs straight off the already-assembled file on disk. Not
    /// exercised by the coordinator and not performance-tuned -- the
    /// leech path above is the tested surface.
    #[allow(clippy::too_many_arguments)]
    pub fn run_incoming(
        mut stream: TcpStream,
        our_peer_id: [u8; 20],
        info_hash: [u8; 20],
        num_pieces: u32,
        piece_length: u32,
        total_length: u64,
        download_directory: &str,
        torrent_name: &str,
        logger: &LoggerSender,
    ) -> Result<(), PeerSessionError> {
        let mut buf = [0u8; HANDSHAKE_LEN];
        stream.read_exact(&mut buf).map_err(PeerSessionError::Io)?;
        let theirs =
            Handshake::from_bytes(&buf).map_err(|_| PeerSessionError::HandshakeMismatch)?;
        if theirs.info_hash != info_hash {
            return Err(PeerSessionError::HandshakeMismatch);
        }

        stream
            .write_all(&Handshake::new(info_hash, our_peer_id).to_bytes())
            .map_err(PeerSessionError::Io)?;

        let mut owned = Bitfield::empty(num_pieces);
        for index in 0..num_pieces {
            owned.set_piece(index);
        }
        Message::new(MessageId::Bitfield, owned.as_bytes().to_vec())
            .write_to(&mut stream)
            .map_err(PeerSessionError::Io)?;
        Message::new(MessageId::Unchoke, vec![])
            .write_to(&mut stream)
            .map_err(PeerSessionError::Io)?;

        loop {
            match Message::read_frame(&mut stream).map_err(PeerSessionError::Io)? {
                Frame::KeepAlive => continue,
                Frame::Message(msg) if msg.id == MessageId::Request => {
                    let req = Request::from_bytes(&msg.payload).map_err(|_| {
                        PeerSessionError::Protocol("malformed REQUEST message".to_string())
                    })?;
                    let piece_offset = req.index as u64 * piece_length as u64;
                    let offset = piece_offset + req.begin as u64;
                    if offset + req.length as u64 > total_length {
                        return Err(PeerSessionError::Protocol(
                            "REQUEST out of bounds".to_string(),
                        ));
                    }
                    let data = crate::storage::manager::read_range(
                        download_directory,
                        torrent_name,
                        offset,
                        req.length as u64,
                    )
                    .map_err(PeerSessionError::Io)?;
                    let piece_msg = PieceBlock {
                        index: req.index,
                        begin: req.begin,
                        data,
                    };
                    Message::new(MessageId::Piece, piece_msg.to_bytes())
                        .write_to(&mut stream)
                        .map_err(PeerSessionError::Io)?;
                }
                Frame::Message(msg) if msg.id == MessageId::Interested => {
                    logger.info("remote peer declared interest");
                }
                Frame::Message(_) => continue,
            }
        }
    }
}
