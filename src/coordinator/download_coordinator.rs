use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::logger::logger_sender::LoggerSender;
use crate::peer::bt_peer::BtPeer;
use crate::peer::peer_session::PeerSession;
use crate::piece::work_item::{Piece, WorkItem};
use crate::storage;

use super::descriptor::TorrentDescriptor;
use super::error::CoordinatorError;
use super::queues::{ResultQueue, WorkQueue};
use super::result::PieceResult;

const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Creates one Peer Session per discovered peer, feeds them pieces from a
/// shared Work Queue, collects verified Results, and assembles the output
/// buffer. The output buffer is exclusively this struct's; the Work Queue
/// and Result Queue are the only state shared with the peer workers.
pub struct DownloadCoordinator {
    descriptor: TorrentDescriptor,
    connect_timeout: Duration,
    read_write_timeout: Duration,
    pipelining_size: u32,
    logger: LoggerSender,
}

impl DownloadCoordinator {
    pub fn new(
        descriptor: TorrentDescriptor,
        connect_timeout: Duration,
        read_write_timeout: Duration,
        pipelining_size: u32,
        logger: LoggerSender,
    ) -> Self {
        Self {
            descriptor,
            connect_timeout,
            read_write_timeout,
            pipelining_size,
            logger,
        }
    }

    /// Runs the peer-exchange core to completion: builds the Work Queue,
    /// spawns one worker thread per peer, collects Results until every
    /// piece has been verified, and returns the assembled buffer.
    ///
    /// Returns `CoordinatorError::Incomplete` if every worker exits while
    /// pieces remain outstanding, rather than blocking forever.
    pub fn download(&self, peers: Vec<BtPeer>) -> Result<Vec<u8>, CoordinatorError> {
        if peers.is_empty() {
            return Err(CoordinatorError::NoPeers);
        }

        let work_queue = WorkQueue::new();
        for index in 0..self.descriptor.num_pieces() {
            work_queue.push(WorkItem::new(Piece {
                index,
                hash: self.descriptor.piece_hash(index),
                length: self.descriptor.piece_length_at(index),
            }));
        }

        let result_queue = ResultQueue::new();
        let active_workers = Arc::new(AtomicUsize::new(peers.len()));

        let handles: Vec<_> = peers
            .into_iter()
            .map(|peer| self.spawn_worker(peer, &work_queue, &result_queue, &active_workers))
            .collect();

        let result = self.collect_results(&result_queue, &active_workers);

        // Unblocks any worker still parked in `pop_blocking`, whether we
        // finished normally or are bailing out on `Incomplete`.
        work_queue.close();
        for handle in handles {
            let _ = handle.join();
        }

        result
    }

    /// Writes the assembled buffer to `download_directory/name` in one
    /// pass.
    pub fn save(
        &self,
        download_directory: &str,
        name: &str,
        buffer: &[u8],
    ) -> Result<(), CoordinatorError> {
        storage::manager::save_file(download_directory, name, buffer)
            .map_err(CoordinatorError::Disk)
    }

    fn spawn_worker(
        &self,
        peer: BtPeer,
        work_queue: &WorkQueue,
        result_queue: &ResultQueue,
        active_workers: &Arc<AtomicUsize>,
    ) -> thread::JoinHandle<()> {
        let work_queue = work_queue.clone();
        let result_queue = result_queue.clone();
        let active_workers = active_workers.clone();
        let logger = self.logger.clone();
        let info_hash = self.descriptor.info_hash;
        let our_peer_id = self.descriptor.peer_id;
        let num_pieces = self.descriptor.num_pieces();
        let connect_timeout = self.connect_timeout;
        let read_write_timeout = self.read_write_timeout;
        let pipelining_size = self.pipelining_size;

        thread::spawn(move || {
            let _guard = ActiveWorkerGuard::new(&active_workers);
            Self::run_worker(
                peer,
                our_peer_id,
                info_hash,
                num_pieces,
                connect_timeout,
                read_write_timeout,
                pipelining_size,
                &logger,
                &work_queue,
                &result_queue,
            );
        })
    }

    fn collect_results(
        &self,
        result_queue: &ResultQueue,
        active_workers: &Arc<AtomicUsize>,
    ) -> Result<Vec<u8>, CoordinatorError> {
        let num_pieces = self.descriptor.num_pieces() as usize;
        let mut output = vec![0u8; self.descriptor.total_length as usize];
        let mut done = vec![false; num_pieces];
        let mut collected = 0usize;

        while collected < num_pieces {
            match result_queue.pop_timeout(RESULT_POLL_INTERVAL) {
                Some(result) => {
                    let index = result.index as usize;
                    if done[index] {
                        // A slow peer finished a piece after a retry already
                        // satisfied it elsewhere; keep the first.
                        continue;
                    }
                    done[index] = true;
                    collected += 1;

                    let offset = self.descriptor.piece_offset(result.index) as usize;
                    output[offset..offset + result.bytes.len()].copy_from_slice(&result.bytes);
                }
                None => {
                    if active_workers.load(Ordering::Acquire) == 0 {
                        return Err(CoordinatorError::Incomplete {
                            pieces_remaining: num_pieces - collected,
                        });
                    }
                }
            }
        }

        Ok(output)
    }

    #[allow(clippy::too_many_arguments)]
    fn run_worker(
        peer: BtPeer,
        our_peer_id: [u8; 20],
        info_hash: [u8; 20],
        num_pieces: u32,
        connect_timeout: Duration,
        read_write_timeout: Duration,
        pipelining_size: u32,
        logger: &LoggerSender,
        work_queue: &WorkQueue,
        result_queue: &ResultQueue,
    ) {
        let mut session = match PeerSession::connect(
            peer,
            our_peer_id,
            info_hash,
            num_pieces,
            connect_timeout,
            read_write_timeout,
            pipelining_size,
            logger.clone(),
        ) {
            Ok(session) => session,
            Err(e) => {
                logger.warn(&format!("peer session failed before claiming work: {}", e));
                return;
            }
        };

        loop {
            let item = match work_queue.pop_blocking() {
                Some(item) => item,
                None => break,
            };

            if !session.has_piece(item.piece.index) {
                work_queue.push(item);
                continue;
            }

            match session.download_piece(item) {
                Ok(item) => {
                    if item.verify() {
                        result_queue.push(PieceResult::new(item.piece.index, item.buffer));
                    } else {
                        logger.warn(&format!(
                            "piece {} failed integrity check from {}:{}",
                            item.piece.index, session.peer.ip, session.peer.port
                        ));
                        work_queue.push(WorkItem::new(item.piece));
                    }
                }
                Err((item, e)) => {
                    logger.warn(&format!(
                        "peer session with {}:{} terminating: {}",
                        session.peer.ip, session.peer.port, e
                    ));
                    work_queue.push(item);
                    break;
                }
            }
        }
    }
}

/// Decrements the shared active-worker count when a worker's closure
/// returns, by any path, including an early `return` or a panic unwind.
struct ActiveWorkerGuard<'a> {
    count: &'a Arc<AtomicUsize>,
}

impl<'a> ActiveWorkerGuard<'a> {
    fn new(count: &'a Arc<AtomicUsize>) -> Self {
        Self { count }
    }
}

impl Drop for ActiveWorkerGuard<'_> {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::AcqRel);
    }
}
