use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::piece::work_item::WorkItem;

use super::result::PieceResult;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// The shared Work Queue: pending pieces waiting to be downloaded. Every
/// peer worker holds a clone of both ends; re-enqueuing a `WorkItem` is just
/// another send.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    sender: Sender<WorkItem>,
    receiver: Receiver<WorkItem>,
    shutdown: Arc<AtomicBool>,
}

impl WorkQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn push(&self, item: WorkItem) {
        // The receiving end is held by this same struct (and its clones)
        // for the coordinator's own lifetime, so a send can only fail once
        // every receiver has been dropped, which the coordinator controls.
        let _ = self.sender.send(item);
    }

    pub fn try_pop(&self) -> Option<WorkItem> {
        self.receiver.try_recv().ok()
    }

    /// Blocks until a Work Item is available or `close` is called. Every
    /// worker thread holds a live `Sender` clone for as long as it may be
    /// parked here, so the channel itself never disconnects on its own --
    /// shutdown is a polled flag rather than a dropped sender.
    pub fn pop_blocking(&self) -> Option<WorkItem> {
        loop {
            if let Ok(item) = self.receiver.try_recv() {
                return Some(item);
            }
            if self.shutdown.load(Ordering::Acquire) {
                return self.receiver.try_recv().ok();
            }
            match self.receiver.recv_timeout(POLL_INTERVAL) {
                Ok(item) => return Some(item),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Signals every clone of this queue that `pop_blocking` should stop
    /// waiting for new work. Safe to call more than once.
    pub fn close(&self) {
        self.shutdown.store(true, Ordering::Release);
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// The shared Result Queue: verified piece bytes flowing back from peer
/// workers to the coordinator.
#[derive(Debug, Clone)]
pub struct ResultQueue {
    sender: Sender<PieceResult>,
    receiver: Receiver<PieceResult>,
}

impl ResultQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    pub fn push(&self, result: PieceResult) {
        let _ = self.sender.send(result);
    }

    pub fn pop_blocking(&self) -> Option<PieceResult> {
        self.receiver.recv().ok()
    }

    /// Blocks for at most `timeout` waiting for a Result. Lets the
    /// coordinator periodically check whether every worker has exited
    /// while pieces are still outstanding.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<PieceResult> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

impl Default for ResultQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::work_item::Piece;

    #[test]
    fn test_work_queue_push_pop() {
        let queue = WorkQueue::new();
        assert!(queue.is_empty());

        queue.push(WorkItem::new(Piece {
            index: 0,
            hash: [0u8; 20],
            length: 10,
        }));

        assert_eq!(queue.len(), 1);
        let popped = queue.try_pop().unwrap();
        assert_eq!(popped.piece.index, 0);
        assert!(queue.try_pop().is_none());
    }

    #[test]
    fn test_result_queue_push_pop() {
        let queue = ResultQueue::new();
        queue.push(PieceResult::new(2, vec![1, 2, 3]));

        let result = queue.pop_blocking().unwrap();
        assert_eq!(result.index, 2);
        assert_eq!(result.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_work_queue_close_unblocks_receiver() {
        let queue = WorkQueue::new();
        let clone = queue.clone();
        queue.close();
        assert!(clone.pop_blocking().is_none());
    }
}
