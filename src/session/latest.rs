//! Single-slot, latest-wins mailbox
//!
//! Camera frames arrive faster than face analysis finishes. A new frame
//! replaces whatever is still waiting; stale frames are never queued.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug)]
struct Slot<T> {
    pending: Option<T>,
    closed: bool,
    dropped: u64,
}

#[derive(Debug)]
struct Shared<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

/// Shared handle to the mailbox; clones refer to the same slot
#[derive(Debug)]
pub struct LatestFrame<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for LatestFrame<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for LatestFrame<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestFrame<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    pending: None,
                    closed: false,
                    dropped: 0,
                }),
                ready: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.shared
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `frame`, replacing any pending one. False once closed.
    pub fn offer(&self, frame: T) -> bool {
        let mut slot = self.lock();
        if slot.closed {
            return false;
        }
        if slot.pending.replace(frame).is_some() {
            slot.dropped += 1;
        }
        drop(slot);
        self.shared.ready.notify_one();
        true
    }

    /// Wait for the next frame; None once closed
    pub fn take(&self) -> Option<T> {
        let mut slot = self.lock();
        loop {
            if slot.closed {
                return None;
            }
            if let Some(frame) = slot.pending.take() {
                return Some(frame);
            }
            slot = self
                .shared
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like `take`, giving up after `timeout`
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let slot = self.lock();
        let (mut slot, _) = self
            .shared
            .ready
            .wait_timeout_while(slot, timeout, |s| !s.closed && s.pending.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        if slot.closed {
            return None;
        }
        slot.pending.take()
    }

    pub fn try_take(&self) -> Option<T> {
        let mut slot = self.lock();
        if slot.closed {
            return None;
        }
        slot.pending.take()
    }

    /// Reject further frames and wake any waiter; a pending frame is discarded
    pub fn close(&self) {
        let mut slot = self.lock();
        slot.closed = true;
        slot.pending = None;
        drop(slot);
        self.shared.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Frames replaced before anyone took them
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_latest_wins() {
        let slot = LatestFrame::new();
        assert!(slot.offer(1));
        assert!(slot.offer(2));
        assert!(slot.offer(3));
        assert_eq!(slot.try_take(), Some(3));
        assert_eq!(slot.try_take(), None);
        assert_eq!(slot.dropped(), 2);
    }

    #[test]
    fn test_close_rejects_and_wakes() {
        let slot: LatestFrame<u32> = LatestFrame::new();
        let waiter = {
            let slot = slot.clone();
            thread::spawn(move || slot.take())
        };
        thread::sleep(Duration::from_millis(20));
        slot.close();
        assert_eq!(waiter.join().unwrap(), None);
        assert!(!slot.offer(9));
        assert!(slot.is_closed());
    }

    #[test]
    fn test_take_blocks_until_offer() {
        let slot = LatestFrame::new();
        let producer = {
            let slot = slot.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                slot.offer("frame");
            })
        };
        assert_eq!(slot.take(), Some("frame"));
        producer.join().unwrap();
    }

    #[test]
    fn test_take_timeout_expires() {
        let slot: LatestFrame<u8> = LatestFrame::new();
        assert_eq!(slot.take_timeout(Duration::from_millis(10)), None);
        slot.offer(4);
        assert_eq!(slot.take_timeout(Duration::from_millis(10)), Some(4));
    }
}
