//! Face-analysis worker
//!
//! Runs the detector on its own thread, one frame at a time. Frames that
//! arrive while a detection is in flight replace each other in a
//! `LatestFrame` slot. Results go through a `GestureFeed`, so anything
//! finishing after the session stops is discarded.

use std::thread::{self, JoinHandle};

use super::GestureFeed;
use super::latest::LatestFrame;
use crate::gesture::FaceSample;

/// Handle to a running analysis thread
#[derive(Debug)]
pub struct Analyzer<F> {
    frames: LatestFrame<F>,
    worker: Option<JoinHandle<u64>>,
}

impl<F: Send + 'static> Analyzer<F> {
    /// Start a worker that turns frames into samples with `analyze`
    ///
    /// `analyze` returns None when no face was found.
    pub fn spawn<A>(mut feed: GestureFeed, mut analyze: A) -> Self
    where
        A: FnMut(F) -> Option<FaceSample> + Send + 'static,
    {
        let frames = LatestFrame::new();
        let inbox = frames.clone();
        let worker = thread::Builder::new()
            .name("blink-flap-analyzer".into())
            .spawn(move || {
                let mut analyzed = 0u64;
                while let Some(frame) = inbox.take() {
                    analyzed += 1;
                    let Some(sample) = analyze(frame) else {
                        log::debug!("No face in frame");
                        continue;
                    };
                    if !feed.submit(&sample) {
                        log::debug!("Session stopped; dropping late detection");
                        inbox.close();
                        break;
                    }
                }
                analyzed
            })
            .ok();
        if worker.is_none() {
            log::error!("Failed to spawn analyzer thread");
            frames.close();
        }
        Self { frames, worker }
    }

    /// Hand a new camera frame to the worker (latest wins)
    ///
    /// False once the worker has shut down.
    pub fn offer(&self, frame: F) -> bool {
        let accepted = self.frames.offer(frame);
        if !accepted {
            log::debug!("Frame rejected: analyzer closed");
        }
        accepted
    }

    /// Frames replaced before the worker got to them
    pub fn dropped(&self) -> u64 {
        self.frames.dropped()
    }

    /// Close the inbox and wait for the worker; returns frames analyzed
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        self.frames.close();
        match self.worker.take().map(JoinHandle::join) {
            Some(Ok(analyzed)) => analyzed,
            _ => 0,
        }
    }
}

impl<F> Drop for Analyzer<F> {
    fn drop(&mut self) {
        self.frames.close();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
