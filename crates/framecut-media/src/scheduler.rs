//! Background decode scheduler.
//!
//! A single worker thread drains decode requests in order, runs the
//! sampler, and sends completions back over a channel. The caller thread
//! drains completions with [`DecodeScheduler::poll_completions`] and applies
//! the staleness check there; the worker itself knows nothing about tokens
//! beyond carrying them through.

use crossbeam_channel::{unbounded, Receiver, Sender};
use framecut_core::Result;
use framecut_timeline::ClipId;
use std::thread::JoinHandle;
use tracing::debug;

use crate::session::SharedSampler;
use crate::source::VideoSample;

/// One frame decode to run off-thread.
pub struct DecodeRequest {
    pub clip_id: ClipId,
    /// Issue token; completions carrying a stale token are discarded by
    /// the caller.
    pub token: u64,
    /// Source-media timestamp to decode, seconds.
    pub timestamp: f64,
    /// The asset's decode session.
    pub sampler: SharedSampler,
}

/// A finished decode, successful or not.
pub struct DecodeCompletion {
    pub clip_id: ClipId,
    pub token: u64,
    pub timestamp: f64,
    pub result: Result<Option<VideoSample>>,
}

/// Handle to the decode worker thread.
pub struct DecodeScheduler {
    requests: Sender<DecodeRequest>,
    completions: Receiver<DecodeCompletion>,
    worker: Option<JoinHandle<()>>,
}

impl DecodeScheduler {
    /// Spawn the worker thread.
    pub fn new() -> Self {
        let (request_tx, request_rx) = unbounded::<DecodeRequest>();
        let (completion_tx, completion_rx) = unbounded::<DecodeCompletion>();

        let worker = std::thread::Builder::new()
            .name("framecut-decode".into())
            .spawn(move || decode_loop(request_rx, completion_tx))
            .ok();

        Self {
            requests: request_tx,
            completions: completion_rx,
            worker,
        }
    }

    /// Queue a decode. Requests for the same session run in submission
    /// order.
    pub fn request(&self, request: DecodeRequest) {
        let _ = self.requests.send(request);
    }

    /// Drain every completion that has arrived so far, without blocking.
    pub fn poll_completions(&self) -> Vec<DecodeCompletion> {
        self.completions.try_iter().collect()
    }

    /// Block until at least one completion arrives, then drain the rest.
    /// Test helper; the editor loop polls instead.
    pub fn wait_completions(&self) -> Vec<DecodeCompletion> {
        let mut out = Vec::new();
        if let Ok(first) = self.completions.recv() {
            out.push(first);
        }
        out.extend(self.completions.try_iter());
        out
    }
}

impl Default for DecodeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DecodeScheduler {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        let (dead_tx, _) = unbounded();
        self.requests = dead_tx;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Blocking worker loop. Exits when the request channel closes.
fn decode_loop(requests: Receiver<DecodeRequest>, completions: Sender<DecodeCompletion>) {
    for request in requests.iter() {
        let result = request.sampler.lock().sample_at(request.timestamp);
        if let Err(e) = &result {
            debug!(clip_id = %request.clip_id, ts = request.timestamp, error = %e, "decode failed");
        }
        let sent = completions.send(DecodeCompletion {
            clip_id: request.clip_id,
            token: request.token,
            timestamp: request.timestamp,
            result,
        });
        if sent.is_err() {
            break;
        }
    }
}
