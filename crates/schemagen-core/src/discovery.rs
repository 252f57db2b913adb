//! Candidate notifications from an external enumeration pass.
//!
//! The listener half may be cloned and called from any thread while the
//! host loads or cooks assets. It only queues the path; all processing
//! happens when the generator drains the queue during discovery.

use flume::{Receiver, Sender};
use std::collections::BTreeSet;

/// Create a connected listener/queue pair.
#[must_use]
pub fn discovery() -> (DiscoveryListener, DiscoveryQueue) {
    let (tx, rx) = flume::unbounded();

    (DiscoveryListener { tx }, DiscoveryQueue { rx })
}

///
/// DiscoveryListener
///

#[derive(Clone, Debug)]
pub struct DiscoveryListener {
    tx: Sender<String>,
}

impl DiscoveryListener {
    /// Record a newly created candidate type. Never blocks; a notification
    /// after the queue is gone is dropped.
    pub fn on_candidate_created(&self, path: impl Into<String>) {
        let _ = self.tx.send(path.into());
    }
}

///
/// DiscoveryQueue
///

#[derive(Debug)]
pub struct DiscoveryQueue {
    rx: Receiver<String>,
}

impl DiscoveryQueue {
    /// Take everything queued so far, deduplicated and sorted.
    #[must_use]
    pub fn drain(&self) -> BTreeSet<String> {
        self.rx.try_iter().collect()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

///
/// TESTS
///
