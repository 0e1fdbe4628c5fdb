//! In-process transport between participant documents.
//!
//! ```text
//!   Doc A ◄──── diff(sv A) ──── Doc B
//!     │                           ▲
//!     └────── diff(sv B) ─────────┘
//! ```
//!
//! Every [`flush`](LoopbackProvider::flush) runs one state-vector exchange
//! per ordered pair of connected documents. The first exchange of a pair
//! raises a [`Synced`] notification for the receiving peer.

use rustc_hash::FxHashSet;
use thiserror::Error;
use uuid::Uuid;
use yrs::updates::decoder::Decode;
use yrs::{Doc, ReadTxn, Transact, Update};

pub type PeerId = Uuid;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("cannot decode update from {from}: {reason}")]
    Decode { from: PeerId, reason: String },
    #[error("cannot apply update to {to}: {reason}")]
    Apply { to: PeerId, reason: String },
}

/// `peer` has exchanged state with `remote` for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Synced {
    pub peer: PeerId,
    pub remote: PeerId,
}

type SyncedListener = Box<dyn Fn(&Synced)>;

#[derive(Default)]
pub struct LoopbackProvider {
    peers: Vec<(PeerId, Doc)>,
    synced: FxHashSet<(PeerId, PeerId)>,
    listeners: Vec<SyncedListener>,
    exchanges: u64,
}

impl LoopbackProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, doc: Doc) -> PeerId {
        let peer = Uuid::new_v4();
        self.peers.push((peer, doc));
        log::debug!("peer {peer} connected ({} total)", self.peers.len());
        peer
    }

    /// Stop exchanging with `peer`. Returns whether it was connected.
    pub fn disconnect(&mut self, peer: &PeerId) -> bool {
        let before = self.peers.len();
        self.peers.retain(|(id, _)| id != peer);
        self.synced.retain(|(a, b)| a != peer && b != peer);
        before != self.peers.len()
    }

    pub fn on_synced<F>(&mut self, listener: F)
    where
        F: Fn(&Synced) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Updates applied since the provider was created.
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Bring every connected document up to date with every other one.
    pub fn flush(&mut self) -> Result<(), ProviderError> {
        let mut first_contacts = Vec::new();
        for (from, source) in &self.peers {
            for (to, target) in &self.peers {
                if from == to {
                    continue;
                }
                let remote_sv = target.transact().state_vector();
                let diff = source.transact().encode_diff_v1(&remote_sv);
                let update = Update::decode_v1(&diff).map_err(|err| ProviderError::Decode {
                    from: *from,
                    reason: err.to_string(),
                })?;
                target
                    .transact_mut()
                    .apply_update(update)
                    .map_err(|err| ProviderError::Apply {
                        to: *to,
                        reason: err.to_string(),
                    })?;
                self.exchanges += 1;
                if self.synced.insert((*to, *from)) {
                    first_contacts.push(Synced {
                        peer: *to,
                        remote: *from,
                    });
                }
            }
        }
        for event in &first_contacts {
            for listener in &self.listeners {
                listener(event);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use yrs::{Array, GetString, Text};

    #[test]
    fn test_flush_converges_documents() {
        let (a, b) = (Doc::new(), Doc::new());
        let mut provider = LoopbackProvider::new();
        provider.connect(a.clone());
        provider.connect(b.clone());

        let text = a.get_or_insert_text("t");
        text.insert(&mut a.transact_mut(), 0, "hello");
        provider.flush().unwrap();

        let remote = b.get_or_insert_text("t");
        assert_eq!(remote.get_string(&b.transact()), "hello");
    }

    #[test]
    fn test_deletions_travel() {
        let (a, b) = (Doc::new(), Doc::new());
        let mut provider = LoopbackProvider::new();
        provider.connect(a.clone());
        provider.connect(b.clone());

        let array = a.get_or_insert_array("drawing");
        array.push_back(&mut a.transact_mut(), 1.0);
        array.push_back(&mut a.transact_mut(), 2.0);
        provider.flush().unwrap();
        let remote = b.get_or_insert_array("drawing");
        assert_eq!(remote.len(&b.transact()), 2);

        remote.remove_range(&mut b.transact_mut(), 0, 2);
        provider.flush().unwrap();
        assert_eq!(array.len(&a.transact()), 0);
    }

    #[test]
    fn test_synced_once_per_pair_direction() {
        let mut provider = LoopbackProvider::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        provider.on_synced(move |event| log.borrow_mut().push(*event));

        let a = provider.connect(Doc::new());
        let b = provider.connect(Doc::new());
        provider.flush().unwrap();
        provider.flush().unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&Synced { peer: b, remote: a }));
        assert!(seen.contains(&Synced { peer: a, remote: b }));
        assert_eq!(provider.exchanges(), 4);
    }

    #[test]
    fn test_disconnected_peer_stops_receiving() {
        let (a, b) = (Doc::new(), Doc::new());
        let mut provider = LoopbackProvider::new();
        provider.connect(a.clone());
        let peer_b = provider.connect(b.clone());
        assert!(provider.disconnect(&peer_b));
        assert!(!provider.disconnect(&peer_b));

        let text = a.get_or_insert_text("t");
        text.insert(&mut a.transact_mut(), 0, "x");
        provider.flush().unwrap();
        assert_eq!(b.get_or_insert_text("t").get_string(&b.transact()), "");
        assert_eq!(provider.peer_count(), 1);
    }
}
