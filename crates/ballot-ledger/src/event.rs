use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use ballot_types::{AccountId, ProposalName};

/// Content-addressed identifier of a ledger event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    pub hash: [u8; 32],
}

impl EventId {
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self { hash }
    }

    /// Short hex representation (first 8 hex chars).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.hash[..4])
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt:{}", self.short_hex())
    }
}

/// Classification of ledger events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ProposalAdded,
    Voted,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ProposalAdded => "ProposalAdded",
            Self::Voted => "Voted",
        };
        write!(f, "{s}")
    }
}

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventPayload {
    ProposalAdded { index: u64, name: ProposalName },
    Voted { voter: AccountId, index: u64 },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ProposalAdded { .. } => EventKind::ProposalAdded,
            Self::Voted { .. } => EventKind::Voted,
        }
    }

    pub fn index(&self) -> u64 {
        match self {
            Self::ProposalAdded { index, .. } | Self::Voted { index, .. } => *index,
        }
    }
}

/// A committed ledger mutation, published after the state change.
///
/// `seq` starts at 1 and increases by one per accepted mutation, so it
/// mirrors commit order. `id` is a BLAKE3 hash over `(seq, payload)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub id: EventId,
    pub seq: u64,
    pub payload: EventPayload,
}

impl LedgerEvent {
    pub fn new(seq: u64, payload: EventPayload) -> Self {
        let id = EventId::from_hash(Self::compute_hash(seq, &payload));
        Self { id, seq, payload }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    pub fn verify_integrity(&self) -> bool {
        self.id.hash == Self::compute_hash(self.seq, &self.payload)
    }

    fn compute_hash(seq: u64, payload: &EventPayload) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"ballot-event-v1:");
        hasher.update(&seq.to_le_bytes());
        if let Ok(payload_bytes) = bincode::serialize(payload) {
            hasher.update(&payload_bytes);
        }
        *hasher.finalize().as_bytes()
    }
}

/// Filter for subscribing to a subset of ledger events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
    /// If set, only votes cast by this account are delivered.
    pub voter: Option<AccountId>,
    /// If set, only events about this proposal index are delivered.
    pub index: Option<u64>,
}

impl EventFilter {
    pub fn kinds(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        Self {
            kinds: Some(kinds.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn matches(&self, event: &LedgerEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }
        if let Some(ref wanted) = self.voter {
            match &event.payload {
                EventPayload::Voted { voter, .. } if voter == wanted => {}
                _ => return false,
            }
        }
        if let Some(index) = self.index {
            if event.payload.index() != index {
                return false;
            }
        }
        true
    }
}

/// A broadcast channel receiver for ledger events.
pub type EventStream = broadcast::Receiver<LedgerEvent>;

struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<LedgerEvent>,
}

/// Fan-out of ledger events to filtered subscribers.
///
/// Delivery is best effort: a slow subscriber lags and a dropped one is
/// pruned. Publishing never fails.
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
    capacity: usize,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.capacity);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// Deliver `event` to every matching subscriber and return how many got it.
    pub fn publish(&self, event: &LedgerEvent) -> usize {
        let mut delivered = 0;
        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subs.retain(|sub| {
            if sub.filter.matches(event) {
                let ok = sub.sender.send(event.clone()).is_ok();
                if ok {
                    delivered += 1;
                }
                ok
            } else {
                sub.sender.receiver_count() > 0
            }
        });
        debug!(id = %event.id, kind = %event.kind(), seq = event.seq, delivered, "event published");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
