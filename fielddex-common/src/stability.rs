//! Per-client prediction stability tracking
//!
//! A live camera feed produces a noisy stream of per-frame classifications.
//! Downstream consumers (voice announcements, dex panels) should only react
//! once the classifier has settled on a label, so each client's recent
//! observations are kept in a small window and collapsed into a debounced
//! "stable" flag.
//!
//! The client map is the only mutable shared state in the core. Map access
//! is a short critical section; each client's window sits behind its own
//! lock so requests for different identities do not serialize on window
//! updates. Nothing here touches I/O or blocks beyond those locks.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

/// Consecutive matching observations required before a label is stable.
pub const STABLE_WINDOW: usize = 3;

/// Minimum confidence an observation needs to count toward stability.
pub const CONFIDENCE_FLOOR: f32 = 0.20;

/// Default bound on concurrently tracked client identities.
pub const DEFAULT_CLIENT_CAPACITY: usize = 1024;

/// Default idle time after which a client's history may be dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(900);

/// One classification observation: label index plus confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub label: usize,
    pub confidence: f32,
}

/// Bounded FIFO of one client's most recent observations.
#[derive(Debug)]
struct ClientHistory {
    window: VecDeque<Observation>,
    last_seen: Instant,
}

impl ClientHistory {
    fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(STABLE_WINDOW),
            last_seen: Instant::now(),
        }
    }

    /// Append an observation, evicting the oldest entry at capacity, and
    /// report whether the window now shows a stable label.
    fn push(&mut self, obs: Observation) -> bool {
        if self.window.len() == STABLE_WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(obs);
        self.last_seen = Instant::now();
        self.is_stable()
    }

    /// Stable iff the window is full, every entry carries the newest label,
    /// and every entry clears the confidence floor.
    fn is_stable(&self) -> bool {
        if self.window.len() < STABLE_WINDOW {
            return false;
        }
        match self.window.back() {
            Some(newest) => self
                .window
                .iter()
                .all(|o| o.label == newest.label && o.confidence >= CONFIDENCE_FLOOR),
            None => false,
        }
    }
}

/// Tracks per-client observation windows and derives the debounced flag.
///
/// Histories are created lazily on first observation and bounded two ways:
/// a capacity limit evicting the least recently observed identity, and an
/// idle timeout enforced by [`StabilityTracker::evict_idle`]. Client
/// identities are an unauthenticated grouping key.
pub struct StabilityTracker {
    clients: Mutex<HashMap<String, Arc<Mutex<ClientHistory>>>>,
    capacity: usize,
    idle_timeout: Duration,
}

impl StabilityTracker {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CLIENT_CAPACITY, DEFAULT_IDLE_TIMEOUT)
    }

    pub fn with_limits(capacity: usize, idle_timeout: Duration) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            idle_timeout,
        }
    }

    /// Record one observation for `client_id` and return the stability flag.
    ///
    /// Updates for the same identity are linearizable (they serialize on the
    /// identity's own lock); updates for different identities only contend on
    /// the brief map lookup. The map lock is released before the window lock
    /// is taken, so no caller ever holds both.
    pub fn observe(&self, client_id: &str, label: usize, confidence: f32) -> bool {
        let entry = self.entry(client_id);
        let mut history = entry.lock().unwrap();
        history.push(Observation { label, confidence })
    }

    /// Number of identities currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().unwrap().len()
    }

    /// Drop histories whose last observation is older than the idle timeout.
    /// Returns the number of identities dropped.
    ///
    /// Also runs under capacity pressure; callers may additionally invoke it
    /// on a timer to bound memory between bursts of new identities.
    pub fn evict_idle(&self) -> usize {
        let mut clients = self.clients.lock().unwrap();
        self.evict_idle_locked(&mut clients)
    }

    fn entry(&self, client_id: &str) -> Arc<Mutex<ClientHistory>> {
        let mut clients = self.clients.lock().unwrap();
        if let Some(existing) = clients.get(client_id) {
            return Arc::clone(existing);
        }

        if clients.len() >= self.capacity {
            self.evict_one_locked(&mut clients);
        }

        let created = Arc::new(Mutex::new(ClientHistory::new()));
        clients.insert(client_id.to_string(), Arc::clone(&created));
        created
    }

    fn evict_idle_locked(
        &self,
        clients: &mut HashMap<String, Arc<Mutex<ClientHistory>>>,
    ) -> usize {
        let before = clients.len();
        let now = Instant::now();
        clients.retain(|_, entry| match entry.try_lock() {
            Ok(history) => now.duration_since(history.last_seen) < self.idle_timeout,
            // A locked entry is mid-update and therefore not idle
            Err(_) => true,
        });
        before - clients.len()
    }

    /// Make room for one new identity: prefer idle histories, otherwise drop
    /// the least recently observed one. Entries locked by in-flight updates
    /// are skipped; if every entry is busy the insert proceeds anyway rather
    /// than refusing the observation.
    fn evict_one_locked(&self, clients: &mut HashMap<String, Arc<Mutex<ClientHistory>>>) {
        if self.evict_idle_locked(clients) > 0 && clients.len() < self.capacity {
            return;
        }

        let oldest = clients
            .iter()
            .filter_map(|(id, entry)| {
                entry
                    .try_lock()
                    .ok()
                    .map(|history| (id.clone(), history.last_seen))
            })
            .min_by_key(|(_, last_seen)| *last_seen)
            .map(|(id, _)| id);

        if let Some(id) = oldest {
            debug!(client = %id, "evicting least recently observed history at capacity");
            clients.remove(&id);
        }
    }
}

impl Default for StabilityTracker {
    fn default() -> Self {
        Self::new()
    }
}
