use common::PredictionWindow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

/// Lifecycle of the prediction view for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Fetching { generation: u64 },
    Ready { generation: u64, window: PredictionWindow },
    Errored { generation: u64, message: String },
}

impl ViewState {
    pub fn generation(&self) -> u64 {
        match self {
            ViewState::Idle => 0,
            ViewState::Fetching { generation }
            | ViewState::Ready { generation, .. }
            | ViewState::Errored { generation, .. } => *generation,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Fetching { .. } => "fetching",
            ViewState::Ready { .. } => "ready",
            ViewState::Errored { .. } => "errored",
        }
    }
}

/// Handed out when a fetch starts; its outcome is applied only while the
/// ticket is still the newest one issued for the symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    symbol: String,
    generation: u64,
}

impl Ticket {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot {
    latest_issued: u64,
    state: ViewState,
}

/// Latest prediction view per symbol, guarded by request generations so a
/// slow, older response can never overwrite a newer one.
#[derive(Debug, Clone, Default)]
pub struct PredictionViews {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl PredictionViews {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // A panic while holding the lock cannot leave a slot half-written.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issues the next generation for `symbol` and marks the view as fetching.
    pub fn begin(&self, symbol: &str) -> Ticket {
        let key = symbol.to_uppercase();
        let mut slots = self.lock();
        let slot = slots.entry(key.clone()).or_insert(Slot {
            latest_issued: 0,
            state: ViewState::Idle,
        });
        slot.latest_issued += 1;
        let generation = slot.latest_issued;
        slot.state = ViewState::Fetching { generation };
        trace!(symbol = %key, generation, "Issued prediction ticket");

        Ticket { symbol: key, generation }
    }

    /// Stores the outcome of a fetch. Returns `false` when the ticket is stale
    /// and the outcome was discarded.
    pub fn apply(&self, ticket: &Ticket, outcome: Result<PredictionWindow, String>) -> bool {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(&ticket.symbol) else {
            return false;
        };
        if slot.latest_issued != ticket.generation {
            debug!(
                symbol = %ticket.symbol,
                stale = ticket.generation,
                latest = slot.latest_issued,
                "Discarding stale prediction response"
            );
            return false;
        }

        slot.state = match outcome {
            Ok(window) => ViewState::Ready {
                generation: ticket.generation,
                window,
            },
            Err(message) => ViewState::Errored {
                generation: ticket.generation,
                message,
            },
        };
        true
    }

    pub fn state(&self, symbol: &str) -> ViewState {
        self.lock()
            .get(&symbol.to_uppercase())
            .map(|slot| slot.state.clone())
            .unwrap_or(ViewState::Idle)
    }
}
