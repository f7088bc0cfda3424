//! Superseding requests
//!
//! Each resource owns a [`RequestSlot`]. Starting a request through the slot
//! cancels whatever was in flight before and hands out a [`Ticket`]. A
//! response may only be applied while its ticket is still current.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

use crate::{ClientError, ClientResult};

#[derive(Debug)]
struct SlotState {
    generation: u64,
    token: CancellationToken,
}

/// In-flight request tracker for one resource
#[derive(Debug, Clone)]
pub struct RequestSlot {
    name: &'static str,
    state: Arc<Mutex<SlotState>>,
}

impl RequestSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(Mutex::new(SlotState {
                generation: 0,
                token: CancellationToken::new(),
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancel the previous request and register a new one
    pub fn begin(&self) -> Ticket {
        let mut state = self.lock();
        if !state.token.is_cancelled() && state.generation > 0 {
            tracing::debug!(resource = self.name, generation = state.generation, "Superseding request");
        }
        state.token.cancel();
        state.generation += 1;
        state.token = CancellationToken::new();
        Ticket {
            generation: state.generation,
            token: state.token.clone(),
            slot: self.clone(),
        }
    }

    /// Resource name used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Cancel whatever is in flight (page teardown)
    pub fn cancel(&self) {
        self.lock().token.cancel();
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}

/// Handle to one request issued through a [`RequestSlot`]
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    token: CancellationToken,
    slot: RequestSlot,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Still the newest request and not cancelled
    pub fn is_current(&self) -> bool {
        !self.token.is_cancelled() && self.slot.generation() == self.generation
    }

    /// Drive `fut` until it completes or the ticket is superseded
    pub async fn run<T, F>(&self, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                tracing::debug!(resource = self.slot.name, generation = self.generation, "Request cancelled");
                Err(ClientError::Superseded)
            }
            result = fut => result,
        }
    }
}
