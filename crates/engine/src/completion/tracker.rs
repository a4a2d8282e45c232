// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Per-document last-write-wins tracking of completion requests.
//!
//! Starting a request for a document cancels the token of the request it
//! supersedes. Nothing is queued: the stale request notices the cancellation
//! at its next check and returns [`CompletionError::Cancelled`].
//!
//! [`CompletionError::Cancelled`]: crate::completion::CompletionError::Cancelled

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle for one in-flight request
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

#[derive(Debug, Default)]
struct Slots {
    next_generation: u64,
    active: HashMap<String, RequestTicket>,
}

/// Tracks the latest completion request per document
#[derive(Debug, Default)]
pub struct CompletionRequestTracker {
    slots: Mutex<Slots>,
}

impl CompletionRequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request for `document`, cancelling the previous one
    pub fn begin(&self, document: &str) -> RequestTicket {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.next_generation += 1;
        let ticket = RequestTicket {
            generation: slots.next_generation,
            token: CancellationToken::new(),
        };
        if let Some(previous) = slots.active.insert(document.to_string(), ticket.clone()) {
            debug!(document, generation = previous.generation, "superseded completion request");
            previous.token.cancel();
        }
        ticket
    }

    /// Whether `ticket` is still the latest request for `document`
    pub fn is_current(&self, document: &str, ticket: &RequestTicket) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .active
            .get(document)
            .is_some_and(|active| active.generation == ticket.generation)
    }

    /// Forget a finished request; a newer one is left alone
    pub fn finish(&self, document: &str, ticket: &RequestTicket) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots
            .active
            .get(document)
            .is_some_and(|active| active.generation == ticket.generation)
        {
            slots.active.remove(document);
        }
    }

    /// Cancel whatever is in flight for `document` (e.g. on close)
    pub fn cancel(&self, document: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = slots.active.remove(document) {
            active.token.cancel();
        }
    }

    pub fn in_flight(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .len()
    }
}
