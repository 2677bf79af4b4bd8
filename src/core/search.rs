//! Latest-wins sequencing for catalog searches.
//!
//! Searches issued while a user types can complete out of order. Each search
//! takes a [`SearchTicket`] before querying the store; once the results are in,
//! the caller keeps them only if the ticket is still the newest one for that
//! session, so a slow early response can never overwrite a later one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::trace;

/// Proof of when a search was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    session: String,
    sequence: u64,
}

impl SearchTicket {
    /// Position of this search in the global issue order
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Issues search tickets and remembers the newest one per session.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    next: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl SearchSequencer {
    /// Creates a sequencer with no sessions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new search and marks it as the session's newest.
    pub async fn begin(&self, session: &str) -> SearchTicket {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.latest.lock().await.insert(session.to_string(), sequence);
        trace!(session, sequence, "Issued search ticket");
        SearchTicket {
            session: session.to_string(),
            sequence,
        }
    }

    /// True while no newer search has been issued for the ticket's session.
    pub async fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.latest.lock().await.get(&ticket.session).copied() == Some(ticket.sequence)
    }

    /// Forgets a session; its outstanding tickets stop being current.
    pub async fn end(&self, session: &str) {
        self.latest.lock().await.remove(session);
    }
}
