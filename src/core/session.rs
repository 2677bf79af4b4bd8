//! Per-user cart sessions.
//!
//! Each staff member builds one cart at a time. Carts live only in memory; a
//! session that is abandoned (or a bot restart) simply drops the cart in progress.
//! Every cart sits behind its own async mutex so commands from the same user are
//! applied one at a time while different users never wait on each other.

use crate::core::cart::Cart;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Shared handle to one user's cart
pub type CartHandle = Arc<Mutex<Cart>>;

/// The carts currently being built, keyed by Discord user ID.
#[derive(Debug, Default)]
pub struct CartSessions {
    carts: RwLock<HashMap<String, CartHandle>>,
}

impl CartSessions {
    /// Creates an empty set of sessions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's cart, starting an empty one on first use.
    pub async fn session(&self, user_id: &str) -> CartHandle {
        if let Some(cart) = self.carts.read().await.get(user_id) {
            return Arc::clone(cart);
        }

        let mut carts = self.carts.write().await;
        Arc::clone(carts.entry(user_id.to_string()).or_insert_with(|| {
            debug!(user_id, "Starting cart session");
            Arc::new(Mutex::new(Cart::new()))
        }))
    }

    /// Drops the user's cart without recording anything.
    pub async fn abandon(&self, user_id: &str) -> bool {
        let removed = self.carts.write().await.remove(user_id).is_some();
        if removed {
            debug!(user_id, "Abandoned cart session");
        }
        removed
    }

    /// Number of open sessions
    pub async fn len(&self) -> usize {
        self.carts.read().await.len()
    }

    /// True when no sessions are open
    pub async fn is_empty(&self) -> bool {
        self.carts.read().await.is_empty()
    }
}
