//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// Catalog management commands
pub mod book;

/// Till commands
pub mod cart;

/// General utility commands
pub mod general;

/// Sale history commands
pub mod sales;

// Export commands
pub use book::*;
pub use cart::*;
pub use general::*;
pub use sales::*;

/// Every top-level command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![ping(), help(), book(), cart(), sales()]
}
