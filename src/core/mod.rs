//! Core business logic - framework-agnostic catalog, till and sales operations.

/// Book catalog management and search
pub mod catalog;
/// Cart aggregation and checkout
pub mod cart;
/// Decimal conversions and money formatting
pub mod money;
/// Recording and browsing sales
pub mod sales;
/// Latest-wins sequencing for catalog searches
pub mod search;
/// Per-user cart sessions
pub mod session;
