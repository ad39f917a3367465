//! Write-through memoization stores.
//!
//! A [`CacheStore`] maps the exact arguments of a lookup to its result and
//! keeps a copy of the whole mapping in a single file. Entries never expire;
//! the store file is the only thing to delete when results go stale.
//!
//! # Policy
//! - The file is read at most once, on first use.
//! - Every new entry rewrites the whole file before the value is returned.
//! - "No value" results and failures are never stored.

pub mod error;
mod store;

pub use crate::store::CacheStore;
