//! Database access: pool construction and the entry repository

pub mod entries;
pub mod pool;

pub use entries::{DbError, Entry, EntryRepo};
pub use pool::create_pool;
