//! Durable per-book asset storage.
//!
//! Every book identifier maps to two files inside the store directory: the
//! finished asset, and a `.part` file that grows while a transfer runs. The
//! partial file outlives cancellation, failure and process restarts, which is
//! what makes transfers resumable.

pub mod store;

pub use store::AssetStore;
