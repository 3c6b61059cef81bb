//! Client-side Storage
//!
//! Pass-through key/value storage for the persisted session:
//!
//! - **kv**: The `KeyValueStore` trait plus file and in-memory stores
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use parley::storage::{FileStore, KeyValueStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::in_dir("./parley_data");
//!     store.set_item("auth_token", "T1")?;
//!     assert_eq!(store.get_item("auth_token")?.as_deref(), Some("T1"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv;

pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
