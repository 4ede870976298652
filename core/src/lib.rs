//! # Exceptional Core
//!
//! Error records, identifiers and the error store contract.
//!
//! This crate defines what the request dispatcher needs from persistence:
//!
//! - **[`ErrorRecord`]**: a captured error, opaque to request handling
//!   beyond its identity, creation date and protected flag
//! - **[`ErrorId`]**: strict identifier type with lenient parsing helpers
//! - **[`ErrorStore`]**: asynchronous store trait injected into the dispatcher
//! - **[`MemoryErrorStore`]**: in-memory reference store, also used as the
//!   test double
//!
//! ## Example
//!
//! ```ignore
//! use exceptional_core::{ErrorRecord, ErrorStore, MemoryErrorStore};
//!
//! let store = MemoryErrorStore::new();
//! let record = ErrorRecord::new("IoError", "disk full");
//! let id = record.id;
//! store.log(record).await;
//!
//! assert!(store.protect(id).await?);
//! ```

pub mod id;
pub mod memory;
pub mod record;
pub mod store;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use id::{parse_ids, parse_ids_lenient, ErrorId, IdParseError};
pub use memory::{MemoryErrorStore, DEFAULT_MAX_RECORDS};
pub use record::ErrorRecord;
pub use store::{ErrorStore, StoreError};
