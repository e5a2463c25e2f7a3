//! # sessionfile
//!
//! File-backed key/value sessions.
//!
//! Each session is named by a random fixed-length alphanumeric id and keeps
//! its entries in memory. The entries are written to a file named after the
//! id when the session is flushed, closed or dropped, and read back when the
//! session is resumed by id.
//!
//! ## Features
//!
//! - **Fixed-length ids**: length is a const parameter checked at build time (5..=100)
//! - **Plain file format**: `key=value&` records, one file per session
//! - **Explicit lifecycle**: create, resume, flush, close; closing is idempotent
//! - **Lightweight**: blocking `std::fs` I/O, minimal dependencies
//!
//! ## Quick Start
//!
//! ```no_run
//! use sessionfile::SessionStore;
//!
//! fn main() -> sessionfile::Result<()> {
//!     sessionfile::logging::try_init(None).ok();
//!
//!     let mut store = SessionStore::new_in("/tmp");
//!
//!     let mut session = store.create()?;
//!     session.set("user", "alice");
//!     session.append("visits", 1);
//!     let id = session.id().to_string();
//!     session.close()?;
//!
//!     let session = store.resume(&id)?;
//!     print!("{}", session.dump());
//!     Ok(())
//! }
//! ```
//!
//! ## Limitations
//!
//! Keys and values are written without escaping, so a key or value
//! containing `=` or `&` does not read back unchanged. Two sessions must not
//! use the same file at the same time.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use error::{Result, SessionError};
pub use session::{
    is_valid_id, IdGenerator, Session, SessionId, SessionState, SessionStore, SessionValue,
    DEFAULT_ID_LENGTH,
};
