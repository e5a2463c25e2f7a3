//! Session management module.
//!
//! This module provides the file-backed session type together with id
//! generation, validation, the on-disk record format and lifecycle tracking.

pub mod codec;
mod generator;
mod id;
mod state;
mod store;
mod value;

pub use generator::IdGenerator;
pub use id::{is_valid_id, SessionId, DEFAULT_ID_LENGTH, MAX_ID_LENGTH, MIN_ID_LENGTH};
pub use state::SessionState;
pub use store::{Session, SessionStore};
pub use value::SessionValue;
