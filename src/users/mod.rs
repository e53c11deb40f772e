//! Credential store: user records, their invariants and their storage backends.
mod memory;
mod repo;
mod repo_types;
pub mod validation;

pub use memory::MemoryUserStore;
pub use repo::{PgUserStore, UserStore};
pub use repo_types::{NewUser, SanitizedIdentity, UserRecord};
