pub mod error;
pub mod message_repo;

pub use message_repo::{MessageStore, PgMessageStore};
