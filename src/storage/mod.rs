//! Key-value persistence for the bits of a session that survive restarts:
//! the bearer token and the chat transcript.

pub mod kv;

pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-serialized chat transcript
pub const CHAT_KEY: &str = "chatMessages";
