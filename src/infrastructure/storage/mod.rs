//! Process-local storage
//!
//! Repository implementations that keep all data in memory. Selected with
//! `database.backend = "memory"`; the integration tests run against it too.

mod memory;

pub use memory::MemoryStore;
