//! Snowflake ID Generator
//!
//! Time-ordered 64-bit identifiers for users, items and rentals.
//!
//! Layout: 41 bits of milliseconds since [`MARKETPLACE_EPOCH`], 10 bits of
//! machine id, 12 bits of per-millisecond sequence. Ids sort by creation time,
//! which is the order listings are returned in.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// 2024-01-01T00:00:00.000Z
pub const MARKETPLACE_EPOCH: u64 = 1_704_067_200_000;

const MACHINE_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1;

#[derive(Debug, Default)]
struct State {
    last_timestamp: u64,
    sequence: u64,
}

/// Snowflake ID generator
#[derive(Debug)]
pub struct SnowflakeGenerator {
    machine_id: u64,
    state: Mutex<State>,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new(machine_id: u16) -> Self {
        Self {
            machine_id: u64::from(machine_id) & ((1 << MACHINE_BITS) - 1),
            state: Mutex::new(State::default()),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();
        let mut timestamp = current_timestamp().max(state.last_timestamp);

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & MAX_SEQUENCE;
            if state.sequence == 0 {
                // sequence exhausted for this millisecond
                while timestamp <= state.last_timestamp {
                    timestamp = current_timestamp();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        let id = ((timestamp.saturating_sub(MARKETPLACE_EPOCH)) << (MACHINE_BITS + SEQUENCE_BITS))
            | (self.machine_id << SEQUENCE_BITS)
            | state.sequence;

        id as i64
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Current time in milliseconds since the Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(MARKETPLACE_EPOCH)
}
