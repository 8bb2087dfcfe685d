//! Behavioral tests for the queue store.
//!
//! - `durability.rs` - data survives close/reopen, schema reuse
//! - `invariants.rs` - count bookkeeping and payload fidelity
