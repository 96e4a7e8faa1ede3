//! Domain model for accounts and person records.
//!
//! # Invariants
//! - Accounts and person records are independent; nothing links them.
//! - Person records are hard-deleted; there is no tombstone state.

pub mod account;
pub mod person;
pub mod validation;
