//! Store layer for the two vendor mocks.
//! - Owns all record mutation and lookup logic.
//! - Keeps the query-filter grammar of the ticketing emulation.
//! - Provides clear error types mapped to HTTP statuses by the server crate.

pub mod clients;
pub mod errors;
pub mod query;
pub mod storage;
pub mod tasks;
