//! Domain types and rules shared by every Fictsu crate.
//!
//! Nothing in here performs I/O: the database, HTTP and external service
//! layers depend on this crate, never the other way round.

pub mod error;
pub mod fiction;
pub mod ownership;
pub mod prompt;
pub mod types;
