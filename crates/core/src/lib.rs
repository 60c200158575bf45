//! Domain logic for the Progettare back office.
//!
//! Pure functions and plain types only: no database or HTTP access. The db
//! and api crates build on these rules.

pub mod client;
pub mod cutting_order;
pub mod error;
pub mod export;
pub mod fabric;
pub mod images;
pub mod messaging;
pub mod roles;
pub mod search;
pub mod spreadsheet;
pub mod types;
